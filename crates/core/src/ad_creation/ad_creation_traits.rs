use async_trait::async_trait;

use super::ad_creation_model::{
    AdDocument, AdDocumentType, AdFilter, AdFilterCategory, CreatedAd, DocumentEditSource,
    NewAdFilter, NewCreatedAd,
};
use crate::context::RequestContext;
use crate::errors::Result;

#[async_trait]
pub trait AdCreationRepositoryTrait: Send + Sync {
    fn get_filter(&self, filter_id: &str) -> Result<AdFilter>;
    /// Global entries plus the organization's custom ones, by `sort_order` then name.
    fn list_filters(
        &self,
        category: AdFilterCategory,
        organization_id: &str,
    ) -> Result<Vec<AdFilter>>;
    async fn create_filter(&self, filter: AdFilter) -> Result<AdFilter>;
    async fn delete_filter(&self, filter_id: &str) -> Result<usize>;
    /// Deletes every global entry of the category and inserts `filters`, atomically.
    async fn replace_global_filters(
        &self,
        category: AdFilterCategory,
        filters: Vec<AdFilter>,
    ) -> Result<usize>;

    fn get_created_ad(&self, created_ad_id: &str) -> Result<CreatedAd>;
    /// Newest first.
    fn list_created_ads(&self, organization_id: &str) -> Result<Vec<CreatedAd>>;
    async fn create_created_ad(&self, created_ad: CreatedAd) -> Result<CreatedAd>;
    async fn update_pipeline_stage(
        &self,
        created_ad_id: &str,
        stage: String,
    ) -> Result<CreatedAd>;
    /// Deletes the ad and its documents in one transaction.
    async fn delete_created_ad(&self, created_ad_id: &str) -> Result<usize>;

    fn list_documents(&self, created_ad_id: &str) -> Result<Vec<AdDocument>>;
    fn get_document(
        &self,
        created_ad_id: &str,
        document_type: AdDocumentType,
    ) -> Result<Option<AdDocument>>;
    /// Inserts documents whose type does not exist yet for the ad; existing
    /// types are left untouched. Returns the inserted rows.
    async fn insert_missing_documents(&self, documents: Vec<AdDocument>) -> Result<Vec<AdDocument>>;
    async fn save_document(&self, document: AdDocument) -> Result<AdDocument>;
}

#[async_trait]
pub trait AdCreationServiceTrait: Send + Sync {
    fn list_filters(
        &self,
        ctx: &RequestContext,
        category: AdFilterCategory,
    ) -> Result<Vec<AdFilter>>;
    async fn create_custom_filter(
        &self,
        ctx: &RequestContext,
        new_filter: NewAdFilter,
    ) -> Result<AdFilter>;
    async fn delete_custom_filter(&self, ctx: &RequestContext, filter_id: &str) -> Result<()>;
    async fn seed_filters(&self, category: AdFilterCategory) -> Result<usize>;
    /// Seeds only the categories that have no global entries yet.
    async fn seed_missing_filters(&self) -> Result<usize>;

    async fn create_ad(&self, ctx: &RequestContext, new_ad: NewCreatedAd) -> Result<CreatedAd>;
    /// Materializes the ad's documents. Run by the event worker, not by callers.
    async fn initialize_documents(&self, created_ad_id: &str) -> Result<Vec<AdDocument>>;
    fn list_created_ads(&self, ctx: &RequestContext) -> Result<Vec<CreatedAd>>;
    fn get_created_ad(&self, ctx: &RequestContext, created_ad_id: &str) -> Result<CreatedAd>;
    async fn update_pipeline_stage(
        &self,
        ctx: &RequestContext,
        created_ad_id: &str,
        stage: String,
    ) -> Result<CreatedAd>;
    async fn delete_created_ad(&self, ctx: &RequestContext, created_ad_id: &str) -> Result<()>;

    fn get_ad_documents(&self, ctx: &RequestContext, created_ad_id: &str)
        -> Result<Vec<AdDocument>>;
    async fn save_ad_document(
        &self,
        ctx: &RequestContext,
        created_ad_id: &str,
        document_type: AdDocumentType,
        content: String,
        source: DocumentEditSource,
    ) -> Result<AdDocument>;
}
