use async_trait::async_trait;
use serde_json::Value;

use super::onboarding_model::{
    DocumentAnalysis, GeneratedDocument, GenerationStatus, OnboardingDocumentType,
    OnboardingProfile, OnboardingProgress, ProfileInput, ProfileStatus,
};
use crate::context::RequestContext;
use crate::errors::Result;

#[async_trait]
pub trait OnboardingRepositoryTrait: Send + Sync {
    fn get_profile(&self, profile_id: &str) -> Result<OnboardingProfile>;
    fn find_profile_for_organization(&self, organization_id: &str)
        -> Result<Option<OnboardingProfile>>;
    /// Inserts or replaces the profile row.
    async fn save_profile(&self, profile: OnboardingProfile) -> Result<OnboardingProfile>;
    async fn set_profile_status(
        &self,
        profile_id: &str,
        status: ProfileStatus,
        completed_at: Option<chrono::NaiveDateTime>,
    ) -> Result<OnboardingProfile>;
    /// Upserts the pending documents and analyses keyed by `(profile_id, document_type)`
    /// and moves the profile to `generating`, in one transaction.
    async fn start_generation(
        &self,
        profile_id: &str,
        documents: Vec<GeneratedDocument>,
        analyses: Vec<DocumentAnalysis>,
    ) -> Result<OnboardingProfile>;

    fn list_documents(&self, profile_id: &str) -> Result<Vec<GeneratedDocument>>;
    fn find_document(
        &self,
        profile_id: &str,
        document_type: OnboardingDocumentType,
    ) -> Result<Option<GeneratedDocument>>;
    /// Upsert keyed by `(profile_id, document_type)`.
    async fn save_document(&self, document: GeneratedDocument) -> Result<GeneratedDocument>;

    fn list_analyses(&self, profile_id: &str) -> Result<Vec<DocumentAnalysis>>;
    fn find_analysis(
        &self,
        profile_id: &str,
        document_type: OnboardingDocumentType,
    ) -> Result<Option<DocumentAnalysis>>;
    /// Upsert keyed by `(profile_id, document_type)`.
    async fn save_analysis(&self, analysis: DocumentAnalysis) -> Result<DocumentAnalysis>;
}

#[async_trait]
pub trait OnboardingServiceTrait: Send + Sync {
    async fn save_profile(&self, ctx: &RequestContext, input: ProfileInput)
        -> Result<OnboardingProfile>;
    fn get_profile(&self, ctx: &RequestContext) -> Result<Option<OnboardingProfile>>;
    async fn start_generation(&self, ctx: &RequestContext, profile_id: &str)
        -> Result<OnboardingProfile>;

    async fn update_document_status(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        status: GenerationStatus,
        error: Option<String>,
    ) -> Result<GeneratedDocument>;
    async fn save_generated_document(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        content: String,
    ) -> Result<GeneratedDocument>;
    async fn save_analysis_results(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        analysis: Value,
    ) -> Result<DocumentAnalysis>;
    async fn mark_analysis_failed(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        error: String,
    ) -> Result<DocumentAnalysis>;
    async fn mark_profile_completed(&self, ctx: &RequestContext, profile_id: &str)
        -> Result<OnboardingProfile>;
    fn get_progress(&self, ctx: &RequestContext, profile_id: &str) -> Result<OnboardingProgress>;

    fn list_documents(&self, ctx: &RequestContext) -> Result<Vec<GeneratedDocument>>;
    fn get_document(
        &self,
        ctx: &RequestContext,
        document_type: OnboardingDocumentType,
    ) -> Result<GeneratedDocument>;
    async fn update_document_content(
        &self,
        ctx: &RequestContext,
        document_type: OnboardingDocumentType,
        content: String,
    ) -> Result<GeneratedDocument>;
    fn list_analyses(&self, ctx: &RequestContext) -> Result<Vec<DocumentAnalysis>>;
}
