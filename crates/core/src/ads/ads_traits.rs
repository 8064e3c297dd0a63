use async_trait::async_trait;

use super::ads_model::{Ad, AdImportBatch, ScrapedAd};
use crate::context::RequestContext;
use crate::errors::Result;

#[async_trait]
pub trait AdRepositoryTrait: Send + Sync {
    fn get_by_id(&self, ad_id: &str) -> Result<Ad>;
    /// Ads of one user, `scraped_at` descending.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Ad>>;
    /// Ads of one subscription, `scraped_at` descending.
    fn list_for_subscription(&self, subscription_id: &str) -> Result<Vec<Ad>>;
    /// Upserts the advertisers referenced by the batch, inserts the ads and
    /// optionally stamps the subscription, all in one transaction.
    async fn import(&self, batch: AdImportBatch) -> Result<Vec<Ad>>;
    async fn delete(&self, ad_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait AdServiceTrait: Send + Sync {
    fn get_ads_by_user(&self, ctx: &RequestContext) -> Result<Vec<Ad>>;
    fn get_ads_by_subscription(&self, ctx: &RequestContext, subscription_id: &str)
        -> Result<Vec<Ad>>;
    fn get_ad(&self, ctx: &RequestContext, ad_id: &str) -> Result<Ad>;
    async fn delete_ad(&self, ctx: &RequestContext, ad_id: &str) -> Result<()>;
    async fn create_examples(&self, ctx: &RequestContext, subscription_id: &str)
        -> Result<Vec<Ad>>;
    async fn import_scraped_ads(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
        ads: Vec<ScrapedAd>,
    ) -> Result<Vec<Ad>>;
}
