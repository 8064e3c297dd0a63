use async_trait::async_trait;

use super::advertisers_model::{Advertiser, ScrapedAdvertiser};
use crate::errors::Result;
use crate::platforms::AdPlatform;

#[async_trait]
pub trait AdvertiserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, advertiser_id: &str) -> Result<Advertiser>;
    fn find_by_page(&self, page_id: &str, platform: AdPlatform) -> Result<Option<Advertiser>>;
    /// All advertisers, optionally for one platform, ordered by name.
    fn list(&self, platform: Option<AdPlatform>) -> Result<Vec<Advertiser>>;
    /// Inserts or patches the advertiser keyed by `(page_id, platform)`.
    async fn upsert(&self, scraped: ScrapedAdvertiser, new_ads: i32) -> Result<Advertiser>;
}

#[async_trait]
pub trait AdvertiserServiceTrait: Send + Sync {
    fn list_advertisers(&self, platform: Option<AdPlatform>) -> Result<Vec<Advertiser>>;
    fn get_advertiser(&self, advertiser_id: &str) -> Result<Advertiser>;
    async fn upsert_advertiser(&self, scraped: ScrapedAdvertiser) -> Result<Advertiser>;
}
