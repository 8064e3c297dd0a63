use async_trait::async_trait;
use std::sync::Arc;

use super::advertisers_model::{Advertiser, ScrapedAdvertiser};
use super::advertisers_traits::{AdvertiserRepositoryTrait, AdvertiserServiceTrait};
use crate::errors::Result;
use crate::platforms::AdPlatform;

/// Advertisers are shared reference data: any authenticated caller may read
/// them and they are never deleted.
pub struct AdvertiserService {
    repository: Arc<dyn AdvertiserRepositoryTrait>,
}

impl AdvertiserService {
    pub fn new(repository: Arc<dyn AdvertiserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AdvertiserServiceTrait for AdvertiserService {
    fn list_advertisers(&self, platform: Option<AdPlatform>) -> Result<Vec<Advertiser>> {
        self.repository.list(platform)
    }

    fn get_advertiser(&self, advertiser_id: &str) -> Result<Advertiser> {
        self.repository.get_by_id(advertiser_id)
    }

    async fn upsert_advertiser(&self, scraped: ScrapedAdvertiser) -> Result<Advertiser> {
        scraped.validate()?;
        self.repository.upsert(scraped, 0).await
    }
}
