use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::ads_examples::example_ads;
use super::ads_model::{Ad, AdImportBatch, ScrapedAd};
use super::ads_traits::{AdRepositoryTrait, AdServiceTrait};
use crate::context::RequestContext;
use crate::errors::{Error, Result};
use crate::subscriptions::{Subscription, SubscriptionRepositoryTrait};
use crate::utils::time_utils::now_utc;

pub struct AdService {
    repository: Arc<dyn AdRepositoryTrait>,
    subscription_repository: Arc<dyn SubscriptionRepositoryTrait>,
}

impl AdService {
    pub fn new(
        repository: Arc<dyn AdRepositoryTrait>,
        subscription_repository: Arc<dyn SubscriptionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            subscription_repository,
        }
    }

    fn owned_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<Subscription> {
        let subscription = self.subscription_repository.get_by_id(subscription_id)?;
        ctx.ensure_owner(&subscription.user_id)?;
        Ok(subscription)
    }
}

#[async_trait]
impl AdServiceTrait for AdService {
    fn get_ads_by_user(&self, ctx: &RequestContext) -> Result<Vec<Ad>> {
        self.repository.list_for_user(&ctx.user_id)
    }

    fn get_ads_by_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<Vec<Ad>> {
        self.owned_subscription(ctx, subscription_id)?;
        self.repository.list_for_subscription(subscription_id)
    }

    fn get_ad(&self, ctx: &RequestContext, ad_id: &str) -> Result<Ad> {
        let ad = self.repository.get_by_id(ad_id)?;
        ctx.ensure_owner(&ad.user_id)?;
        Ok(ad)
    }

    async fn delete_ad(&self, ctx: &RequestContext, ad_id: &str) -> Result<()> {
        self.get_ad(ctx, ad_id)?;
        self.repository.delete(ad_id).await?;
        Ok(())
    }

    async fn create_examples(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<Vec<Ad>> {
        let subscription = self.owned_subscription(ctx, subscription_id)?;
        let now = now_utc();
        let batch = AdImportBatch {
            subscription_id: subscription.id.clone(),
            user_id: subscription.user_id.clone(),
            platform: subscription.platform,
            ads: example_ads(&subscription, now),
            imported_at: now,
            mark_scraped: false,
        };
        let ads = self.repository.import(batch).await?;
        info!(
            "Inserted {} example ads for subscription {}",
            ads.len(),
            subscription_id
        );
        Ok(ads)
    }

    async fn import_scraped_ads(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
        ads: Vec<ScrapedAd>,
    ) -> Result<Vec<Ad>> {
        let subscription = self.owned_subscription(ctx, subscription_id)?;
        for ad in &ads {
            ad.validate()?;
            if let Some(advertiser) = &ad.advertiser {
                if advertiser.platform != subscription.platform {
                    return Err(Error::invalid_input(format!(
                        "Advertiser '{}' is on {}, subscription is on {}",
                        advertiser.name, advertiser.platform, subscription.platform
                    )));
                }
            }
        }
        debug!(
            "Importing {} scraped ads for subscription {}",
            ads.len(),
            subscription_id
        );
        let batch = AdImportBatch {
            subscription_id: subscription.id,
            user_id: subscription.user_id,
            platform: subscription.platform,
            ads,
            imported_at: now_utc(),
            mark_scraped: true,
        };
        self.repository.import(batch).await
    }
}
