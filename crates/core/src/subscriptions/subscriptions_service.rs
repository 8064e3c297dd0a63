use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use super::subscriptions_model::{NewSubscription, Subscription, SubscriptionUpdate};
use super::subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
use crate::context::RequestContext;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::time_utils::now_utc;

pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl SubscriptionService {
    pub fn new(
        repository: Arc<dyn SubscriptionRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }

    fn load_owned(&self, ctx: &RequestContext, subscription_id: &str) -> Result<Subscription> {
        let subscription = self.repository.get_by_id(subscription_id)?;
        ctx.ensure_owner(&subscription.user_id)?;
        Ok(subscription)
    }
}

#[async_trait]
impl SubscriptionServiceTrait for SubscriptionService {
    fn list_subscriptions(&self, ctx: &RequestContext) -> Result<Vec<Subscription>> {
        self.repository.list_for_user(&ctx.user_id)
    }

    fn get_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<Subscription> {
        self.load_owned(ctx, subscription_id)
    }

    async fn create_subscription(
        &self,
        ctx: &RequestContext,
        new_subscription: NewSubscription,
    ) -> Result<Subscription> {
        let new_subscription = new_subscription.normalized()?;
        let now = now_utc();
        let subscription = Subscription {
            id: Uuid::new_v4().to_string(),
            user_id: ctx.user_id.clone(),
            platform: new_subscription.platform,
            search_term: new_subscription.search_term,
            company: new_subscription.company,
            frequency: new_subscription.frequency,
            is_active: true,
            last_scraped_at: None,
            created_at: now,
            updated_at: now,
        };
        let created = self.repository.create(subscription).await?;
        info!(
            "Subscription {} created for '{}' on {}",
            created.id,
            created.display_query(),
            created.platform
        );
        self.event_sink.emit(DomainEvent::subscription_created(
            created.id.clone(),
            created.user_id.clone(),
        ));
        Ok(created)
    }

    async fn update_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<Subscription> {
        let existing = self.load_owned(ctx, subscription_id)?;
        let mut updated = update.apply_to(existing)?;
        updated.updated_at = now_utc();
        self.repository.update(updated).await
    }

    async fn toggle_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<Subscription> {
        let existing = self.load_owned(ctx, subscription_id)?;
        debug!(
            "Toggling subscription {} (active: {} -> {})",
            subscription_id, existing.is_active, !existing.is_active
        );
        self.repository
            .set_active(subscription_id, !existing.is_active)
            .await
    }

    async fn delete_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<()> {
        self.load_owned(ctx, subscription_id)?;
        let removed_ads = self.repository.delete_with_ads(subscription_id).await?;
        info!(
            "Subscription {} deleted together with {} ads",
            subscription_id, removed_ads
        );
        Ok(())
    }
}
