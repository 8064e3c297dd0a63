use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::subscriptions_model::{NewSubscription, Subscription, SubscriptionUpdate};
use crate::context::RequestContext;
use crate::errors::Result;

#[async_trait]
pub trait SubscriptionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, subscription_id: &str) -> Result<Subscription>;
    /// Subscriptions of one user, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Subscription>>;
    async fn create(&self, subscription: Subscription) -> Result<Subscription>;
    async fn update(&self, subscription: Subscription) -> Result<Subscription>;
    async fn set_active(&self, subscription_id: &str, is_active: bool) -> Result<Subscription>;
    async fn mark_scraped(&self, subscription_id: &str, at: NaiveDateTime) -> Result<()>;
    /// Deletes the subscription and every ad scraped for it. Returns deleted ads.
    async fn delete_with_ads(&self, subscription_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait SubscriptionServiceTrait: Send + Sync {
    fn list_subscriptions(&self, ctx: &RequestContext) -> Result<Vec<Subscription>>;
    fn get_subscription(&self, ctx: &RequestContext, subscription_id: &str)
        -> Result<Subscription>;
    async fn create_subscription(
        &self,
        ctx: &RequestContext,
        new_subscription: NewSubscription,
    ) -> Result<Subscription>;
    async fn update_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<Subscription>;
    async fn toggle_subscription(
        &self,
        ctx: &RequestContext,
        subscription_id: &str,
    ) -> Result<Subscription>;
    async fn delete_subscription(&self, ctx: &RequestContext, subscription_id: &str)
        -> Result<()>;
}
