//! Subscriptions module - tracked search terms and companies per user.

mod subscriptions_model;
mod subscriptions_service;
mod subscriptions_traits;

pub use subscriptions_model::{
    NewSubscription, ScrapeFrequency, Subscription, SubscriptionUpdate,
};
pub use subscriptions_service::SubscriptionService;
pub use subscriptions_traits::{SubscriptionRepositoryTrait, SubscriptionServiceTrait};
