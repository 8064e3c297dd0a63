//! Ads module - scraped advertisements attached to subscriptions.

mod ads_examples;
mod ads_model;
mod ads_service;
mod ads_traits;

pub use ads_examples::example_ads;
pub use ads_model::{Ad, AdImportBatch, ScrapedAd};
pub use ads_service::AdService;
pub use ads_traits::{AdRepositoryTrait, AdServiceTrait};
