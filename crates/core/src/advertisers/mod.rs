//! Advertisers module - advertisers deduplicated by page id and platform.

mod advertisers_model;
mod advertisers_service;
mod advertisers_traits;

pub use advertisers_model::{Advertiser, ScrapedAdvertiser};
pub use advertisers_service::AdvertiserService;
pub use advertisers_traits::{AdvertiserRepositoryTrait, AdvertiserServiceTrait};
