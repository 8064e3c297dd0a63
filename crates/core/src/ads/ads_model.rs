//! Ad domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::advertisers::ScrapedAdvertiser;
use crate::errors::{Error, Result};
use crate::platforms::AdPlatform;

/// A scraped advertisement. Read-only once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub subscription_id: String,
    pub user_id: String,
    pub platform: AdPlatform,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub advertiser_id: Option<String>,
    pub advertiser_name: Option<String>,
    pub raw_data: Value,
    pub scraped_at: NaiveDateTime,
}

/// One ad as delivered by a scraper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedAd {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub advertiser: Option<ScrapedAdvertiser>,
    #[serde(default)]
    pub raw_data: Value,
    pub scraped_at: Option<NaiveDateTime>,
}

impl ScrapedAd {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_input("Ad title cannot be empty"));
        }
        if let Some(advertiser) = &self.advertiser {
            advertiser.validate()?;
        }
        Ok(())
    }
}

/// A batch of scraped ads written for one subscription in one transaction.
#[derive(Debug, Clone)]
pub struct AdImportBatch {
    pub subscription_id: String,
    pub user_id: String,
    pub platform: AdPlatform,
    pub ads: Vec<ScrapedAd>,
    /// Fallback timestamp for ads without their own `scraped_at`.
    pub imported_at: NaiveDateTime,
    /// Whether the subscription's `last_scraped_at` should move forward.
    pub mark_scraped: bool,
}
