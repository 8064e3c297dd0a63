//! Advertiser domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::platforms::AdPlatform;
use crate::utils::text_utils::normalize_optional;

/// An advertiser seen in scraped ad data. Unique per `(page_id, platform)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    pub id: String,
    pub page_id: String,
    pub platform: AdPlatform,
    pub name: String,
    pub profile_url: Option<String>,
    pub image_url: Option<String>,
    pub ad_count: i32,
    pub first_seen_at: NaiveDateTime,
    pub last_seen_at: NaiveDateTime,
}

/// Advertiser data as delivered by a scraper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedAdvertiser {
    pub page_id: String,
    pub platform: AdPlatform,
    pub name: String,
    pub profile_url: Option<String>,
    pub image_url: Option<String>,
}

impl ScrapedAdvertiser {
    pub fn validate(&self) -> Result<()> {
        if self.page_id.trim().is_empty() {
            return Err(Error::invalid_input("Advertiser page id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Advertiser name cannot be empty"));
        }
        Ok(())
    }
}

impl Advertiser {
    /// Builds the row inserted the first time an advertiser is seen.
    pub fn from_scraped(scraped: ScrapedAdvertiser, seen_at: NaiveDateTime, new_ads: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            page_id: scraped.page_id.trim().to_string(),
            platform: scraped.platform,
            name: scraped.name.trim().to_string(),
            profile_url: normalize_optional(scraped.profile_url),
            image_url: normalize_optional(scraped.image_url),
            ad_count: new_ads,
            first_seen_at: seen_at,
            last_seen_at: seen_at,
        }
    }

    /// Patches an existing row with newer scraped data. Urls are only
    /// overwritten when the scraper delivered one.
    pub fn merge_scraped(&mut self, scraped: ScrapedAdvertiser, seen_at: NaiveDateTime, new_ads: i32) {
        self.name = scraped.name.trim().to_string();
        if let Some(profile_url) = normalize_optional(scraped.profile_url) {
            self.profile_url = Some(profile_url);
        }
        if let Some(image_url) = normalize_optional(scraped.image_url) {
            self.image_url = Some(image_url);
        }
        self.ad_count += new_ads;
        if seen_at > self.last_seen_at {
            self.last_seen_at = seen_at;
        }
    }
}
