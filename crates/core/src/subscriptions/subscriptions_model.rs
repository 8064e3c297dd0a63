//! Subscription domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::platforms::AdPlatform;
use crate::utils::text_utils::normalize_optional;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl ScrapeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeFrequency::Daily => "daily",
            ScrapeFrequency::Weekly => "weekly",
            ScrapeFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ScrapeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(ScrapeFrequency::Daily),
            "weekly" => Ok(ScrapeFrequency::Weekly),
            "monthly" => Ok(ScrapeFrequency::Monthly),
            other => Err(Error::invalid_input(format!(
                "Unsupported frequency '{}'",
                other
            ))),
        }
    }
}

/// A tracked search term or company on one platform, owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub platform: AdPlatform,
    pub search_term: Option<String>,
    pub company: Option<String>,
    pub frequency: ScrapeFrequency,
    pub is_active: bool,
    pub last_scraped_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Subscription {
    /// The text used to describe what is being tracked.
    pub fn display_query(&self) -> &str {
        self.search_term
            .as_deref()
            .or(self.company.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub platform: AdPlatform,
    pub search_term: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub frequency: ScrapeFrequency,
}

impl NewSubscription {
    /// Trims optional text fields and checks that at least one of them is present.
    pub fn normalized(self) -> Result<Self> {
        let search_term = normalize_optional(self.search_term);
        let company = normalize_optional(self.company);
        validate_target(&search_term, &company)?;
        Ok(Self {
            search_term,
            company,
            ..self
        })
    }
}

/// Partial update; `None` leaves the stored value untouched. An empty string
/// clears an optional text field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    pub platform: Option<AdPlatform>,
    pub search_term: Option<String>,
    pub company: Option<String>,
    pub frequency: Option<ScrapeFrequency>,
}

impl SubscriptionUpdate {
    pub fn apply_to(self, mut subscription: Subscription) -> Result<Subscription> {
        if let Some(platform) = self.platform {
            subscription.platform = platform;
        }
        if self.search_term.is_some() {
            subscription.search_term = normalize_optional(self.search_term);
        }
        if self.company.is_some() {
            subscription.company = normalize_optional(self.company);
        }
        if let Some(frequency) = self.frequency {
            subscription.frequency = frequency;
        }
        validate_target(&subscription.search_term, &subscription.company)?;
        Ok(subscription)
    }
}

fn validate_target(search_term: &Option<String>, company: &Option<String>) -> Result<()> {
    if search_term.is_none() && company.is_none() {
        return Err(Error::invalid_input(
            "Either a search term or a company is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subscription_requires_term_or_company() {
        let missing = NewSubscription {
            platform: AdPlatform::Facebook,
            search_term: Some("  ".to_string()),
            company: None,
            frequency: ScrapeFrequency::Daily,
        };
        assert!(matches!(missing.normalized(), Err(Error::Validation(_))));

        let ok = NewSubscription {
            platform: AdPlatform::Facebook,
            search_term: None,
            company: Some(" Acme ".to_string()),
            frequency: ScrapeFrequency::Weekly,
        }
        .normalized()
        .unwrap();
        assert_eq!(ok.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn frequency_defaults_to_daily_when_omitted() {
        let parsed: NewSubscription =
            serde_json::from_str(r#"{"platform":"facebook","searchTerm":"SaaS"}"#).unwrap();
        assert_eq!(parsed.frequency, ScrapeFrequency::Daily);
    }
}
