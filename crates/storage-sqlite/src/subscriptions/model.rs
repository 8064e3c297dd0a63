use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::subscriptions::{ScrapeFrequency, Subscription};
use adscout_core::AdPlatform;

use crate::utils::parse_text_or;

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    Insertable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDB {
    pub id: String,
    pub user_id: String,
    pub platform: String,
    pub search_term: Option<String>,
    pub company: Option<String>,
    pub frequency: String,
    pub is_active: bool,
    pub last_scraped_at: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<SubscriptionDB> for Subscription {
    fn from(db: SubscriptionDB) -> Self {
        Self {
            platform: parse_text_or(&db.platform, AdPlatform::Facebook, "subscriptions.platform"),
            frequency: parse_text_or(
                &db.frequency,
                ScrapeFrequency::default(),
                "subscriptions.frequency",
            ),
            id: db.id,
            user_id: db.user_id,
            search_term: db.search_term,
            company: db.company,
            is_active: db.is_active,
            last_scraped_at: db.last_scraped_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Subscription> for SubscriptionDB {
    fn from(domain: Subscription) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            platform: domain.platform.as_str().to_string(),
            search_term: domain.search_term,
            company: domain.company,
            frequency: domain.frequency.as_str().to_string(),
            is_active: domain.is_active,
            last_scraped_at: domain.last_scraped_at,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
