use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::advertisers::Advertiser;
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
#[diesel(table_name = crate::schema::advertisers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AdvertiserDB {
    pub id: String,
    pub page_id: String,
    pub platform: String,
    pub name: String,
    pub profile_url: Option<String>,
    pub image_url: Option<String>,
    pub ad_count: i32,
    pub first_seen_at: chrono::NaiveDateTime,
    pub last_seen_at: chrono::NaiveDateTime,
}

impl From<AdvertiserDB> for Advertiser {
    fn from(db: AdvertiserDB) -> Self {
        Self {
            platform: parse_text_or(&db.platform, AdPlatform::Facebook, "advertisers.platform"),
            id: db.id,
            page_id: db.page_id,
            name: db.name,
            profile_url: db.profile_url,
            image_url: db.image_url,
            ad_count: db.ad_count,
            first_seen_at: db.first_seen_at,
            last_seen_at: db.last_seen_at,
        }
    }
}

impl From<Advertiser> for AdvertiserDB {
    fn from(domain: Advertiser) -> Self {
        Self {
            id: domain.id,
            page_id: domain.page_id,
            platform: domain.platform.as_str().to_string(),
            name: domain.name,
            profile_url: domain.profile_url,
            image_url: domain.image_url,
            ad_count: domain.ad_count,
            first_seen_at: domain.first_seen_at,
            last_seen_at: domain.last_seen_at,
        }
    }
}
