use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::ads::Ad;
use adscout_core::AdPlatform;

use crate::utils::{parse_json_or_default, parse_text_or};

#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::ads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AdDB {
    pub id: String,
    pub subscription_id: String,
    pub user_id: String,
    pub platform: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub advertiser_id: Option<String>,
    pub advertiser_name: Option<String>,
    pub raw_data: String,
    pub scraped_at: chrono::NaiveDateTime,
}

impl From<AdDB> for Ad {
    fn from(db: AdDB) -> Self {
        Self {
            platform: parse_text_or(&db.platform, AdPlatform::Facebook, "ads.platform"),
            raw_data: parse_json_or_default(&db.raw_data, "ads.raw_data"),
            id: db.id,
            subscription_id: db.subscription_id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            image_url: db.image_url,
            video_url: db.video_url,
            landing_page_url: db.landing_page_url,
            advertiser_id: db.advertiser_id,
            advertiser_name: db.advertiser_name,
            scraped_at: db.scraped_at,
        }
    }
}
