use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use adscout_core::ads::{Ad, AdImportBatch, AdRepositoryTrait};
use adscout_core::utils::text_utils::normalize_optional;
use adscout_core::Result;

use super::model::AdDB;
use crate::advertisers::upsert_scraped;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::ads;
use crate::subscriptions::touch_last_scraped;
use crate::utils::{chunk_for_sqlite, to_json_text};

pub struct AdRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AdRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AdRepositoryTrait for AdRepository {
    fn get_by_id(&self, ad_id: &str) -> Result<Ad> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            ads::table
                .find(ad_id)
                .select(AdDB::as_select())
                .first::<AdDB>(&mut conn),
            "Ad",
        )?;
        Ok(row.into())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Ad>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ads::table
            .filter(ads::user_id.eq(user_id))
            .select(AdDB::as_select())
            .order((ads::scraped_at.desc(), ads::id.asc()))
            .load::<AdDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Ad::from).collect())
    }

    fn list_for_subscription(&self, subscription_id: &str) -> Result<Vec<Ad>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ads::table
            .filter(ads::subscription_id.eq(subscription_id))
            .select(AdDB::as_select())
            .order((ads::scraped_at.desc(), ads::id.asc()))
            .load::<AdDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Ad::from).collect())
    }

    async fn import(&self, batch: AdImportBatch) -> Result<Vec<Ad>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Ad>> {
                let mut rows = Vec::with_capacity(batch.ads.len());
                for scraped in batch.ads {
                    let seen_at = scraped.scraped_at.unwrap_or(batch.imported_at);
                    let advertiser = match scraped.advertiser {
                        Some(advertiser) => Some(upsert_scraped(conn, advertiser, 1, seen_at)?),
                        None => None,
                    };
                    rows.push(AdDB {
                        id: Uuid::new_v4().to_string(),
                        subscription_id: batch.subscription_id.clone(),
                        user_id: batch.user_id.clone(),
                        platform: batch.platform.as_str().to_string(),
                        title: scraped.title.trim().to_string(),
                        description: normalize_optional(scraped.description),
                        image_url: normalize_optional(scraped.image_url),
                        video_url: normalize_optional(scraped.video_url),
                        landing_page_url: normalize_optional(scraped.landing_page_url),
                        advertiser_name: advertiser.as_ref().map(|a| a.name.clone()),
                        advertiser_id: advertiser.map(|a| a.id),
                        raw_data: to_json_text(&scraped.raw_data)?,
                        scraped_at: seen_at,
                    });
                }

                for chunk in chunk_for_sqlite(&rows) {
                    diesel::insert_into(ads::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if batch.mark_scraped {
                    touch_last_scraped(conn, &batch.subscription_id, batch.imported_at)?;
                }
                debug!(
                    "Imported {} ads into subscription {}",
                    rows.len(),
                    batch.subscription_id
                );
                Ok(rows.into_iter().map(Ad::from).collect())
            })
            .await
    }

    async fn delete(&self, ad_id: &str) -> Result<usize> {
        let ad_id = ad_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(ads::table.find(ad_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
