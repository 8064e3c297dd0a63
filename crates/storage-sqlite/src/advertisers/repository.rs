use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use adscout_core::advertisers::{Advertiser, AdvertiserRepositoryTrait, ScrapedAdvertiser};
use adscout_core::utils::time_utils::now_utc;
use adscout_core::{AdPlatform, Result};

use super::model::AdvertiserDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::advertisers;

pub struct AdvertiserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AdvertiserRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn find_by_page_impl(
    conn: &mut SqliteConnection,
    page_id: &str,
    platform: AdPlatform,
) -> Result<Option<AdvertiserDB>> {
    Ok(advertisers::table
        .filter(advertisers::page_id.eq(page_id))
        .filter(advertisers::platform.eq(platform.as_str()))
        .select(AdvertiserDB::as_select())
        .first::<AdvertiserDB>(conn)
        .optional()
        .map_err(StorageError::from)?)
}

/// Inserts or merges an advertiser keyed by `(page_id, platform)` within the
/// caller's write transaction.
pub(crate) fn upsert_scraped(
    conn: &mut SqliteConnection,
    scraped: ScrapedAdvertiser,
    new_ads: i32,
    seen_at: NaiveDateTime,
) -> Result<Advertiser> {
    let page_id = scraped.page_id.trim().to_string();
    match find_by_page_impl(conn, &page_id, scraped.platform)? {
        Some(existing) => {
            let mut advertiser = Advertiser::from(existing);
            advertiser.merge_scraped(scraped, seen_at, new_ads);
            let advertiser_db = AdvertiserDB::from(advertiser);
            let row = diesel::update(advertisers::table.find(&advertiser_db.id))
                .set(&advertiser_db)
                .returning(AdvertiserDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?;
            Ok(row.into())
        }
        None => {
            let advertiser = Advertiser::from_scraped(scraped, seen_at, new_ads);
            let row = diesel::insert_into(advertisers::table)
                .values(AdvertiserDB::from(advertiser))
                .returning(AdvertiserDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?;
            Ok(row.into())
        }
    }
}

#[async_trait]
impl AdvertiserRepositoryTrait for AdvertiserRepository {
    fn get_by_id(&self, advertiser_id: &str) -> Result<Advertiser> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            advertisers::table
                .find(advertiser_id)
                .select(AdvertiserDB::as_select())
                .first::<AdvertiserDB>(&mut conn),
            "Advertiser",
        )?;
        Ok(row.into())
    }

    fn find_by_page(&self, page_id: &str, platform: AdPlatform) -> Result<Option<Advertiser>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(find_by_page_impl(&mut conn, page_id, platform)?.map(Advertiser::from))
    }

    fn list(&self, platform: Option<AdPlatform>) -> Result<Vec<Advertiser>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = advertisers::table
            .select(AdvertiserDB::as_select())
            .order(advertisers::last_seen_at.desc())
            .into_boxed();
        if let Some(platform) = platform {
            query = query.filter(advertisers::platform.eq(platform.as_str()));
        }
        let rows = query
            .load::<AdvertiserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Advertiser::from).collect())
    }

    async fn upsert(&self, scraped: ScrapedAdvertiser, new_ads: i32) -> Result<Advertiser> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Advertiser> {
                upsert_scraped(conn, scraped, new_ads, now_utc())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;

    fn scraped(page_id: &str, platform: AdPlatform, name: &str) -> ScrapedAdvertiser {
        ScrapedAdvertiser {
            page_id: page_id.to_string(),
            platform,
            name: name.to_string(),
            profile_url: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn upsert_merges_on_page_and_platform() {
        let (pool, writer, _dir) = setup_db();
        let repo = AdvertiserRepository::new(pool, writer);

        let first = repo
            .upsert(scraped("page-1", AdPlatform::Facebook, "Acme"), 2)
            .await
            .unwrap();
        let second = repo
            .upsert(scraped("page-1", AdPlatform::Facebook, "Acme Inc"), 1)
            .await
            .unwrap();
        let other_platform = repo
            .upsert(scraped("page-1", AdPlatform::Tiktok, "Acme"), 1)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Acme Inc");
        assert_eq!(second.ad_count, 3);
        assert_ne!(other_platform.id, first.id);

        assert_eq!(repo.list(None).unwrap().len(), 2);
        assert_eq!(repo.list(Some(AdPlatform::Tiktok)).unwrap().len(), 1);
        assert!(repo
            .find_by_page("page-1", AdPlatform::Instagram)
            .unwrap()
            .is_none());
    }
}
