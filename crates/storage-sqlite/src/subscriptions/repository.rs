use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use adscout_core::subscriptions::{Subscription, SubscriptionRepositoryTrait};
use adscout_core::utils::time_utils::now_utc;
use adscout_core::Result;

use super::model::SubscriptionDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{ads, subscriptions};

pub struct SubscriptionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SubscriptionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

/// Stamps `last_scraped_at` inside an existing write transaction.
pub(crate) fn touch_last_scraped(
    conn: &mut SqliteConnection,
    subscription_id: &str,
    at: NaiveDateTime,
) -> Result<()> {
    let updated = diesel::update(subscriptions::table.find(subscription_id))
        .set((
            subscriptions::last_scraped_at.eq(Some(at)),
            subscriptions::updated_at.eq(now_utc()),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    if updated == 0 {
        return Err(adscout_core::Error::NotFound("Subscription".to_string()));
    }
    Ok(())
}

#[async_trait]
impl SubscriptionRepositoryTrait for SubscriptionRepository {
    fn get_by_id(&self, subscription_id: &str) -> Result<Subscription> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            subscriptions::table
                .find(subscription_id)
                .select(SubscriptionDB::as_select())
                .first::<SubscriptionDB>(&mut conn),
            "Subscription",
        )?;
        Ok(row.into())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Subscription>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .select(SubscriptionDB::as_select())
            .order(subscriptions::created_at.desc())
            .load::<SubscriptionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn create(&self, subscription: Subscription) -> Result<Subscription> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                let row = diesel::insert_into(subscriptions::table)
                    .values(SubscriptionDB::from(subscription))
                    .returning(SubscriptionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, subscription: Subscription) -> Result<Subscription> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                let subscription_db = SubscriptionDB::from(subscription);
                let row = not_found_as(
                    diesel::update(subscriptions::table.find(&subscription_db.id))
                        .set(&subscription_db)
                        .returning(SubscriptionDB::as_returning())
                        .get_result(conn),
                    "Subscription",
                )?;
                Ok(row.into())
            })
            .await
    }

    async fn set_active(&self, subscription_id: &str, is_active: bool) -> Result<Subscription> {
        let subscription_id = subscription_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Subscription> {
                let row = not_found_as(
                    diesel::update(subscriptions::table.find(&subscription_id))
                        .set((
                            subscriptions::is_active.eq(is_active),
                            subscriptions::updated_at.eq(now_utc()),
                        ))
                        .returning(SubscriptionDB::as_returning())
                        .get_result(conn),
                    "Subscription",
                )?;
                Ok(row.into())
            })
            .await
    }

    async fn mark_scraped(&self, subscription_id: &str, at: NaiveDateTime) -> Result<()> {
        let subscription_id = subscription_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                touch_last_scraped(conn, &subscription_id, at)
            })
            .await
    }

    async fn delete_with_ads(&self, subscription_id: &str) -> Result<usize> {
        let subscription_id = subscription_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed_ads =
                    diesel::delete(ads::table.filter(ads::subscription_id.eq(&subscription_id)))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                let removed = diesel::delete(subscriptions::table.find(&subscription_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if removed == 0 {
                    return Err(adscout_core::Error::NotFound("Subscription".to_string()));
                }
                debug!(
                    "Removed subscription {} and {} ads",
                    subscription_id, removed_ads
                );
                Ok(removed_ads)
            })
            .await
    }
}
