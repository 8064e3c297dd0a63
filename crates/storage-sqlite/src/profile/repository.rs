use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use adscout_core::profile::{ProfileRepositoryTrait, UserProfile};
use adscout_core::Result;

use super::model::UserProfileDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::user_profiles;

pub struct ProfileRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ProfileRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProfileRepositoryTrait for ProfileRepository {
    fn get(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let row = user_profiles::table
            .find(user_id)
            .select(UserProfileDB::as_select())
            .first::<UserProfileDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(UserProfile::from))
    }

    async fn save(&self, profile: UserProfile) -> Result<UserProfile> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserProfile> {
                let profile_db = UserProfileDB::from(profile);
                let row = diesel::insert_into(user_profiles::table)
                    .values(&profile_db)
                    .on_conflict(user_profiles::user_id)
                    .do_update()
                    .set(&profile_db)
                    .returning(UserProfileDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }
}
