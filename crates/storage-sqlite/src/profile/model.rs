use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::profile::UserProfile;

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
#[diesel(table_name = crate::schema::user_profiles)]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserProfileDB {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub active_organization_id: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<UserProfileDB> for UserProfile {
    fn from(db: UserProfileDB) -> Self {
        Self {
            user_id: db.user_id,
            display_name: db.display_name,
            email: db.email,
            avatar_url: db.avatar_url,
            active_organization_id: db.active_organization_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<UserProfile> for UserProfileDB {
    fn from(domain: UserProfile) -> Self {
        Self {
            user_id: domain.user_id,
            display_name: domain.display_name,
            email: domain.email,
            avatar_url: domain.avatar_url,
            active_organization_id: domain.active_organization_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
