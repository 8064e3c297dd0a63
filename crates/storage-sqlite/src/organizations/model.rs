//! Database models for organizations.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::organizations::{Organization, OrganizationMember, OrganizationRole};

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
#[diesel(table_name = crate::schema::organizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDB {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_by: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(
    Queryable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::organization_members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMemberDB {
    pub organization_id: String,
    pub user_id: String,
    pub role: String,
    pub joined_at: chrono::NaiveDateTime,
}

impl From<OrganizationDB> for Organization {
    fn from(db: OrganizationDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            slug: db.slug,
            created_by: db.created_by,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Organization> for OrganizationDB {
    fn from(domain: Organization) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            slug: domain.slug,
            created_by: domain.created_by,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl From<OrganizationMemberDB> for OrganizationMember {
    fn from(db: OrganizationMemberDB) -> Self {
        Self {
            role: parse_text_or(&db.role, OrganizationRole::Member, "organization_members.role"),
            organization_id: db.organization_id,
            user_id: db.user_id,
            joined_at: db.joined_at,
        }
    }
}

impl From<OrganizationMember> for OrganizationMemberDB {
    fn from(domain: OrganizationMember) -> Self {
        Self {
            organization_id: domain.organization_id,
            user_id: domain.user_id,
            role: domain.role.as_str().to_string(),
            joined_at: domain.joined_at,
        }
    }
}
