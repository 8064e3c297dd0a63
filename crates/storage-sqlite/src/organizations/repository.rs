use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use adscout_core::organizations::{
    Organization, OrganizationMember, OrganizationRepositoryTrait, OrganizationRole,
};
use adscout_core::utils::time_utils::now_utc;
use adscout_core::Result;

use super::model::{OrganizationDB, OrganizationMemberDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{organization_members, organizations};

pub struct OrganizationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl OrganizationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl OrganizationRepositoryTrait for OrganizationRepository {
    fn get_by_id(&self, organization_id: &str) -> Result<Organization> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            organizations::table
                .find(organization_id)
                .select(OrganizationDB::as_select())
                .first::<OrganizationDB>(&mut conn),
            "Organization",
        )?;
        Ok(row.into())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Organization>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = organizations::table
            .inner_join(organization_members::table)
            .filter(organization_members::user_id.eq(user_id))
            .select(OrganizationDB::as_select())
            .order(organizations::name.asc())
            .load::<OrganizationDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Organization::from).collect())
    }

    fn get_membership(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>> {
        let mut conn = get_connection(&self.pool)?;
        let row = organization_members::table
            .filter(organization_members::organization_id.eq(organization_id))
            .filter(organization_members::user_id.eq(user_id))
            .select(OrganizationMemberDB::as_select())
            .first::<OrganizationMemberDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(OrganizationMember::from))
    }

    fn list_members(&self, organization_id: &str) -> Result<Vec<OrganizationMember>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = organization_members::table
            .filter(organization_members::organization_id.eq(organization_id))
            .select(OrganizationMemberDB::as_select())
            .order(organization_members::joined_at.asc())
            .load::<OrganizationMemberDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(OrganizationMember::from).collect())
    }

    async fn create(&self, organization: Organization) -> Result<Organization> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Organization> {
                let owner = OrganizationMemberDB::from(OrganizationMember {
                    organization_id: organization.id.clone(),
                    user_id: organization.created_by.clone(),
                    role: OrganizationRole::Owner,
                    joined_at: organization.created_at,
                });
                let row = diesel::insert_into(organizations::table)
                    .values(OrganizationDB::from(organization))
                    .returning(OrganizationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                diesel::insert_into(organization_members::table)
                    .values(&owner)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update_name(&self, organization_id: &str, name: String) -> Result<Organization> {
        let organization_id = organization_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Organization> {
                let row = not_found_as(
                    diesel::update(organizations::table.find(&organization_id))
                        .set((
                            organizations::name.eq(name),
                            organizations::updated_at.eq(now_utc()),
                        ))
                        .returning(OrganizationDB::as_returning())
                        .get_result(conn),
                    "Organization",
                )?;
                Ok(row.into())
            })
            .await
    }

    async fn add_member(&self, member: OrganizationMember) -> Result<OrganizationMember> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OrganizationMember> {
                let row = diesel::insert_into(organization_members::table)
                    .values(OrganizationMemberDB::from(member))
                    .returning(OrganizationMemberDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn remove_member(&self, organization_id: &str, user_id: &str) -> Result<usize> {
        let organization_id = organization_id.to_string();
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    organization_members::table
                        .filter(organization_members::organization_id.eq(organization_id))
                        .filter(organization_members::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
