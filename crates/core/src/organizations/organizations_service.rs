use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use super::organizations_model::{
    NewOrganization, Organization, OrganizationMember, OrganizationRole,
};
use super::organizations_traits::{OrganizationRepositoryTrait, OrganizationServiceTrait};
use crate::context::RequestContext;
use crate::errors::{Error, Result};
use crate::utils::text_utils::slugify;
use crate::utils::time_utils::now_utc;

pub struct OrganizationService {
    repository: Arc<dyn OrganizationRepositoryTrait>,
}

impl OrganizationService {
    pub fn new(repository: Arc<dyn OrganizationRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn require_membership(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
    ) -> Result<OrganizationMember> {
        self.repository
            .get_membership(organization_id, &ctx.user_id)?
            .ok_or_else(|| {
                Error::Unauthorized("not a member of this organization".to_string())
            })
    }

    fn require_manager(&self, ctx: &RequestContext, organization_id: &str) -> Result<()> {
        let membership = self.require_membership(ctx, organization_id)?;
        if !membership.role.can_manage() {
            return Err(Error::Unauthorized(
                "only owners and admins can manage the organization".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizationServiceTrait for OrganizationService {
    async fn create_organization(
        &self,
        ctx: &RequestContext,
        new_organization: NewOrganization,
    ) -> Result<Organization> {
        new_organization.validate()?;
        let id = Uuid::new_v4().to_string();
        let name = new_organization.name.trim().to_string();
        let mut slug = slugify(&name);
        if slug.is_empty() {
            slug = id.chars().take(8).collect();
        }
        let now = now_utc();
        let organization = Organization {
            id,
            name,
            slug,
            created_by: ctx.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        info!(
            "Creating organization '{}' for user {}",
            organization.name, ctx.user_id
        );
        self.repository.create(organization).await
    }

    fn list_organizations(&self, ctx: &RequestContext) -> Result<Vec<Organization>> {
        self.repository.list_for_user(&ctx.user_id)
    }

    fn get_organization(&self, ctx: &RequestContext, organization_id: &str) -> Result<Organization> {
        let organization = self.repository.get_by_id(organization_id)?;
        self.require_membership(ctx, organization_id)?;
        Ok(organization)
    }

    async fn update_organization(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        name: String,
    ) -> Result<Organization> {
        self.repository.get_by_id(organization_id)?;
        self.require_manager(ctx, organization_id)?;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_input("Organization name cannot be empty"));
        }
        self.repository.update_name(organization_id, name).await
    }

    fn list_members(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
    ) -> Result<Vec<OrganizationMember>> {
        self.require_membership(ctx, organization_id)?;
        self.repository.list_members(organization_id)
    }

    async fn add_member(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        user_id: String,
        role: OrganizationRole,
    ) -> Result<OrganizationMember> {
        self.require_manager(ctx, organization_id)?;
        let user_id = user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(Error::invalid_input("User id cannot be empty"));
        }
        if self
            .repository
            .get_membership(organization_id, &user_id)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(format!(
                "user {} is already a member",
                user_id
            )));
        }
        debug!("Adding {} to organization {} as {}", user_id, organization_id, role);
        self.repository
            .add_member(OrganizationMember {
                organization_id: organization_id.to_string(),
                user_id,
                role,
                joined_at: now_utc(),
            })
            .await
    }

    async fn remove_member(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        user_id: &str,
    ) -> Result<()> {
        self.require_manager(ctx, organization_id)?;
        let members = self.repository.list_members(organization_id)?;
        let target = members
            .iter()
            .find(|m| m.user_id == user_id)
            .ok_or_else(|| Error::NotFound(format!("Member {}", user_id)))?;
        if target.role == OrganizationRole::Owner {
            let owners = members
                .iter()
                .filter(|m| m.role == OrganizationRole::Owner)
                .count();
            if owners <= 1 {
                return Err(Error::invalid_input(
                    "Cannot remove the last owner of an organization",
                ));
            }
        }
        self.repository.remove_member(organization_id, user_id).await?;
        Ok(())
    }

    fn is_member(&self, organization_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .repository
            .get_membership(organization_id, user_id)?
            .is_some())
    }
}
