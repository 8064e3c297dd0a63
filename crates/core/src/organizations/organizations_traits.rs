//! Organization repository and service traits.

use async_trait::async_trait;

use super::organizations_model::{
    NewOrganization, Organization, OrganizationMember, OrganizationRole,
};
use crate::context::RequestContext;
use crate::errors::Result;

#[async_trait]
pub trait OrganizationRepositoryTrait: Send + Sync {
    fn get_by_id(&self, organization_id: &str) -> Result<Organization>;
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Organization>>;
    fn get_membership(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>>;
    fn list_members(&self, organization_id: &str) -> Result<Vec<OrganizationMember>>;

    /// Inserts the organization and its owner membership in one transaction.
    async fn create(&self, organization: Organization) -> Result<Organization>;
    async fn update_name(&self, organization_id: &str, name: String) -> Result<Organization>;
    async fn add_member(&self, member: OrganizationMember) -> Result<OrganizationMember>;
    async fn remove_member(&self, organization_id: &str, user_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait OrganizationServiceTrait: Send + Sync {
    async fn create_organization(
        &self,
        ctx: &RequestContext,
        new_organization: NewOrganization,
    ) -> Result<Organization>;
    fn list_organizations(&self, ctx: &RequestContext) -> Result<Vec<Organization>>;
    fn get_organization(&self, ctx: &RequestContext, organization_id: &str) -> Result<Organization>;
    async fn update_organization(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        name: String,
    ) -> Result<Organization>;
    fn list_members(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
    ) -> Result<Vec<OrganizationMember>>;
    async fn add_member(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        user_id: String,
        role: OrganizationRole,
    ) -> Result<OrganizationMember>;
    async fn remove_member(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
        user_id: &str,
    ) -> Result<()>;
    /// Membership lookup used by other modules (profile, server context checks).
    fn is_member(&self, organization_id: &str, user_id: &str) -> Result<bool>;
}
