//! Organizations module - tenants, memberships and roles.

mod organizations_model;
mod organizations_service;
mod organizations_traits;

pub use organizations_model::{NewOrganization, Organization, OrganizationMember, OrganizationRole};
pub use organizations_service::OrganizationService;
pub use organizations_traits::{OrganizationRepositoryTrait, OrganizationServiceTrait};
