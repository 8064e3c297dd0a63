use async_trait::async_trait;

use super::profile_model::{ProfileUpdate, UserProfile};
use crate::context::RequestContext;
use crate::errors::Result;

#[async_trait]
pub trait ProfileRepositoryTrait: Send + Sync {
    fn get(&self, user_id: &str) -> Result<Option<UserProfile>>;
    /// Inserts or replaces the profile row keyed by `user_id`.
    async fn save(&self, profile: UserProfile) -> Result<UserProfile>;
}

#[async_trait]
pub trait ProfileServiceTrait: Send + Sync {
    async fn get_current_profile(&self, ctx: &RequestContext) -> Result<UserProfile>;
    async fn update_profile(&self, ctx: &RequestContext, update: ProfileUpdate)
        -> Result<UserProfile>;
    async fn set_active_organization(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
    ) -> Result<UserProfile>;
}
