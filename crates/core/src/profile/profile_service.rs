use async_trait::async_trait;
use std::sync::Arc;

use super::profile_model::{ProfileUpdate, UserProfile};
use super::profile_traits::{ProfileRepositoryTrait, ProfileServiceTrait};
use crate::context::RequestContext;
use crate::errors::{Error, Result};
use crate::organizations::OrganizationServiceTrait;
use crate::utils::text_utils::normalize_optional;
use crate::utils::time_utils::now_utc;

pub struct ProfileService {
    repository: Arc<dyn ProfileRepositoryTrait>,
    organization_service: Arc<dyn OrganizationServiceTrait>,
}

impl ProfileService {
    pub fn new(
        repository: Arc<dyn ProfileRepositoryTrait>,
        organization_service: Arc<dyn OrganizationServiceTrait>,
    ) -> Self {
        Self {
            repository,
            organization_service,
        }
    }

    fn default_profile(ctx: &RequestContext) -> UserProfile {
        let now = now_utc();
        UserProfile {
            user_id: ctx.user_id.clone(),
            display_name: ctx.user_id.clone(),
            email: None,
            avatar_url: None,
            active_organization_id: ctx.organization_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl ProfileServiceTrait for ProfileService {
    async fn get_current_profile(&self, ctx: &RequestContext) -> Result<UserProfile> {
        match self.repository.get(&ctx.user_id)? {
            Some(profile) => Ok(profile),
            None => self.repository.save(Self::default_profile(ctx)).await,
        }
    }

    async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: ProfileUpdate,
    ) -> Result<UserProfile> {
        let mut profile = self.get_current_profile(ctx).await?;
        if let Some(display_name) = update.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(Error::invalid_input("Display name cannot be empty"));
            }
            profile.display_name = display_name;
        }
        if update.email.is_some() {
            profile.email = normalize_optional(update.email);
        }
        if update.avatar_url.is_some() {
            profile.avatar_url = normalize_optional(update.avatar_url);
        }
        profile.updated_at = now_utc();
        self.repository.save(profile).await
    }

    async fn set_active_organization(
        &self,
        ctx: &RequestContext,
        organization_id: &str,
    ) -> Result<UserProfile> {
        if !self
            .organization_service
            .is_member(organization_id, &ctx.user_id)?
        {
            return Err(Error::Unauthorized(
                "not a member of this organization".to_string(),
            ));
        }
        let mut profile = self.get_current_profile(ctx).await?;
        profile.active_organization_id = Some(organization_id.to_string());
        profile.updated_at = now_utc();
        self.repository.save(profile).await
    }
}
