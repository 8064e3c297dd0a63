//! Caller identity carried into every service call.
//!
//! The server builds a [`RequestContext`] from a validated bearer token. Every
//! organization-scoped read or write compares the record's organization id
//! with the one resolved here; user-scoped records compare the owner id.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub user_id: String,
    pub organization_id: Option<String>,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, organization_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            organization_id: organization_id.filter(|org| !org.trim().is_empty()),
        }
    }

    /// Returns the selected organization or fails with `NoOrganizationSelected`.
    pub fn organization_id(&self) -> Result<&str> {
        self.organization_id
            .as_deref()
            .ok_or(Error::NoOrganizationSelected)
    }

    /// Fails with `Unauthorized` unless the record belongs to the caller's organization.
    pub fn ensure_org_access(&self, record_organization_id: &str) -> Result<()> {
        let org_id = self.organization_id()?;
        if org_id != record_organization_id {
            return Err(Error::Unauthorized(
                "record belongs to another organization".to_string(),
            ));
        }
        Ok(())
    }

    /// Fails with `Unauthorized` unless the record is owned by the caller.
    pub fn ensure_owner(&self, record_user_id: &str) -> Result<()> {
        if self.user_id != record_user_id {
            return Err(Error::Unauthorized(
                "record belongs to another user".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_organization_counts_as_missing() {
        let ctx = RequestContext::new("user-1", Some("  ".to_string()));
        assert!(matches!(
            ctx.organization_id(),
            Err(Error::NoOrganizationSelected)
        ));
    }

    #[test]
    fn org_access_is_string_equality() {
        let ctx = RequestContext::new("user-1", Some("org-a".to_string()));
        assert!(ctx.ensure_org_access("org-a").is_ok());
        assert!(matches!(
            ctx.ensure_org_access("org-b"),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn org_access_without_organization_fails_first() {
        let ctx = RequestContext::new("user-1", None);
        assert!(matches!(
            ctx.ensure_org_access("org-a"),
            Err(Error::NoOrganizationSelected)
        ));
    }

    #[test]
    fn owner_check() {
        let ctx = RequestContext::new("user-1", None);
        assert!(ctx.ensure_owner("user-1").is_ok());
        assert!(ctx.ensure_owner("user-2").is_err());
    }
}
