//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. The runtime adapter
/// translates them into follow-up work (document materialization) or
/// notifications for connected clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A created ad was inserted; its companion documents still have to be built.
    CreatedAdInserted {
        created_ad_id: String,
        organization_id: String,
    },

    /// The companion documents of a created ad were materialized.
    AdDocumentsReady {
        created_ad_id: String,
        organization_id: String,
    },

    /// Onboarding documents were reset to pending and await the external workflow.
    OnboardingGenerationRequested {
        profile_id: String,
        organization_id: String,
    },

    /// A subscription was created and can be handed to the scraper.
    SubscriptionCreated {
        subscription_id: String,
        user_id: String,
    },

    /// Nodes or edges of a canvas were created, moved, regrouped or deleted.
    CanvasChanged {
        canvas_id: String,
        organization_id: String,
    },
}

impl DomainEvent {
    pub fn created_ad_inserted(
        created_ad_id: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        Self::CreatedAdInserted {
            created_ad_id: created_ad_id.into(),
            organization_id: organization_id.into(),
        }
    }

    pub fn ad_documents_ready(
        created_ad_id: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        Self::AdDocumentsReady {
            created_ad_id: created_ad_id.into(),
            organization_id: organization_id.into(),
        }
    }

    pub fn onboarding_generation_requested(
        profile_id: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        Self::OnboardingGenerationRequested {
            profile_id: profile_id.into(),
            organization_id: organization_id.into(),
        }
    }

    pub fn subscription_created(
        subscription_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self::SubscriptionCreated {
            subscription_id: subscription_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn canvas_changed(canvas_id: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self::CanvasChanged {
            canvas_id: canvas_id.into(),
            organization_id: organization_id.into(),
        }
    }

    /// Organization the event belongs to. Subscription events are scoped to
    /// a user and return `None`.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Self::CreatedAdInserted { organization_id, .. }
            | Self::AdDocumentsReady { organization_id, .. }
            | Self::OnboardingGenerationRequested { organization_id, .. }
            | Self::CanvasChanged { organization_id, .. } => Some(organization_id.as_str()),
            Self::SubscriptionCreated { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let event = DomainEvent::created_ad_inserted("ad-1", "org-1");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("created_ad_inserted"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_canvas_changed_carries_organization() {
        let event = DomainEvent::canvas_changed("canvas-1", "org-1");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "canvas_changed");
        assert_eq!(value["canvas_id"], "canvas-1");
        assert_eq!(value["organization_id"], "org-1");
    }

    #[test]
    fn subscription_events_have_no_organization() {
        assert_eq!(
            DomainEvent::subscription_created("sub-1", "user-1").organization_id(),
            None
        );
        assert_eq!(
            DomainEvent::ad_documents_ready("ad-1", "org-1").organization_id(),
            Some("org-1")
        );
    }
}
