use serde_json::Value;
use tokio::sync::broadcast;

use adscout_core::RequestContext;

/// Canonical event names pushed to connected clients.
pub const AD_DOCUMENTS_READY: &str = "ad-documents:ready";
pub const AD_DOCUMENTS_ERROR: &str = "ad-documents:error";
pub const CANVAS_CHANGED: &str = "canvas:changed";
pub const ONBOARDING_GENERATION_REQUESTED: &str = "onboarding:generation-requested";
pub const SUBSCRIPTION_CREATED: &str = "subscription:created";

/// Who may receive an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventScope {
    Organization(String),
    User(String),
}

/// Serializable envelope that carries event names and optional payloads.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub scope: EventScope,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn with_payload(name: &'static str, scope: EventScope, payload: Value) -> Self {
        Self {
            name,
            scope,
            payload: Some(payload),
        }
    }

    pub fn is_visible_to(&self, ctx: &RequestContext) -> bool {
        match &self.scope {
            EventScope::Organization(org) => ctx.organization_id.as_deref() == Some(org.as_str()),
            EventScope::User(user) => ctx.user_id == *user,
        }
    }
}

/// Lightweight broadcast bus that fans out events to any connected clients.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // Lagging listeners are ignored to avoid blocking producers.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn organization_events_stay_inside_the_organization() {
        let event = ServerEvent::with_payload(
            CANVAS_CHANGED,
            EventScope::Organization("org-a".into()),
            json!({ "canvasId": "c1" }),
        );
        assert!(event.is_visible_to(&RequestContext::new("u1", Some("org-a".into()))));
        assert!(!event.is_visible_to(&RequestContext::new("u1", Some("org-b".into()))));
        assert!(!event.is_visible_to(&RequestContext::new("u1", None)));
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(ServerEvent::with_payload(
            SUBSCRIPTION_CREATED,
            EventScope::User("u1".into()),
            json!({ "subscriptionId": "s1" }),
        ));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.name, SUBSCRIPTION_CREATED);
        assert!(received.is_visible_to(&RequestContext::new("u1", None)));
        assert!(!received.is_visible_to(&RequestContext::new("u2", None)));
    }
}
