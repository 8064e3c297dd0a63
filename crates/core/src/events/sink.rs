//! Where services send their domain events.

use std::sync::{Arc, Mutex};

use super::DomainEvent;

/// Receives the events core services emit after a successful write.
///
/// `emit` is called while the request is still being served, so it must not
/// block and must not fail the write that produced the event.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

/// Discards every event. Used where no follow-up work is wired, such as
/// storage tests that drive services directly.
#[derive(Clone, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Keeps emitted events in order so service tests can assert on them.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events that belong to one organization; user-scoped events are skipped.
    pub fn for_organization(&self, organization_id: &str) -> Vec<DomainEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.organization_id() == Some(organization_id))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl DomainEventSink for RecordingEventSink {
    fn emit(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_events_keep_emission_order() {
        let sink = RecordingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(DomainEvent::created_ad_inserted("ad-1", "org-a"));
        sink.emit(DomainEvent::ad_documents_ready("ad-1", "org-a"));
        sink.emit(DomainEvent::canvas_changed("canvas-1", "org-a"));

        assert_eq!(
            sink.events(),
            vec![
                DomainEvent::created_ad_inserted("ad-1", "org-a"),
                DomainEvent::ad_documents_ready("ad-1", "org-a"),
                DomainEvent::canvas_changed("canvas-1", "org-a"),
            ]
        );
    }

    #[test]
    fn organization_view_excludes_other_tenants_and_user_events() {
        let sink = RecordingEventSink::new();
        sink.emit(DomainEvent::created_ad_inserted("ad-1", "org-a"));
        sink.emit(DomainEvent::subscription_created("sub-1", "user-1"));
        sink.emit(DomainEvent::onboarding_generation_requested("profile-1", "org-b"));
        sink.emit(DomainEvent::canvas_changed("canvas-1", "org-a"));

        assert_eq!(
            sink.for_organization("org-a"),
            vec![
                DomainEvent::created_ad_inserted("ad-1", "org-a"),
                DomainEvent::canvas_changed("canvas-1", "org-a"),
            ]
        );
        assert_eq!(
            sink.for_organization("org-b"),
            vec![DomainEvent::onboarding_generation_requested("profile-1", "org-b")]
        );
        assert!(sink.for_organization("user-1").is_empty());
    }

    #[test]
    fn noop_sink_accepts_events() {
        let sink: Arc<dyn DomainEventSink> = Arc::new(NoOpDomainEventSink);
        sink.emit(DomainEvent::created_ad_inserted("ad-1", "org-a"));
    }
}
