//! Web domain event sink implementation.
//!
//! Receives domain events and sends them to a background queue worker.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use adscout_core::{
    ad_creation::AdCreationServiceTrait,
    events::{DomainEvent, DomainEventSink},
};

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};
use crate::events::EventBus;

/// Domain event sink for the web server runtime.
///
/// The ad creation service needs the sink and the worker needs the ad creation
/// service, so the sink is built first with `new()` and the worker is spawned
/// with `start_worker()` once every service exists. Events emitted in between
/// are buffered by the channel.
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Spawns the background worker. Only the first call has an effect.
    pub fn start_worker(
        &self,
        ad_creation_service: Arc<dyn AdCreationServiceTrait>,
        event_bus: EventBus,
    ) {
        let rx = match self.rx.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(rx) = rx else {
            tracing::warn!("Domain event worker already started");
            return;
        };

        let deps = Arc::new(QueueWorkerDeps {
            ad_creation_service,
            event_bus,
        });
        tokio::spawn(event_queue_worker(rx, deps));
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Domain events are best-effort; a closed channel only loses the notification.
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}
