//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, collects them into short fixed windows,
//! then materializes created-ad documents and pushes client notifications.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use adscout_core::{ad_creation::AdCreationServiceTrait, events::DomainEvent};

use super::planner::{plan_document_jobs, plan_notifications, DocumentJob};
use crate::events::{EventBus, EventScope, ServerEvent, AD_DOCUMENTS_ERROR};

/// Maximum age of a batch before it is processed.
const BATCH_WINDOW: Duration = Duration::from_millis(250);

/// Dependencies needed by the queue worker for processing events.
pub struct QueueWorkerDeps {
    pub ad_creation_service: Arc<dyn AdCreationServiceTrait>,
    pub event_bus: EventBus,
}

/// Runs the event queue worker until the sending side is dropped.
///
/// Batches are processed inline, so a batch never overlaps the previous one.
pub async fn event_queue_worker(
    rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    collect_batches(rx, BATCH_WINDOW, |batch| {
        let deps = deps.clone();
        async move { process_event_batch(&batch, &deps).await }
    })
    .await;

    tracing::info!("Domain event queue worker shutting down");
}

/// Groups incoming events into batches and hands each batch to `handle`.
///
/// The window opens with the first event of a batch and is not extended by
/// later arrivals. A steady stream still yields a batch every `window`.
async fn collect_batches<F, Fut>(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    window: Duration,
    mut handle: F,
) where
    F: FnMut(Vec<DomainEvent>) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut pending_events: Vec<DomainEvent> = Vec::new();
    let mut deadline = Instant::now();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(e) => pending_events.push(e),
                None => break,
            }
            deadline = Instant::now() + window;
            continue;
        }

        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(e) => pending_events.push(e),
                    None => {
                        handle(std::mem::take(&mut pending_events)).await;
                        break;
                    }
                }
            }
            _ = sleep_until(deadline) => {
                handle(std::mem::take(&mut pending_events)).await;
            }
        }
    }
}

/// Processes a batch of domain events.
async fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    tracing::debug!("Processing batch of {} domain event(s)", events.len());

    for notification in plan_notifications(events) {
        deps.event_bus.publish(notification);
    }

    for job in plan_document_jobs(events) {
        run_document_job(deps, job).await;
    }
}

/// Materializes the documents of one created ad.
///
/// Success is announced by the `AdDocumentsReady` event the service emits,
/// which arrives with the next batch. Failures are published right away.
async fn run_document_job(deps: &QueueWorkerDeps, job: DocumentJob) {
    match deps
        .ad_creation_service
        .initialize_documents(&job.created_ad_id)
        .await
    {
        Ok(documents) => {
            tracing::info!(
                "Materialized {} document(s) for created ad {}",
                documents.len(),
                job.created_ad_id
            );
        }
        Err(e) => {
            tracing::warn!(
                "Document materialization failed for created ad {}: {}",
                job.created_ad_id,
                e
            );
            deps.event_bus.publish(ServerEvent::with_payload(
                AD_DOCUMENTS_ERROR,
                EventScope::Organization(job.organization_id),
                json!({ "createdAdId": job.created_ad_id, "message": e.to_string() }),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn steady_traffic_does_not_hold_back_a_batch() {
        let (tx, rx) = mpsc::unbounded_channel();
        let batches: Arc<Mutex<Vec<(Instant, Vec<DomainEvent>)>>> = Arc::default();

        let recorded = batches.clone();
        let worker = tokio::spawn(collect_batches(rx, Duration::from_millis(100), move |batch| {
            recorded.lock().unwrap().push((Instant::now(), batch));
            async {}
        }));

        tx.send(DomainEvent::created_ad_inserted("ad-1", "org-a"))
            .unwrap();
        for _ in 0..30 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tx.send(DomainEvent::canvas_changed("c1", "org-b")).unwrap();
        }
        let traffic_ended = Instant::now();
        drop(tx);
        worker.await.unwrap();

        let batches = batches.lock().unwrap();
        let (processed_at, first) = &batches[0];
        assert!(*processed_at < traffic_ended);
        assert!(matches!(
            &first[0],
            DomainEvent::CreatedAdInserted { created_ad_id, .. } if created_ad_id == "ad-1"
        ));
        assert!(batches.len() >= 3);
        let total: usize = batches.iter().map(|(_, batch)| batch.len()).sum();
        assert_eq!(total, 31);
    }

    #[tokio::test]
    async fn pending_events_are_flushed_when_the_sender_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let batches: Arc<Mutex<Vec<Vec<DomainEvent>>>> = Arc::default();

        tx.send(DomainEvent::created_ad_inserted("ad-1", "org-a"))
            .unwrap();
        tx.send(DomainEvent::created_ad_inserted("ad-2", "org-a"))
            .unwrap();
        drop(tx);

        let recorded = batches.clone();
        collect_batches(rx, Duration::from_secs(60), move |batch| {
            recorded.lock().unwrap().push(batch);
            async {}
        })
        .await;

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }
}
