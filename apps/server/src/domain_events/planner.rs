//! Event planning functions for domain events.
//!
//! These functions look at a batch of domain events and decide what follow-up
//! work to run and which notifications to push to clients.

use std::collections::HashSet;

use serde_json::json;
use adscout_core::events::DomainEvent;

use crate::events::{
    EventScope, ServerEvent, AD_DOCUMENTS_READY, CANVAS_CHANGED,
    ONBOARDING_GENERATION_REQUESTED, SUBSCRIPTION_CREATED,
};

/// A created ad whose documents still have to be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentJob {
    pub created_ad_id: String,
    pub organization_id: String,
}

/// Collects the created ads of the batch, each once, in arrival order.
pub fn plan_document_jobs(events: &[DomainEvent]) -> Vec<DocumentJob> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut jobs = Vec::new();
    for event in events {
        if let DomainEvent::CreatedAdInserted {
            created_ad_id,
            organization_id,
        } = event
        {
            if seen.insert(created_ad_id.as_str()) {
                jobs.push(DocumentJob {
                    created_ad_id: created_ad_id.clone(),
                    organization_id: organization_id.clone(),
                });
            }
        }
    }
    jobs
}

/// Translates the batch into client notifications.
///
/// Repeated `CanvasChanged` events for the same canvas collapse into one.
pub fn plan_notifications(events: &[DomainEvent]) -> Vec<ServerEvent> {
    let mut changed_canvases: HashSet<&str> = HashSet::new();
    let mut notifications = Vec::new();

    for event in events {
        match event {
            DomainEvent::CreatedAdInserted { .. } => {}
            DomainEvent::AdDocumentsReady {
                created_ad_id,
                organization_id,
            } => notifications.push(ServerEvent::with_payload(
                AD_DOCUMENTS_READY,
                EventScope::Organization(organization_id.clone()),
                json!({ "createdAdId": created_ad_id }),
            )),
            DomainEvent::OnboardingGenerationRequested {
                profile_id,
                organization_id,
            } => notifications.push(ServerEvent::with_payload(
                ONBOARDING_GENERATION_REQUESTED,
                EventScope::Organization(organization_id.clone()),
                json!({ "profileId": profile_id }),
            )),
            DomainEvent::SubscriptionCreated {
                subscription_id,
                user_id,
            } => notifications.push(ServerEvent::with_payload(
                SUBSCRIPTION_CREATED,
                EventScope::User(user_id.clone()),
                json!({ "subscriptionId": subscription_id }),
            )),
            DomainEvent::CanvasChanged {
                canvas_id,
                organization_id,
            } => {
                if changed_canvases.insert(canvas_id.as_str()) {
                    notifications.push(ServerEvent::with_payload(
                        CANVAS_CHANGED,
                        EventScope::Organization(organization_id.clone()),
                        json!({ "canvasId": canvas_id }),
                    ));
                }
            }
        }
    }

    notifications
}
