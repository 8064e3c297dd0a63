//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink, batches them, and:
//! - materializes the documents of newly created ads
//! - republishes the remaining events to SSE listeners of the owning tenant

mod planner;
mod queue_worker;
mod sink;

pub use sink::WebDomainEventSink;
