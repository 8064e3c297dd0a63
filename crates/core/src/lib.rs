//! AdScout Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for AdScout.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod ad_creation;
pub mod ads;
pub mod advertisers;
pub mod canvas;
pub mod constants;
pub mod context;
pub mod errors;
pub mod events;
pub mod onboarding;
pub mod organizations;
pub mod platforms;
pub mod profile;
pub mod subscriptions;
pub mod utils;

pub use context::RequestContext;
pub use platforms::AdPlatform;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
