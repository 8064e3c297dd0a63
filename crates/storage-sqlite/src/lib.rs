//! SQLite storage implementation for AdScout.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `adscout-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate and the server are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)          apps/server (HTTP)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Writes are funnelled through a single
//! writer task ([`WriteHandle`]) so each repository write runs in one
//! `IMMEDIATE` transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod ad_creation;
pub mod ads;
pub mod advertisers;
pub mod canvas;
pub mod onboarding;
pub mod organizations;
pub mod profile;
pub mod subscriptions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from adscout-core for convenience
pub use adscout_core::errors::{DatabaseError, Error, Result};
