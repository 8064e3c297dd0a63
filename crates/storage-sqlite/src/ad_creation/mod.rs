//! SQLite storage implementation for the ad creation workspace: filters,
//! created ads and their documents.

mod model;
mod repository;

pub use model::{AdDocumentDB, AdFilterDB, CreatedAdDB};
pub use repository::AdCreationRepository;
