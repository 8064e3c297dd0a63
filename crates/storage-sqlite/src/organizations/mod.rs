//! SQLite storage implementation for organizations and their members.

mod model;
mod repository;

pub use model::{OrganizationDB, OrganizationMemberDB};
pub use repository::OrganizationRepository;
