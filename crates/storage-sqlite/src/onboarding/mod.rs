//! SQLite storage implementation for onboarding profiles, generated documents
//! and their analyses.

mod model;
mod repository;

pub use model::{DocumentAnalysisDB, GeneratedDocumentDB, OnboardingProfileDB};
pub use repository::OnboardingRepository;
