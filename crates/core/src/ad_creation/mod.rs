//! Ad creation module - filter taxonomy, created ads and their documents.

mod ad_creation_model;
mod ad_creation_seeds;
mod ad_creation_service;
mod ad_creation_templates;
mod ad_creation_traits;

pub use ad_creation_model::{
    AdDocument, AdDocumentStatus, AdDocumentType, AdFilter, AdFilterCategory, CreatedAd,
    DocumentEditSource, FilterSelection, NewAdFilter, NewCreatedAd,
};
pub use ad_creation_seeds::seed_entries;
pub use ad_creation_service::AdCreationService;
pub use ad_creation_templates::render_document;
pub use ad_creation_traits::{AdCreationRepositoryTrait, AdCreationServiceTrait};
