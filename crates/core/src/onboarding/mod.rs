//! Onboarding module - product profile and the generated strategy documents.

mod onboarding_model;
mod onboarding_service;
mod onboarding_traits;

pub use onboarding_model::{
    DocumentAnalysis, GeneratedDocument, GenerationStatus, OnboardingDocumentType,
    OnboardingProfile, OnboardingProgress, ProfileInput, ProfileStatus,
};
pub use onboarding_service::OnboardingService;
pub use onboarding_traits::{OnboardingRepositoryTrait, OnboardingServiceTrait};
