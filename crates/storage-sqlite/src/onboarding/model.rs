use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::onboarding::{
    DocumentAnalysis, GeneratedDocument, GenerationStatus, OnboardingDocumentType,
    OnboardingProfile, ProfileStatus,
};

use crate::errors::StorageError;
use crate::utils::{parse_json_or_default, parse_text_or, to_json_text};

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    Insertable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::onboarding_profiles)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfileDB {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub product_name: String,
    pub product_description: String,
    pub target_audience: Option<String>,
    pub website_url: Option<String>,
    pub competitors: String,
    pub additional_context: Option<String>,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub completed_at: Option<chrono::NaiveDateTime>,
}

#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::onboarding_documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocumentDB {
    pub id: String,
    pub profile_id: String,
    pub organization_id: String,
    pub document_type: String,
    pub content: Option<String>,
    pub status: String,
    pub error: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::document_analyses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysisDB {
    pub id: String,
    pub profile_id: String,
    pub organization_id: String,
    pub document_type: String,
    pub status: String,
    pub analysis: Option<String>,
    pub error: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<OnboardingProfileDB> for OnboardingProfile {
    fn from(db: OnboardingProfileDB) -> Self {
        Self {
            competitors: parse_json_or_default(&db.competitors, "onboarding_profiles.competitors"),
            status: parse_text_or(
                &db.status,
                ProfileStatus::Draft,
                "onboarding_profiles.status",
            ),
            id: db.id,
            organization_id: db.organization_id,
            user_id: db.user_id,
            product_name: db.product_name,
            product_description: db.product_description,
            target_audience: db.target_audience,
            website_url: db.website_url,
            additional_context: db.additional_context,
            created_at: db.created_at,
            updated_at: db.updated_at,
            completed_at: db.completed_at,
        }
    }
}

impl TryFrom<OnboardingProfile> for OnboardingProfileDB {
    type Error = StorageError;

    fn try_from(domain: OnboardingProfile) -> Result<Self, Self::Error> {
        Ok(Self {
            competitors: to_json_text(&domain.competitors)?,
            status: domain.status.as_str().to_string(),
            id: domain.id,
            organization_id: domain.organization_id,
            user_id: domain.user_id,
            product_name: domain.product_name,
            product_description: domain.product_description,
            target_audience: domain.target_audience,
            website_url: domain.website_url,
            additional_context: domain.additional_context,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            completed_at: domain.completed_at,
        })
    }
}

impl From<GeneratedDocumentDB> for GeneratedDocument {
    fn from(db: GeneratedDocumentDB) -> Self {
        Self {
            document_type: parse_text_or(
                &db.document_type,
                OnboardingDocumentType::OfferBrief,
                "onboarding_documents.document_type",
            ),
            status: parse_text_or(
                &db.status,
                GenerationStatus::Pending,
                "onboarding_documents.status",
            ),
            id: db.id,
            profile_id: db.profile_id,
            organization_id: db.organization_id,
            content: db.content,
            error: db.error,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<GeneratedDocument> for GeneratedDocumentDB {
    fn from(domain: GeneratedDocument) -> Self {
        Self {
            id: domain.id,
            profile_id: domain.profile_id,
            organization_id: domain.organization_id,
            document_type: domain.document_type.as_str().to_string(),
            content: domain.content,
            status: domain.status.as_str().to_string(),
            error: domain.error,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl From<DocumentAnalysisDB> for DocumentAnalysis {
    fn from(db: DocumentAnalysisDB) -> Self {
        let analysis = db.analysis.as_deref().and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| {
                    log::error!("Failed to decode analysis {}: {}", db.id, e);
                })
                .ok()
        });
        Self {
            document_type: parse_text_or(
                &db.document_type,
                OnboardingDocumentType::OfferBrief,
                "document_analyses.document_type",
            ),
            status: parse_text_or(
                &db.status,
                GenerationStatus::Pending,
                "document_analyses.status",
            ),
            analysis,
            id: db.id,
            profile_id: db.profile_id,
            organization_id: db.organization_id,
            error: db.error,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TryFrom<DocumentAnalysis> for DocumentAnalysisDB {
    type Error = StorageError;

    fn try_from(domain: DocumentAnalysis) -> Result<Self, Self::Error> {
        Ok(Self {
            analysis: domain.analysis.as_ref().map(to_json_text).transpose()?,
            id: domain.id,
            profile_id: domain.profile_id,
            organization_id: domain.organization_id,
            document_type: domain.document_type.as_str().to_string(),
            status: domain.status.as_str().to_string(),
            error: domain.error,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}
