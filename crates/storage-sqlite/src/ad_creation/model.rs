use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::ad_creation::{
    AdDocument, AdDocumentStatus, AdDocumentType, AdFilter, AdFilterCategory, CreatedAd,
};

use crate::errors::StorageError;
use crate::utils::{parse_json_or_default, parse_text_or, to_json_text};

#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::ad_filters)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AdFilterDB {
    pub id: String,
    pub category: String,
    pub organization_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: chrono::NaiveDateTime,
}

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
#[diesel(table_name = crate::schema::created_ads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CreatedAdDB {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    pub concept_id: String,
    pub angle_id: String,
    pub style_id: String,
    pub hook_id: String,
    pub selected_desires: String,
    pub selected_beliefs: String,
    pub pipeline_stage: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

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
#[diesel(table_name = crate::schema::ad_documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AdDocumentDB {
    pub id: String,
    pub created_ad_id: String,
    pub organization_id: String,
    pub document_type: String,
    pub content: String,
    pub version: i32,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<AdFilterDB> for AdFilter {
    fn from(db: AdFilterDB) -> Self {
        Self {
            category: parse_text_or(
                &db.category,
                AdFilterCategory::Concept,
                "ad_filters.category",
            ),
            id: db.id,
            organization_id: db.organization_id,
            name: db.name,
            description: db.description,
            sort_order: db.sort_order,
            created_at: db.created_at,
        }
    }
}

impl From<AdFilter> for AdFilterDB {
    fn from(domain: AdFilter) -> Self {
        Self {
            id: domain.id,
            category: domain.category.as_str().to_string(),
            organization_id: domain.organization_id,
            name: domain.name,
            description: domain.description,
            sort_order: domain.sort_order,
            created_at: domain.created_at,
        }
    }
}

impl From<CreatedAdDB> for CreatedAd {
    fn from(db: CreatedAdDB) -> Self {
        Self {
            selected_desires: parse_json_or_default(
                &db.selected_desires,
                "created_ads.selected_desires",
            ),
            selected_beliefs: parse_json_or_default(
                &db.selected_beliefs,
                "created_ads.selected_beliefs",
            ),
            id: db.id,
            organization_id: db.organization_id,
            user_id: db.user_id,
            name: db.name,
            concept_id: db.concept_id,
            angle_id: db.angle_id,
            style_id: db.style_id,
            hook_id: db.hook_id,
            pipeline_stage: db.pipeline_stage,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TryFrom<CreatedAd> for CreatedAdDB {
    type Error = StorageError;

    fn try_from(domain: CreatedAd) -> Result<Self, Self::Error> {
        Ok(Self {
            selected_desires: to_json_text(&domain.selected_desires)?,
            selected_beliefs: to_json_text(&domain.selected_beliefs)?,
            id: domain.id,
            organization_id: domain.organization_id,
            user_id: domain.user_id,
            name: domain.name,
            concept_id: domain.concept_id,
            angle_id: domain.angle_id,
            style_id: domain.style_id,
            hook_id: domain.hook_id,
            pipeline_stage: domain.pipeline_stage,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}

impl From<AdDocumentDB> for AdDocument {
    fn from(db: AdDocumentDB) -> Self {
        Self {
            document_type: parse_text_or(
                &db.document_type,
                AdDocumentType::AdNotes,
                "ad_documents.document_type",
            ),
            status: parse_text_or(
                &db.status,
                AdDocumentStatus::Pending,
                "ad_documents.status",
            ),
            id: db.id,
            created_ad_id: db.created_ad_id,
            organization_id: db.organization_id,
            content: db.content,
            version: db.version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<AdDocument> for AdDocumentDB {
    fn from(domain: AdDocument) -> Self {
        Self {
            id: domain.id,
            created_ad_id: domain.created_ad_id,
            organization_id: domain.organization_id,
            document_type: domain.document_type.as_str().to_string(),
            content: domain.content,
            version: domain.version,
            status: domain.status.as_str().to_string(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
