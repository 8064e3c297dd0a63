//! Ad creation domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// The four taxonomies an ad is composed from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdFilterCategory {
    Concept,
    Angle,
    Style,
    Hook,
}

impl AdFilterCategory {
    pub const ALL: [AdFilterCategory; 4] = [
        AdFilterCategory::Concept,
        AdFilterCategory::Angle,
        AdFilterCategory::Style,
        AdFilterCategory::Hook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdFilterCategory::Concept => "concept",
            AdFilterCategory::Angle => "angle",
            AdFilterCategory::Style => "style",
            AdFilterCategory::Hook => "hook",
        }
    }
}

impl fmt::Display for AdFilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdFilterCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concept" | "concepts" => Ok(AdFilterCategory::Concept),
            "angle" | "angles" => Ok(AdFilterCategory::Angle),
            "style" | "styles" => Ok(AdFilterCategory::Style),
            "hook" | "hooks" => Ok(AdFilterCategory::Hook),
            other => Err(Error::invalid_input(format!(
                "Unknown filter category '{}'",
                other
            ))),
        }
    }
}

/// A taxonomy entry. Global entries have no organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdFilter {
    pub id: String,
    pub category: AdFilterCategory,
    pub organization_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
}

impl AdFilter {
    pub fn is_global(&self) -> bool {
        self.organization_id.is_none()
    }

    /// Global entries are visible to everyone, custom ones to their organization.
    pub fn visible_to(&self, organization_id: &str) -> bool {
        self.organization_id
            .as_deref()
            .map_or(true, |owner| owner == organization_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdFilter {
    pub category: AdFilterCategory,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

impl NewAdFilter {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Filter name cannot be empty"));
        }
        Ok(())
    }
}

/// An ad assembled from one entry of each filter category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAd {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    pub concept_id: String,
    pub angle_id: String,
    pub style_id: String,
    pub hook_id: String,
    pub selected_desires: Vec<String>,
    pub selected_beliefs: Vec<String>,
    pub pipeline_stage: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreatedAd {
    pub concept_id: String,
    pub angle_id: String,
    pub style_id: String,
    pub hook_id: String,
    #[serde(default)]
    pub selected_desires: Vec<String>,
    #[serde(default)]
    pub selected_beliefs: Vec<String>,
}

impl NewCreatedAd {
    /// Filter ids paired with the category each must belong to.
    pub fn filter_ids(&self) -> [(AdFilterCategory, &str); 4] {
        [
            (AdFilterCategory::Concept, self.concept_id.as_str()),
            (AdFilterCategory::Angle, self.angle_id.as_str()),
            (AdFilterCategory::Style, self.style_id.as_str()),
            (AdFilterCategory::Hook, self.hook_id.as_str()),
        ]
    }
}

/// The resolved filters behind a created ad. Entries may be missing when a
/// filter was deleted or reseeded after the ad was created.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    pub concept: Option<AdFilter>,
    pub angle: Option<AdFilter>,
    pub style: Option<AdFilter>,
    pub hook: Option<AdFilter>,
}

impl FilterSelection {
    pub fn get(&self, category: AdFilterCategory) -> Option<&AdFilter> {
        match category {
            AdFilterCategory::Concept => self.concept.as_ref(),
            AdFilterCategory::Angle => self.angle.as_ref(),
            AdFilterCategory::Style => self.style.as_ref(),
            AdFilterCategory::Hook => self.hook.as_ref(),
        }
    }

    pub fn set(&mut self, filter: AdFilter) {
        match filter.category {
            AdFilterCategory::Concept => self.concept = Some(filter),
            AdFilterCategory::Angle => self.angle = Some(filter),
            AdFilterCategory::Style => self.style = Some(filter),
            AdFilterCategory::Hook => self.hook = Some(filter),
        }
    }

    /// `"<concept> · <angle> · <style> · <hook>"`
    pub fn display_name(&self) -> String {
        AdFilterCategory::ALL
            .iter()
            .map(|category| {
                self.get(*category)
                    .map(|f| f.name.as_str())
                    .unwrap_or("?")
            })
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AdDocumentType {
    AdDetails,
    AdCopy,
    AdAssetBrief,
    AdNotes,
}

impl AdDocumentType {
    pub const ALL: [AdDocumentType; 4] = [
        AdDocumentType::AdDetails,
        AdDocumentType::AdCopy,
        AdDocumentType::AdAssetBrief,
        AdDocumentType::AdNotes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdDocumentType::AdDetails => "ad_details",
            AdDocumentType::AdCopy => "ad_copy",
            AdDocumentType::AdAssetBrief => "ad_asset_brief",
            AdDocumentType::AdNotes => "ad_notes",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AdDocumentType::AdDetails => "Ad Details",
            AdDocumentType::AdCopy => "Ad Copy",
            AdDocumentType::AdAssetBrief => "Asset Brief",
            AdDocumentType::AdNotes => "Notes",
        }
    }
}

impl fmt::Display for AdDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdDocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AdDocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("Unknown ad document type '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdDocumentStatus {
    Pending,
    Completed,
}

impl AdDocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdDocumentStatus::Pending => "pending",
            AdDocumentStatus::Completed => "completed",
        }
    }
}

impl FromStr for AdDocumentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(AdDocumentStatus::Pending),
            "completed" => Ok(AdDocumentStatus::Completed),
            other => Err(Error::invalid_input(format!(
                "Unknown document status '{}'",
                other
            ))),
        }
    }
}

/// Who produced an edit to an ad document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentEditSource {
    #[default]
    User,
    Assistant,
}

/// One of the four working documents of a created ad.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdDocument {
    pub id: String,
    pub created_ad_id: String,
    pub organization_id: String,
    pub document_type: AdDocumentType,
    pub content: String,
    pub version: i32,
    pub status: AdDocumentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AdDocument {
    /// Applies an edit. Assistant edits bump the version, user edits keep it.
    pub fn apply_edit(&mut self, content: String, source: DocumentEditSource, at: NaiveDateTime) {
        self.content = content;
        self.status = AdDocumentStatus::Completed;
        self.updated_at = at;
        if source == DocumentEditSource::Assistant {
            self.version += 1;
        }
    }
}
