//! Onboarding domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::errors::{Error, Result, ValidationError};
use crate::utils::text_utils::normalize_optional;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Draft,
    Generating,
    Completed,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Draft => "draft",
            ProfileStatus::Generating => "generating",
            ProfileStatus::Completed => "completed",
        }
    }
}

impl FromStr for ProfileStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(ProfileStatus::Draft),
            "generating" => Ok(ProfileStatus::Generating),
            "completed" => Ok(ProfileStatus::Completed),
            other => Err(Error::invalid_input(format!(
                "Unknown profile status '{}'",
                other
            ))),
        }
    }
}

/// The product profile an organization fills in during onboarding.
/// There is at most one per organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub product_name: String,
    pub product_description: String,
    pub target_audience: Option<String>,
    pub website_url: Option<String>,
    pub competitors: Vec<String>,
    pub additional_context: Option<String>,
    pub status: ProfileStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub product_name: String,
    pub product_description: String,
    pub target_audience: Option<String>,
    pub website_url: Option<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
    pub additional_context: Option<String>,
}

impl ProfileInput {
    /// Trims every field, drops blank competitors and checks required fields.
    pub fn normalized(self) -> Result<Self> {
        let product_name = self.product_name.trim().to_string();
        if product_name.is_empty() {
            return Err(ValidationError::MissingField("productName".to_string()).into());
        }
        let product_description = self.product_description.trim().to_string();
        if product_description.is_empty() {
            return Err(ValidationError::MissingField("productDescription".to_string()).into());
        }
        let website_url = normalize_optional(self.website_url);
        if let Some(url) = &website_url {
            let parsed = Url::parse(url)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ValidationError::InvalidUrl(url.clone()).into());
            }
        }
        Ok(Self {
            product_name,
            product_description,
            target_audience: normalize_optional(self.target_audience),
            website_url,
            competitors: self
                .competitors
                .into_iter()
                .filter_map(|c| normalize_optional(Some(c)))
                .collect(),
            additional_context: normalize_optional(self.additional_context),
        })
    }
}

/// The fixed set of documents generated from a profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingDocumentType {
    OfferBrief,
    CopyBlocks,
    UmpUms,
    BeatMap,
    BuildABuyer,
    PainCoreWound,
    Competitors,
}

impl OnboardingDocumentType {
    pub const ALL: [OnboardingDocumentType; 7] = [
        OnboardingDocumentType::OfferBrief,
        OnboardingDocumentType::CopyBlocks,
        OnboardingDocumentType::UmpUms,
        OnboardingDocumentType::BeatMap,
        OnboardingDocumentType::BuildABuyer,
        OnboardingDocumentType::PainCoreWound,
        OnboardingDocumentType::Competitors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingDocumentType::OfferBrief => "offer_brief",
            OnboardingDocumentType::CopyBlocks => "copy_blocks",
            OnboardingDocumentType::UmpUms => "ump_ums",
            OnboardingDocumentType::BeatMap => "beat_map",
            OnboardingDocumentType::BuildABuyer => "build_a_buyer",
            OnboardingDocumentType::PainCoreWound => "pain_core_wound",
            OnboardingDocumentType::Competitors => "competitors",
        }
    }
}

impl fmt::Display for OnboardingDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingDocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OnboardingDocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("Unknown document type '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Pending => "pending",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GenerationStatus::Pending)
    }
}

impl FromStr for GenerationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(GenerationStatus::Pending),
            "completed" => Ok(GenerationStatus::Completed),
            "failed" => Ok(GenerationStatus::Failed),
            other => Err(Error::invalid_input(format!(
                "Unknown generation status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub id: String,
    pub profile_id: String,
    pub organization_id: String,
    pub document_type: OnboardingDocumentType,
    pub content: Option<String>,
    pub status: GenerationStatus,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub id: String,
    pub profile_id: String,
    pub organization_id: String,
    pub document_type: OnboardingDocumentType,
    pub status: GenerationStatus,
    pub analysis: Option<Value>,
    pub error: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Counts of terminal rows for a profile, read back without a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    pub profile_status: ProfileStatus,
    pub total: usize,
    pub documents_completed: usize,
    pub documents_failed: usize,
    pub analyses_completed: usize,
    pub analyses_failed: usize,
    pub is_finished: bool,
}

fn count_status(
    statuses: impl Iterator<Item = GenerationStatus>,
    wanted: GenerationStatus,
) -> usize {
    statuses.filter(|s| *s == wanted).count()
}

impl OnboardingProgress {
    pub fn compute(
        profile_status: ProfileStatus,
        documents: &[GeneratedDocument],
        analyses: &[DocumentAnalysis],
    ) -> Self {
        let documents_completed =
            count_status(documents.iter().map(|d| d.status), GenerationStatus::Completed);
        let documents_failed =
            count_status(documents.iter().map(|d| d.status), GenerationStatus::Failed);
        let analyses_completed =
            count_status(analyses.iter().map(|a| a.status), GenerationStatus::Completed);
        let analyses_failed =
            count_status(analyses.iter().map(|a| a.status), GenerationStatus::Failed);
        let total = OnboardingDocumentType::ALL.len();

        Self {
            profile_status,
            total,
            documents_completed,
            documents_failed,
            analyses_completed,
            analyses_failed,
            is_finished: documents_completed + documents_failed >= total
                && analyses_completed + analyses_failed >= total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_requires_name_and_description() {
        let missing = ProfileInput {
            product_name: "  ".to_string(),
            product_description: "A tool".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            missing.normalized(),
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));
    }

    #[test]
    fn input_checks_website_scheme_and_trims_competitors() {
        let bad = ProfileInput {
            product_name: "Acme".to_string(),
            product_description: "A tool".to_string(),
            website_url: Some("ftp://acme.test".to_string()),
            ..Default::default()
        };
        assert!(bad.normalized().is_err());

        let good = ProfileInput {
            product_name: " Acme ".to_string(),
            product_description: "A tool".to_string(),
            website_url: Some("https://acme.test".to_string()),
            competitors: vec![" Globex ".to_string(), "".to_string()],
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(good.product_name, "Acme");
        assert_eq!(good.competitors, vec!["Globex".to_string()]);
    }

    #[test]
    fn document_types_round_trip_through_strings() {
        for t in OnboardingDocumentType::ALL {
            assert_eq!(t.as_str().parse::<OnboardingDocumentType>().unwrap(), t);
        }
    }
}
