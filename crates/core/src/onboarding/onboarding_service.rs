use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::onboarding_model::{
    DocumentAnalysis, GeneratedDocument, GenerationStatus, OnboardingDocumentType,
    OnboardingProfile, OnboardingProgress, ProfileInput, ProfileStatus,
};
use super::onboarding_traits::{OnboardingRepositoryTrait, OnboardingServiceTrait};
use crate::context::RequestContext;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::time_utils::now_utc;

pub struct OnboardingService {
    repository: Arc<dyn OnboardingRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl OnboardingService {
    pub fn new(
        repository: Arc<dyn OnboardingRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }

    fn load_profile(&self, ctx: &RequestContext, profile_id: &str) -> Result<OnboardingProfile> {
        let profile = self.repository.get_profile(profile_id)?;
        ctx.ensure_org_access(&profile.organization_id)?;
        Ok(profile)
    }

    fn current_profile(&self, ctx: &RequestContext) -> Result<OnboardingProfile> {
        let organization_id = ctx.organization_id()?;
        self.repository
            .find_profile_for_organization(organization_id)?
            .ok_or_else(|| Error::NotFound("Onboarding profile".to_string()))
    }

    fn pending_document(
        profile: &OnboardingProfile,
        document_type: OnboardingDocumentType,
    ) -> GeneratedDocument {
        let now = now_utc();
        GeneratedDocument {
            id: Uuid::new_v4().to_string(),
            profile_id: profile.id.clone(),
            organization_id: profile.organization_id.clone(),
            document_type,
            content: None,
            status: GenerationStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn pending_analysis(
        profile: &OnboardingProfile,
        document_type: OnboardingDocumentType,
    ) -> DocumentAnalysis {
        let now = now_utc();
        DocumentAnalysis {
            id: Uuid::new_v4().to_string(),
            profile_id: profile.id.clone(),
            organization_id: profile.organization_id.clone(),
            document_type,
            status: GenerationStatus::Pending,
            analysis: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Existing row for the type, or a fresh pending one.
    fn document_row(
        &self,
        profile: &OnboardingProfile,
        document_type: OnboardingDocumentType,
    ) -> Result<GeneratedDocument> {
        Ok(self
            .repository
            .find_document(&profile.id, document_type)?
            .unwrap_or_else(|| Self::pending_document(profile, document_type)))
    }

    fn analysis_row(
        &self,
        profile: &OnboardingProfile,
        document_type: OnboardingDocumentType,
    ) -> Result<DocumentAnalysis> {
        Ok(self
            .repository
            .find_analysis(&profile.id, document_type)?
            .unwrap_or_else(|| Self::pending_analysis(profile, document_type)))
    }
}

#[async_trait]
impl OnboardingServiceTrait for OnboardingService {
    async fn save_profile(
        &self,
        ctx: &RequestContext,
        input: ProfileInput,
    ) -> Result<OnboardingProfile> {
        let organization_id = ctx.organization_id()?;
        let input = input.normalized()?;
        let now = now_utc();
        let profile = match self
            .repository
            .find_profile_for_organization(organization_id)?
        {
            Some(existing) => OnboardingProfile {
                product_name: input.product_name,
                product_description: input.product_description,
                target_audience: input.target_audience,
                website_url: input.website_url,
                competitors: input.competitors,
                additional_context: input.additional_context,
                updated_at: now,
                ..existing
            },
            None => OnboardingProfile {
                id: Uuid::new_v4().to_string(),
                organization_id: organization_id.to_string(),
                user_id: ctx.user_id.clone(),
                product_name: input.product_name,
                product_description: input.product_description,
                target_audience: input.target_audience,
                website_url: input.website_url,
                competitors: input.competitors,
                additional_context: input.additional_context,
                status: ProfileStatus::Draft,
                created_at: now,
                updated_at: now,
                completed_at: None,
            },
        };
        self.repository.save_profile(profile).await
    }

    fn get_profile(&self, ctx: &RequestContext) -> Result<Option<OnboardingProfile>> {
        let organization_id = ctx.organization_id()?;
        self.repository.find_profile_for_organization(organization_id)
    }

    async fn start_generation(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
    ) -> Result<OnboardingProfile> {
        let profile = self.load_profile(ctx, profile_id)?;
        if profile.status == ProfileStatus::Generating {
            warn!("Restarting generation for profile {}", profile_id);
        }
        let documents = OnboardingDocumentType::ALL
            .into_iter()
            .map(|t| Self::pending_document(&profile, t))
            .collect();
        let analyses = OnboardingDocumentType::ALL
            .into_iter()
            .map(|t| Self::pending_analysis(&profile, t))
            .collect();
        let profile = self
            .repository
            .start_generation(profile_id, documents, analyses)
            .await?;
        info!(
            "Generation requested for onboarding profile {} ({})",
            profile.id, profile.product_name
        );
        self.event_sink
            .emit(DomainEvent::onboarding_generation_requested(
                profile.id.clone(),
                profile.organization_id.clone(),
            ));
        Ok(profile)
    }

    async fn update_document_status(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        status: GenerationStatus,
        error: Option<String>,
    ) -> Result<GeneratedDocument> {
        let profile = self.load_profile(ctx, profile_id)?;
        let mut document = self.document_row(&profile, document_type)?;
        document.status = status;
        document.error = match status {
            GenerationStatus::Failed => error,
            _ => None,
        };
        document.updated_at = now_utc();
        debug!(
            "Document {} of profile {} is now {}",
            document_type,
            profile_id,
            status.as_str()
        );
        self.repository.save_document(document).await
    }

    async fn save_generated_document(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        content: String,
    ) -> Result<GeneratedDocument> {
        let profile = self.load_profile(ctx, profile_id)?;
        let mut document = self.document_row(&profile, document_type)?;
        document.content = Some(content);
        document.status = GenerationStatus::Completed;
        document.error = None;
        document.updated_at = now_utc();
        self.repository.save_document(document).await
    }

    async fn save_analysis_results(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        analysis: Value,
    ) -> Result<DocumentAnalysis> {
        let profile = self.load_profile(ctx, profile_id)?;
        let mut row = self.analysis_row(&profile, document_type)?;
        row.analysis = Some(analysis);
        row.status = GenerationStatus::Completed;
        row.error = None;
        row.updated_at = now_utc();
        self.repository.save_analysis(row).await
    }

    async fn mark_analysis_failed(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
        document_type: OnboardingDocumentType,
        error: String,
    ) -> Result<DocumentAnalysis> {
        let profile = self.load_profile(ctx, profile_id)?;
        let mut row = self.analysis_row(&profile, document_type)?;
        row.status = GenerationStatus::Failed;
        row.error = Some(error);
        row.updated_at = now_utc();
        self.repository.save_analysis(row).await
    }

    async fn mark_profile_completed(
        &self,
        ctx: &RequestContext,
        profile_id: &str,
    ) -> Result<OnboardingProfile> {
        self.load_profile(ctx, profile_id)?;
        let profile = self
            .repository
            .set_profile_status(profile_id, ProfileStatus::Completed, Some(now_utc()))
            .await?;
        info!("Onboarding profile {} completed", profile_id);
        Ok(profile)
    }

    fn get_progress(&self, ctx: &RequestContext, profile_id: &str) -> Result<OnboardingProgress> {
        let profile = self.load_profile(ctx, profile_id)?;
        let documents = self.repository.list_documents(profile_id)?;
        let analyses = self.repository.list_analyses(profile_id)?;
        Ok(OnboardingProgress::compute(
            profile.status,
            &documents,
            &analyses,
        ))
    }

    fn list_documents(&self, ctx: &RequestContext) -> Result<Vec<GeneratedDocument>> {
        let profile = self.current_profile(ctx)?;
        let mut documents = self.repository.list_documents(&profile.id)?;
        documents.sort_by_key(|d| d.document_type);
        Ok(documents)
    }

    fn get_document(
        &self,
        ctx: &RequestContext,
        document_type: OnboardingDocumentType,
    ) -> Result<GeneratedDocument> {
        let profile = self.current_profile(ctx)?;
        self.repository
            .find_document(&profile.id, document_type)?
            .ok_or_else(|| Error::NotFound(format!("Document {}", document_type)))
    }

    async fn update_document_content(
        &self,
        ctx: &RequestContext,
        document_type: OnboardingDocumentType,
        content: String,
    ) -> Result<GeneratedDocument> {
        let mut document = self.get_document(ctx, document_type)?;
        document.content = Some(content);
        document.updated_at = now_utc();
        self.repository.save_document(document).await
    }

    fn list_analyses(&self, ctx: &RequestContext) -> Result<Vec<DocumentAnalysis>> {
        let profile = self.current_profile(ctx)?;
        let mut analyses = self.repository.list_analyses(&profile.id)?;
        analyses.sort_by_key(|a| a.document_type);
        Ok(analyses)
    }
}
