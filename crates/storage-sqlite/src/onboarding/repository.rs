use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use adscout_core::onboarding::{
    DocumentAnalysis, GeneratedDocument, OnboardingDocumentType, OnboardingProfile,
    OnboardingRepositoryTrait, ProfileStatus,
};
use adscout_core::utils::time_utils::now_utc;
use adscout_core::Result;

use super::model::{DocumentAnalysisDB, GeneratedDocumentDB, OnboardingProfileDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{document_analyses, onboarding_documents, onboarding_profiles};

pub struct OnboardingRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl OnboardingRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn upsert_document(
    conn: &mut SqliteConnection,
    document: GeneratedDocument,
) -> Result<GeneratedDocumentDB> {
    let document_db = GeneratedDocumentDB::from(document);
    Ok(diesel::insert_into(onboarding_documents::table)
        .values(&document_db)
        .on_conflict((
            onboarding_documents::profile_id,
            onboarding_documents::document_type,
        ))
        .do_update()
        .set((
            onboarding_documents::content.eq(&document_db.content),
            onboarding_documents::status.eq(&document_db.status),
            onboarding_documents::error.eq(&document_db.error),
            onboarding_documents::updated_at.eq(document_db.updated_at),
        ))
        .returning(GeneratedDocumentDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?)
}

fn upsert_analysis(
    conn: &mut SqliteConnection,
    analysis: DocumentAnalysis,
) -> Result<DocumentAnalysisDB> {
    let analysis_db = DocumentAnalysisDB::try_from(analysis)?;
    Ok(diesel::insert_into(document_analyses::table)
        .values(&analysis_db)
        .on_conflict((
            document_analyses::profile_id,
            document_analyses::document_type,
        ))
        .do_update()
        .set((
            document_analyses::status.eq(&analysis_db.status),
            document_analyses::analysis.eq(&analysis_db.analysis),
            document_analyses::error.eq(&analysis_db.error),
            document_analyses::updated_at.eq(analysis_db.updated_at),
        ))
        .returning(DocumentAnalysisDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?)
}

fn set_status_impl(
    conn: &mut SqliteConnection,
    profile_id: &str,
    status: ProfileStatus,
    completed_at: Option<NaiveDateTime>,
) -> Result<OnboardingProfileDB> {
    not_found_as(
        diesel::update(onboarding_profiles::table.find(profile_id))
            .set((
                onboarding_profiles::status.eq(status.as_str()),
                onboarding_profiles::completed_at.eq(completed_at),
                onboarding_profiles::updated_at.eq(now_utc()),
            ))
            .returning(OnboardingProfileDB::as_returning())
            .get_result(conn),
        "Onboarding profile",
    )
}

#[async_trait]
impl OnboardingRepositoryTrait for OnboardingRepository {
    fn get_profile(&self, profile_id: &str) -> Result<OnboardingProfile> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            onboarding_profiles::table
                .find(profile_id)
                .select(OnboardingProfileDB::as_select())
                .first::<OnboardingProfileDB>(&mut conn),
            "Onboarding profile",
        )?;
        Ok(row.into())
    }

    fn find_profile_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Option<OnboardingProfile>> {
        let mut conn = get_connection(&self.pool)?;
        let row = onboarding_profiles::table
            .filter(onboarding_profiles::organization_id.eq(organization_id))
            .select(OnboardingProfileDB::as_select())
            .first::<OnboardingProfileDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(OnboardingProfile::from))
    }

    async fn save_profile(&self, profile: OnboardingProfile) -> Result<OnboardingProfile> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OnboardingProfile> {
                let profile_db = OnboardingProfileDB::try_from(profile)?;
                let row = diesel::insert_into(onboarding_profiles::table)
                    .values(&profile_db)
                    .on_conflict(onboarding_profiles::id)
                    .do_update()
                    .set(&profile_db)
                    .returning(OnboardingProfileDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn set_profile_status(
        &self,
        profile_id: &str,
        status: ProfileStatus,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<OnboardingProfile> {
        let profile_id = profile_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OnboardingProfile> {
                Ok(set_status_impl(conn, &profile_id, status, completed_at)?.into())
            })
            .await
    }

    async fn start_generation(
        &self,
        profile_id: &str,
        documents: Vec<GeneratedDocument>,
        analyses: Vec<DocumentAnalysis>,
    ) -> Result<OnboardingProfile> {
        let profile_id = profile_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OnboardingProfile> {
                for document in documents {
                    upsert_document(conn, document)?;
                }
                for analysis in analyses {
                    upsert_analysis(conn, analysis)?;
                }
                Ok(set_status_impl(conn, &profile_id, ProfileStatus::Generating, None)?.into())
            })
            .await
    }

    fn list_documents(&self, profile_id: &str) -> Result<Vec<GeneratedDocument>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = onboarding_documents::table
            .filter(onboarding_documents::profile_id.eq(profile_id))
            .select(GeneratedDocumentDB::as_select())
            .load::<GeneratedDocumentDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut documents: Vec<GeneratedDocument> =
            rows.into_iter().map(GeneratedDocument::from).collect();
        documents.sort_by_key(|d| d.document_type);
        Ok(documents)
    }

    fn find_document(
        &self,
        profile_id: &str,
        document_type: OnboardingDocumentType,
    ) -> Result<Option<GeneratedDocument>> {
        let mut conn = get_connection(&self.pool)?;
        let row = onboarding_documents::table
            .filter(onboarding_documents::profile_id.eq(profile_id))
            .filter(onboarding_documents::document_type.eq(document_type.as_str()))
            .select(GeneratedDocumentDB::as_select())
            .first::<GeneratedDocumentDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(GeneratedDocument::from))
    }

    async fn save_document(&self, document: GeneratedDocument) -> Result<GeneratedDocument> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<GeneratedDocument> {
                Ok(upsert_document(conn, document)?.into())
            })
            .await
    }

    fn list_analyses(&self, profile_id: &str) -> Result<Vec<DocumentAnalysis>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = document_analyses::table
            .filter(document_analyses::profile_id.eq(profile_id))
            .select(DocumentAnalysisDB::as_select())
            .load::<DocumentAnalysisDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut analyses: Vec<DocumentAnalysis> =
            rows.into_iter().map(DocumentAnalysis::from).collect();
        analyses.sort_by_key(|a| a.document_type);
        Ok(analyses)
    }

    fn find_analysis(
        &self,
        profile_id: &str,
        document_type: OnboardingDocumentType,
    ) -> Result<Option<DocumentAnalysis>> {
        let mut conn = get_connection(&self.pool)?;
        let row = document_analyses::table
            .filter(document_analyses::profile_id.eq(profile_id))
            .filter(document_analyses::document_type.eq(document_type.as_str()))
            .select(DocumentAnalysisDB::as_select())
            .first::<DocumentAnalysisDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(DocumentAnalysis::from))
    }

    async fn save_analysis(&self, analysis: DocumentAnalysis) -> Result<DocumentAnalysis> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DocumentAnalysis> {
                Ok(upsert_analysis(conn, analysis)?.into())
            })
            .await
    }
}
