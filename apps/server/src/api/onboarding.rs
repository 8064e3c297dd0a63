use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use adscout_core::{
    onboarding::{
        DocumentAnalysis, GeneratedDocument, GenerationStatus, OnboardingDocumentType,
        OnboardingProfile, OnboardingProgress, ProfileInput,
    },
    RequestContext,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentStatusBody {
    status: GenerationStatus,
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentContentBody {
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisBody {
    analysis: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisFailureBody {
    error: String,
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Option<OnboardingProfile>>> {
    let profile = state.onboarding_service.get_profile(&ctx)?;
    Ok(Json(profile))
}

async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Json<OnboardingProfile>> {
    let profile = state.onboarding_service.save_profile(&ctx, input).await?;
    Ok(Json(profile))
}

async fn start_generation(
    Path(profile_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<OnboardingProfile>> {
    let profile = state
        .onboarding_service
        .start_generation(&ctx, &profile_id)
        .await?;
    Ok(Json(profile))
}

async fn mark_profile_completed(
    Path(profile_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<OnboardingProfile>> {
    let profile = state
        .onboarding_service
        .mark_profile_completed(&ctx, &profile_id)
        .await?;
    Ok(Json(profile))
}

async fn get_progress(
    Path(profile_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<OnboardingProgress>> {
    let progress = state.onboarding_service.get_progress(&ctx, &profile_id)?;
    Ok(Json(progress))
}

async fn update_document_status(
    Path((profile_id, document_type)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<DocumentStatusBody>,
) -> ApiResult<Json<GeneratedDocument>> {
    let document_type: OnboardingDocumentType = document_type.parse()?;
    let document = state
        .onboarding_service
        .update_document_status(&ctx, &profile_id, document_type, body.status, body.error)
        .await?;
    Ok(Json(document))
}

async fn save_generated_document(
    Path((profile_id, document_type)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<DocumentContentBody>,
) -> ApiResult<Json<GeneratedDocument>> {
    let document_type: OnboardingDocumentType = document_type.parse()?;
    let document = state
        .onboarding_service
        .save_generated_document(&ctx, &profile_id, document_type, body.content)
        .await?;
    Ok(Json(document))
}

async fn save_analysis_results(
    Path((profile_id, document_type)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<AnalysisBody>,
) -> ApiResult<Json<DocumentAnalysis>> {
    let document_type: OnboardingDocumentType = document_type.parse()?;
    let analysis = state
        .onboarding_service
        .save_analysis_results(&ctx, &profile_id, document_type, body.analysis)
        .await?;
    Ok(Json(analysis))
}

async fn mark_analysis_failed(
    Path((profile_id, document_type)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<AnalysisFailureBody>,
) -> ApiResult<Json<DocumentAnalysis>> {
    let document_type: OnboardingDocumentType = document_type.parse()?;
    let analysis = state
        .onboarding_service
        .mark_analysis_failed(&ctx, &profile_id, document_type, body.error)
        .await?;
    Ok(Json(analysis))
}

async fn list_documents(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<GeneratedDocument>>> {
    let documents = state.onboarding_service.list_documents(&ctx)?;
    Ok(Json(documents))
}

async fn get_document(
    Path(document_type): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<GeneratedDocument>> {
    let document_type: OnboardingDocumentType = document_type.parse()?;
    let document = state.onboarding_service.get_document(&ctx, document_type)?;
    Ok(Json(document))
}

async fn update_document_content(
    Path(document_type): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<DocumentContentBody>,
) -> ApiResult<Json<GeneratedDocument>> {
    let document_type: OnboardingDocumentType = document_type.parse()?;
    let document = state
        .onboarding_service
        .update_document_content(&ctx, document_type, body.content)
        .await?;
    Ok(Json(document))
}

async fn list_analyses(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<DocumentAnalysis>>> {
    let analyses = state.onboarding_service.list_analyses(&ctx)?;
    Ok(Json(analyses))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/onboarding/profile",
            get(get_profile).put(save_profile),
        )
        .route(
            "/onboarding/profile/{profile_id}/generate",
            post(start_generation),
        )
        .route(
            "/onboarding/profile/{profile_id}/complete",
            post(mark_profile_completed),
        )
        .route(
            "/onboarding/profile/{profile_id}/progress",
            get(get_progress),
        )
        .route(
            "/onboarding/profile/{profile_id}/documents/{document_type}/status",
            put(update_document_status),
        )
        .route(
            "/onboarding/profile/{profile_id}/documents/{document_type}/content",
            put(save_generated_document),
        )
        .route(
            "/onboarding/profile/{profile_id}/analyses/{document_type}",
            put(save_analysis_results),
        )
        .route(
            "/onboarding/profile/{profile_id}/analyses/{document_type}/failed",
            post(mark_analysis_failed),
        )
        .route("/onboarding/documents", get(list_documents))
        .route(
            "/onboarding/documents/{document_type}",
            get(get_document).put(update_document_content),
        )
        .route("/onboarding/analyses", get(list_analyses))
}
