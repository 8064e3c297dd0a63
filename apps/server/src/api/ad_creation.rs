use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use adscout_core::{
    ad_creation::{
        AdDocument, AdDocumentType, AdFilter, AdFilterCategory, CreatedAd, DocumentEditSource,
        NewAdFilter, NewCreatedAd,
    },
    errors::Error as CoreError,
    RequestContext,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct FilterQuery {
    category: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedFiltersResponse {
    category: AdFilterCategory,
    inserted: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelineStageBody {
    stage: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveDocumentBody {
    content: String,
    #[serde(default)]
    source: DocumentEditSource,
}

async fn list_filters(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Json<Vec<AdFilter>>> {
    let category: AdFilterCategory = query.category.parse()?;
    let filters = state.ad_creation_service.list_filters(&ctx, category)?;
    Ok(Json(filters))
}

async fn create_custom_filter(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewAdFilter>,
) -> ApiResult<Json<AdFilter>> {
    let filter = state
        .ad_creation_service
        .create_custom_filter(&ctx, payload)
        .await?;
    Ok(Json(filter))
}

async fn delete_custom_filter(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state
        .ad_creation_service
        .delete_custom_filter(&ctx, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resets the global entries of one category to the built-in list.
///
/// Created ads reference global filters by id across every organization, so
/// only users listed in `ADSCOUT_FILTER_ADMINS` may do this.
async fn seed_filters(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<SeedFiltersResponse>> {
    if !state.filter_admins.iter().any(|admin| *admin == ctx.user_id) {
        tracing::warn!("User {} attempted to reseed ad filters", ctx.user_id);
        return Err(CoreError::Unauthorized(
            "Only filter administrators can reseed ad filters".to_string(),
        )
        .into());
    }
    let category: AdFilterCategory = category.parse()?;
    let inserted = state.ad_creation_service.seed_filters(category).await?;
    Ok(Json(SeedFiltersResponse { category, inserted }))
}

async fn list_created_ads(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<CreatedAd>>> {
    let ads = state.ad_creation_service.list_created_ads(&ctx)?;
    Ok(Json(ads))
}

/// Creates the ad; its documents are materialized in the background and
/// announced with an `ad-documents:ready` event.
async fn create_ad(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewCreatedAd>,
) -> ApiResult<Json<CreatedAd>> {
    let created = state.ad_creation_service.create_ad(&ctx, payload).await?;
    Ok(Json(created))
}

async fn get_created_ad(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<CreatedAd>> {
    let created = state.ad_creation_service.get_created_ad(&ctx, &id)?;
    Ok(Json(created))
}

async fn update_pipeline_stage(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<PipelineStageBody>,
) -> ApiResult<Json<CreatedAd>> {
    let updated = state
        .ad_creation_service
        .update_pipeline_stage(&ctx, &id, body.stage)
        .await?;
    Ok(Json(updated))
}

async fn delete_created_ad(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state.ad_creation_service.delete_created_ad(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_ad_documents(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<AdDocument>>> {
    let documents = state.ad_creation_service.get_ad_documents(&ctx, &id)?;
    Ok(Json(documents))
}

async fn save_ad_document(
    Path((id, document_type)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<SaveDocumentBody>,
) -> ApiResult<Json<AdDocument>> {
    let document_type: AdDocumentType = document_type.parse()?;
    let document = state
        .ad_creation_service
        .save_ad_document(&ctx, &id, document_type, body.content, body.source)
        .await?;
    Ok(Json(document))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ad-filters", get(list_filters).post(create_custom_filter))
        .route("/ad-filters/{id}", delete(delete_custom_filter))
        .route("/ad-filters/seed/{category}", post(seed_filters))
        .route("/created-ads", get(list_created_ads).post(create_ad))
        .route(
            "/created-ads/{id}",
            get(get_created_ad).delete(delete_created_ad),
        )
        .route("/created-ads/{id}/stage", put(update_pipeline_stage))
        .route("/created-ads/{id}/documents", get(get_ad_documents))
        .route(
            "/created-ads/{id}/documents/{document_type}",
            put(save_ad_document),
        )
}
