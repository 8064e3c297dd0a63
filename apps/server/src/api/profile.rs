use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use adscout_core::{
    profile::{ProfileUpdate, UserProfile},
    RequestContext,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveOrganizationBody {
    organization_id: String,
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.profile_service.get_current_profile(&ctx).await?;
    Ok(Json(profile))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.profile_service.update_profile(&ctx, update).await?;
    Ok(Json(profile))
}

async fn set_active_organization(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<ActiveOrganizationBody>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .profile_service
        .set_active_organization(&ctx, &body.organization_id)
        .await?;
    Ok(Json(profile))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/active-organization", put(set_active_organization))
}
