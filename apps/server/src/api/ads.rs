use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use adscout_core::{ads::Ad, RequestContext};

use crate::{error::ApiResult, main_lib::AppState};

/// Every ad of the caller's subscriptions, newest scrape first.
async fn list_ads(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Ad>>> {
    let ads = state.ad_service.get_ads_by_user(&ctx)?;
    Ok(Json(ads))
}

async fn get_ad(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Ad>> {
    let ad = state.ad_service.get_ad(&ctx, &id)?;
    Ok(Json(ad))
}

async fn delete_ad(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state.ad_service.delete_ad(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ads", get(list_ads))
        .route("/ads/{id}", get(get_ad).delete(delete_ad))
}
