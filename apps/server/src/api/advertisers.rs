use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use adscout_core::{
    advertisers::{Advertiser, ScrapedAdvertiser},
    AdPlatform,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct AdvertiserQuery {
    platform: Option<AdPlatform>,
}

async fn list_advertisers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdvertiserQuery>,
) -> ApiResult<Json<Vec<Advertiser>>> {
    let advertisers = state.advertiser_service.list_advertisers(query.platform)?;
    Ok(Json(advertisers))
}

async fn get_advertiser(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Advertiser>> {
    let advertiser = state.advertiser_service.get_advertiser(&id)?;
    Ok(Json(advertiser))
}

async fn upsert_advertiser(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScrapedAdvertiser>,
) -> ApiResult<Json<Advertiser>> {
    let advertiser = state.advertiser_service.upsert_advertiser(payload).await?;
    Ok(Json(advertiser))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/advertisers",
            get(list_advertisers).post(upsert_advertiser),
        )
        .route("/advertisers/{id}", get(get_advertiser))
}
