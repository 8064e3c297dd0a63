use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use adscout_core::{
    ads::{Ad, ScrapedAd},
    subscriptions::{NewSubscription, Subscription, SubscriptionUpdate},
    RequestContext,
};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Subscription>>> {
    let subscriptions = state.subscription_service.list_subscriptions(&ctx)?;
    Ok(Json(subscriptions))
}

async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewSubscription>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state
        .subscription_service
        .create_subscription(&ctx, payload)
        .await?;
    Ok(Json(subscription))
}

async fn get_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state.subscription_service.get_subscription(&ctx, &id)?;
    Ok(Json(subscription))
}

async fn update_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(update): Json<SubscriptionUpdate>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state
        .subscription_service
        .update_subscription(&ctx, &id, update)
        .await?;
    Ok(Json(subscription))
}

async fn toggle_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Subscription>> {
    let subscription = state
        .subscription_service
        .toggle_subscription(&ctx, &id)
        .await?;
    Ok(Json(subscription))
}

async fn delete_subscription(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state
        .subscription_service
        .delete_subscription(&ctx, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_subscription_ads(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Ad>>> {
    let ads = state.ad_service.get_ads_by_subscription(&ctx, &id)?;
    Ok(Json(ads))
}

async fn create_example_ads(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Ad>>> {
    let ads = state.ad_service.create_examples(&ctx, &id).await?;
    Ok(Json(ads))
}

async fn import_scraped_ads(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(ads): Json<Vec<ScrapedAd>>,
) -> ApiResult<Json<Vec<Ad>>> {
    let imported = state.ad_service.import_scraped_ads(&ctx, &id, ads).await?;
    Ok(Json(imported))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route("/subscriptions/{id}/toggle", post(toggle_subscription))
        .route("/subscriptions/{id}/ads", get(list_subscription_ads))
        .route("/subscriptions/{id}/ads/examples", post(create_example_ads))
        .route("/subscriptions/{id}/ads/import", post(import_scraped_ads))
}
