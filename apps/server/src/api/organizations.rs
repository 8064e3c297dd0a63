use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use adscout_core::{
    organizations::{NewOrganization, Organization, OrganizationMember, OrganizationRole},
    RequestContext,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameOrganizationBody {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddMemberBody {
    user_id: String,
    #[serde(default = "default_role")]
    role: OrganizationRole,
}

fn default_role() -> OrganizationRole {
    OrganizationRole::Member
}

async fn list_organizations(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Organization>>> {
    let organizations = state.organization_service.list_organizations(&ctx)?;
    Ok(Json(organizations))
}

async fn create_organization(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewOrganization>,
) -> ApiResult<Json<Organization>> {
    let organization = state
        .organization_service
        .create_organization(&ctx, payload)
        .await?;
    Ok(Json(organization))
}

async fn get_organization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Organization>> {
    let organization = state.organization_service.get_organization(&ctx, &id)?;
    Ok(Json(organization))
}

async fn update_organization(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<RenameOrganizationBody>,
) -> ApiResult<Json<Organization>> {
    let organization = state
        .organization_service
        .update_organization(&ctx, &id, body.name)
        .await?;
    Ok(Json(organization))
}

async fn list_members(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<OrganizationMember>>> {
    let members = state.organization_service.list_members(&ctx, &id)?;
    Ok(Json(members))
}

async fn add_member(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<AddMemberBody>,
) -> ApiResult<Json<OrganizationMember>> {
    let member = state
        .organization_service
        .add_member(&ctx, &id, body.user_id, body.role)
        .await?;
    Ok(Json(member))
}

async fn remove_member(
    Path((id, user_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state
        .organization_service
        .remove_member(&ctx, &id, &user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/organizations",
            get(list_organizations).post(create_organization),
        )
        .route(
            "/organizations/{id}",
            get(get_organization).put(update_organization),
        )
        .route(
            "/organizations/{id}/members",
            get(list_members).post(add_member),
        )
        .route(
            "/organizations/{id}/members/{user_id}",
            delete(remove_member),
        )
}
