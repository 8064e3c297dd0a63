use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use adscout_core::{
    canvas::{
        Canvas, CanvasEdge, CanvasGraph, CanvasNode, CanvasNodeWithPayload, CanvasUpdate,
        NewCanvas, NewCanvasEdge, NewCanvasGroup, NewCanvasNode, NewChatMessage, NodePayload,
        NodePositionUpdate, Position,
    },
    RequestContext,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionsUpdated {
    updated: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResizeBody {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupBody {
    group_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UngroupBody {
    position: Option<Position>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteGroupQuery {
    #[serde(default)]
    delete_children: bool,
}

// Canvases

async fn list_canvases(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<Canvas>>> {
    let canvases = state.canvas_service.list_canvases(&ctx)?;
    Ok(Json(canvases))
}

async fn create_canvas(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewCanvas>,
) -> ApiResult<Json<Canvas>> {
    let canvas = state.canvas_service.create_canvas(&ctx, payload).await?;
    Ok(Json(canvas))
}

async fn get_canvas(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Canvas>> {
    let canvas = state.canvas_service.get_canvas(&ctx, &id)?;
    Ok(Json(canvas))
}

async fn update_canvas(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(update): Json<CanvasUpdate>,
) -> ApiResult<Json<Canvas>> {
    let canvas = state.canvas_service.update_canvas(&ctx, &id, update).await?;
    Ok(Json(canvas))
}

async fn delete_canvas(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state.canvas_service.delete_canvas(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_canvas_graph(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<CanvasGraph>> {
    let graph = state.canvas_service.get_canvas_graph(&ctx, &id)?;
    Ok(Json(graph))
}

async fn update_node_positions(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(updates): Json<Vec<NodePositionUpdate>>,
) -> ApiResult<Json<PositionsUpdated>> {
    let updated = state
        .canvas_service
        .update_node_positions(&ctx, &id, updates)
        .await?;
    Ok(Json(PositionsUpdated { updated }))
}

async fn list_edges(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<CanvasEdge>>> {
    let edges = state.canvas_service.list_edges(&ctx, &id)?;
    Ok(Json(edges))
}

// Nodes

async fn create_node(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewCanvasNode>,
) -> ApiResult<Json<CanvasNodeWithPayload>> {
    let node = state.canvas_service.create_node(&ctx, payload).await?;
    Ok(Json(node))
}

async fn get_node(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<CanvasNodeWithPayload>> {
    let node = state.canvas_service.get_node(&ctx, &id)?;
    Ok(Json(node))
}

async fn delete_node(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state.canvas_service.delete_node(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn resize_node(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<ResizeBody>,
) -> ApiResult<Json<CanvasNode>> {
    let node = state
        .canvas_service
        .resize_node(&ctx, &id, body.width, body.height)
        .await?;
    Ok(Json(node))
}

async fn update_node_payload(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NodePayload>,
) -> ApiResult<Json<NodePayload>> {
    let payload = state
        .canvas_service
        .update_node_payload(&ctx, &id, payload)
        .await?;
    Ok(Json(payload))
}

async fn append_chat_message(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(message): Json<NewChatMessage>,
) -> ApiResult<Json<NodePayload>> {
    let payload = state
        .canvas_service
        .append_chat_message(&ctx, &id, message)
        .await?;
    Ok(Json(payload))
}

async fn add_node_to_group(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<GroupBody>,
) -> ApiResult<Json<CanvasNode>> {
    let node = state
        .canvas_service
        .add_node_to_group(&ctx, &id, &body.group_id)
        .await?;
    Ok(Json(node))
}

async fn remove_node_from_group(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    body: Option<Json<UngroupBody>>,
) -> ApiResult<Json<CanvasNode>> {
    let position = body.and_then(|Json(body)| body.position);
    let node = state
        .canvas_service
        .remove_node_from_group(&ctx, &id, position)
        .await?;
    Ok(Json(node))
}

// Edges

async fn create_edge(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewCanvasEdge>,
) -> ApiResult<Json<CanvasEdge>> {
    let edge = state.canvas_service.create_edge(&ctx, payload).await?;
    Ok(Json(edge))
}

async fn delete_edge(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<StatusCode> {
    state.canvas_service.delete_edge(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Groups

async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<NewCanvasGroup>,
) -> ApiResult<Json<CanvasNodeWithPayload>> {
    let group = state.canvas_service.create_group(&ctx, payload).await?;
    Ok(Json(group))
}

async fn list_group_children(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
) -> ApiResult<Json<Vec<CanvasNode>>> {
    let children = state.canvas_service.list_group_children(&ctx, &id)?;
    Ok(Json(children))
}

async fn delete_group(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<DeleteGroupQuery>,
) -> ApiResult<StatusCode> {
    state
        .canvas_service
        .delete_group(&ctx, &id, query.delete_children)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/canvases", get(list_canvases).post(create_canvas))
        .route(
            "/canvases/{id}",
            get(get_canvas).put(update_canvas).delete(delete_canvas),
        )
        .route("/canvases/{id}/graph", get(get_canvas_graph))
        .route("/canvases/{id}/positions", put(update_node_positions))
        .route("/canvases/{id}/edges", get(list_edges))
        .route("/canvas-nodes", post(create_node))
        .route("/canvas-nodes/{id}", get(get_node).delete(delete_node))
        .route("/canvas-nodes/{id}/size", put(resize_node))
        .route("/canvas-nodes/{id}/payload", put(update_node_payload))
        .route("/canvas-nodes/{id}/messages", post(append_chat_message))
        .route("/canvas-nodes/{id}/group", put(add_node_to_group))
        .route("/canvas-nodes/{id}/ungroup", post(remove_node_from_group))
        .route("/canvas-edges", post(create_edge))
        .route("/canvas-edges/{id}", delete(delete_edge))
        .route("/canvas-groups", post(create_group))
        .route("/canvas-groups/{id}", delete(delete_group))
        .route("/canvas-groups/{id}/children", get(list_group_children))
}
