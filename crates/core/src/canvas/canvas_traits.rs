use async_trait::async_trait;

use super::canvas_model::{
    Canvas, CanvasEdge, CanvasGraph, CanvasNode, CanvasNodeWithPayload, CanvasUpdate,
    GroupPlacement, NewCanvas, NewCanvasEdge, NewCanvasGroup, NewCanvasNode, NewChatMessage,
    NodePayload, NodePositionUpdate, Position,
};
use crate::context::RequestContext;
use crate::errors::Result;

/// Persistence for canvases. Every node or edge mutation also bumps the
/// owning canvas's `updated_at` inside the same transaction.
#[async_trait]
pub trait CanvasRepositoryTrait: Send + Sync {
    fn get_canvas(&self, canvas_id: &str) -> Result<Canvas>;
    /// Most recently updated first.
    fn list_canvases(&self, organization_id: &str) -> Result<Vec<Canvas>>;
    async fn create_canvas(&self, canvas: Canvas) -> Result<Canvas>;
    async fn update_canvas(&self, canvas: Canvas) -> Result<Canvas>;
    /// Deletes the canvas with all its nodes, payloads and edges.
    async fn delete_canvas(&self, canvas_id: &str) -> Result<usize>;

    fn get_node(&self, node_id: &str) -> Result<CanvasNode>;
    fn list_nodes(&self, canvas_id: &str) -> Result<Vec<CanvasNode>>;
    fn list_nodes_with_payloads(&self, canvas_id: &str) -> Result<Vec<CanvasNodeWithPayload>>;
    fn get_payload(&self, payload_id: &str) -> Result<NodePayload>;
    fn list_group_children(&self, group_id: &str) -> Result<Vec<CanvasNode>>;

    /// Inserts the payload and the node. When the node has a parent group its
    /// position is replaced by the next free grid slot of that group.
    async fn create_node(&self, node: CanvasNode, payload: NodePayload) -> Result<CanvasNode>;
    /// Appends the node to the group's grid: slot index is the group's current
    /// child count, read in the same transaction as the write.
    async fn place_in_group(&self, node_id: &str, group_id: &str) -> Result<CanvasNode>;
    /// Writes a precomputed parent and position.
    async fn apply_placement(&self, placement: GroupPlacement) -> Result<CanvasNode>;
    async fn update_positions(
        &self,
        canvas_id: &str,
        updates: Vec<NodePositionUpdate>,
    ) -> Result<usize>;
    async fn resize_node(&self, node_id: &str, width: f64, height: f64) -> Result<CanvasNode>;
    async fn update_payload(&self, node_id: &str, payload: NodePayload) -> Result<NodePayload>;
    /// Deletes the node, its payload and touching edges. Children of a deleted
    /// group are released to the canvas at their on-screen position.
    async fn delete_node(&self, node_id: &str) -> Result<usize>;
    /// `delete_children` removes each child with its payload and edges;
    /// otherwise children only lose their parent. The group goes last.
    async fn delete_group(&self, group_id: &str, delete_children: bool) -> Result<usize>;

    fn get_edge(&self, edge_id: &str) -> Result<CanvasEdge>;
    fn list_edges(&self, canvas_id: &str) -> Result<Vec<CanvasEdge>>;
    /// Fails with a constraint violation when the pair already exists.
    async fn create_edge(&self, edge: CanvasEdge) -> Result<CanvasEdge>;
    async fn delete_edge(&self, edge_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait CanvasServiceTrait: Send + Sync {
    async fn create_canvas(&self, ctx: &RequestContext, new_canvas: NewCanvas) -> Result<Canvas>;
    fn list_canvases(&self, ctx: &RequestContext) -> Result<Vec<Canvas>>;
    fn get_canvas(&self, ctx: &RequestContext, canvas_id: &str) -> Result<Canvas>;
    async fn update_canvas(
        &self,
        ctx: &RequestContext,
        canvas_id: &str,
        update: CanvasUpdate,
    ) -> Result<Canvas>;
    async fn delete_canvas(&self, ctx: &RequestContext, canvas_id: &str) -> Result<()>;
    fn get_canvas_graph(&self, ctx: &RequestContext, canvas_id: &str) -> Result<CanvasGraph>;

    async fn create_node(
        &self,
        ctx: &RequestContext,
        new_node: NewCanvasNode,
    ) -> Result<CanvasNodeWithPayload>;
    fn get_node(&self, ctx: &RequestContext, node_id: &str) -> Result<CanvasNodeWithPayload>;
    async fn update_node_positions(
        &self,
        ctx: &RequestContext,
        canvas_id: &str,
        updates: Vec<NodePositionUpdate>,
    ) -> Result<usize>;
    async fn resize_node(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        width: f64,
        height: f64,
    ) -> Result<CanvasNode>;
    async fn update_node_payload(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        payload: NodePayload,
    ) -> Result<NodePayload>;
    async fn append_chat_message(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        message: NewChatMessage,
    ) -> Result<NodePayload>;
    async fn delete_node(&self, ctx: &RequestContext, node_id: &str) -> Result<()>;

    async fn create_edge(&self, ctx: &RequestContext, new_edge: NewCanvasEdge)
        -> Result<CanvasEdge>;
    async fn delete_edge(&self, ctx: &RequestContext, edge_id: &str) -> Result<()>;
    fn list_edges(&self, ctx: &RequestContext, canvas_id: &str) -> Result<Vec<CanvasEdge>>;

    async fn create_group(
        &self,
        ctx: &RequestContext,
        new_group: NewCanvasGroup,
    ) -> Result<CanvasNodeWithPayload>;
    async fn add_node_to_group(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        group_id: &str,
    ) -> Result<CanvasNode>;
    async fn remove_node_from_group(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        new_position: Option<Position>,
    ) -> Result<CanvasNode>;
    async fn delete_group(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        delete_children: bool,
    ) -> Result<()>;
    fn list_group_children(&self, ctx: &RequestContext, group_id: &str)
        -> Result<Vec<CanvasNode>>;
}
