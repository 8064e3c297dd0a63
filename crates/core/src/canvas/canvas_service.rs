use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::canvas_graph::order_parents_first;
use super::canvas_layout::position_after_ungroup;
use super::canvas_media::normalize_payload;
use super::canvas_model::{
    Canvas, CanvasEdge, CanvasGraph, CanvasNode, CanvasNodeWithPayload, CanvasUpdate,
    ChatMessage, GroupPlacement, NewCanvas, NewCanvasEdge, NewCanvasGroup, NewCanvasNode,
    NewChatMessage, NodePayload, NodePositionUpdate, NodeType, Position,
};
use super::canvas_traits::{CanvasRepositoryTrait, CanvasServiceTrait};
use crate::context::RequestContext;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::text_utils::normalize_optional;
use crate::utils::time_utils::now_utc;

pub struct CanvasService {
    repository: Arc<dyn CanvasRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

fn check_dimension(name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(Error::invalid_input(format!(
            "{} must be a positive number",
            name
        ))),
        _ => Ok(()),
    }
}

fn check_position(position: &Position) -> Result<()> {
    if !position.is_finite() {
        return Err(Error::invalid_input("Position must be finite"));
    }
    Ok(())
}

impl CanvasService {
    pub fn new(
        repository: Arc<dyn CanvasRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }

    fn load_canvas(&self, ctx: &RequestContext, canvas_id: &str) -> Result<Canvas> {
        let canvas = self.repository.get_canvas(canvas_id)?;
        ctx.ensure_org_access(&canvas.organization_id)?;
        Ok(canvas)
    }

    fn load_node(&self, ctx: &RequestContext, node_id: &str) -> Result<CanvasNode> {
        let node = self.repository.get_node(node_id)?;
        ctx.ensure_org_access(&node.organization_id)?;
        Ok(node)
    }

    fn load_group(&self, ctx: &RequestContext, group_id: &str) -> Result<CanvasNode> {
        let group = self.load_node(ctx, group_id)?;
        if group.node_type != NodeType::Group {
            return Err(Error::invalid_input(format!(
                "Node {} is not a group",
                group_id
            )));
        }
        Ok(group)
    }

    fn changed(&self, canvas_id: &str, organization_id: &str) {
        self.event_sink
            .emit(DomainEvent::canvas_changed(canvas_id, organization_id));
    }

    /// Checks that `node` may become a child of `group`.
    fn check_grouping(node: &CanvasNode, group: &CanvasNode) -> Result<()> {
        if node.id == group.id {
            return Err(Error::invalid_input("A node cannot be grouped into itself"));
        }
        if group.node_type != NodeType::Group {
            return Err(Error::invalid_input("Parent must be a group node"));
        }
        if node.node_type == NodeType::Group {
            return Err(Error::invalid_input("Groups cannot be nested"));
        }
        if node.canvas_id != group.canvas_id {
            return Err(Error::invalid_input(
                "Node and group belong to different canvases",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CanvasServiceTrait for CanvasService {
    async fn create_canvas(&self, ctx: &RequestContext, new_canvas: NewCanvas) -> Result<Canvas> {
        let organization_id = ctx.organization_id()?;
        let name = new_canvas.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_input("Canvas name cannot be empty"));
        }
        let now = now_utc();
        let canvas = Canvas {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            user_id: ctx.user_id.clone(),
            name,
            description: normalize_optional(new_canvas.description),
            created_at: now,
            updated_at: now,
        };
        let created = self.repository.create_canvas(canvas).await?;
        info!("Canvas '{}' created ({})", created.name, created.id);
        Ok(created)
    }

    fn list_canvases(&self, ctx: &RequestContext) -> Result<Vec<Canvas>> {
        let organization_id = ctx.organization_id()?;
        self.repository.list_canvases(organization_id)
    }

    fn get_canvas(&self, ctx: &RequestContext, canvas_id: &str) -> Result<Canvas> {
        self.load_canvas(ctx, canvas_id)
    }

    async fn update_canvas(
        &self,
        ctx: &RequestContext,
        canvas_id: &str,
        update: CanvasUpdate,
    ) -> Result<Canvas> {
        let mut canvas = self.load_canvas(ctx, canvas_id)?;
        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::invalid_input("Canvas name cannot be empty"));
            }
            canvas.name = name;
        }
        if update.description.is_some() {
            canvas.description = normalize_optional(update.description);
        }
        canvas.updated_at = now_utc();
        self.repository.update_canvas(canvas).await
    }

    async fn delete_canvas(&self, ctx: &RequestContext, canvas_id: &str) -> Result<()> {
        self.load_canvas(ctx, canvas_id)?;
        let removed = self.repository.delete_canvas(canvas_id).await?;
        info!("Canvas {} deleted ({} rows)", canvas_id, removed);
        Ok(())
    }

    fn get_canvas_graph(&self, ctx: &RequestContext, canvas_id: &str) -> Result<CanvasGraph> {
        let canvas = self.load_canvas(ctx, canvas_id)?;
        let nodes = self.repository.list_nodes_with_payloads(canvas_id)?;
        let edges = self.repository.list_edges(canvas_id)?;
        Ok(CanvasGraph {
            canvas,
            nodes: order_parents_first(nodes),
            edges,
        })
    }

    async fn create_node(
        &self,
        ctx: &RequestContext,
        new_node: NewCanvasNode,
    ) -> Result<CanvasNodeWithPayload> {
        let canvas = self.load_canvas(ctx, &new_node.canvas_id)?;
        check_position(&new_node.position)?;
        check_dimension("width", new_node.width)?;
        check_dimension("height", new_node.height)?;
        let payload = normalize_payload(new_node.payload)?;

        let now = now_utc();
        let node = CanvasNode {
            id: Uuid::new_v4().to_string(),
            canvas_id: canvas.id.clone(),
            organization_id: canvas.organization_id.clone(),
            node_type: payload.node_type(),
            payload_id: Uuid::new_v4().to_string(),
            position: new_node.position,
            width: new_node.width,
            height: new_node.height,
            parent_group_id: normalize_optional(new_node.parent_group_id),
            created_at: now,
            updated_at: now,
        };
        if let Some(group_id) = node.parent_group_id.as_deref() {
            let group = self.load_group(ctx, group_id)?;
            Self::check_grouping(&node, &group)?;
        }

        let created = self.repository.create_node(node, payload.clone()).await?;
        debug!(
            "Created {} node {} on canvas {}",
            created.node_type, created.id, created.canvas_id
        );
        self.changed(&created.canvas_id, &created.organization_id);
        Ok(CanvasNodeWithPayload {
            node: created,
            payload,
        })
    }

    fn get_node(&self, ctx: &RequestContext, node_id: &str) -> Result<CanvasNodeWithPayload> {
        let node = self.load_node(ctx, node_id)?;
        let payload = self.repository.get_payload(&node.payload_id)?;
        Ok(CanvasNodeWithPayload { node, payload })
    }

    async fn update_node_positions(
        &self,
        ctx: &RequestContext,
        canvas_id: &str,
        updates: Vec<NodePositionUpdate>,
    ) -> Result<usize> {
        let canvas = self.load_canvas(ctx, canvas_id)?;
        let known: HashSet<String> = self
            .repository
            .list_nodes(canvas_id)?
            .into_iter()
            .map(|n| n.id)
            .collect();
        for update in &updates {
            check_position(&update.position)?;
            if !known.contains(&update.node_id) {
                return Err(Error::NotFound(format!(
                    "Node {} on canvas {}",
                    update.node_id, canvas_id
                )));
            }
        }
        if updates.is_empty() {
            return Ok(0);
        }
        let updated = self.repository.update_positions(canvas_id, updates).await?;
        self.changed(&canvas.id, &canvas.organization_id);
        Ok(updated)
    }

    async fn resize_node(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        width: f64,
        height: f64,
    ) -> Result<CanvasNode> {
        let node = self.load_node(ctx, node_id)?;
        check_dimension("width", Some(width))?;
        check_dimension("height", Some(height))?;
        let resized = self.repository.resize_node(node_id, width, height).await?;
        self.changed(&node.canvas_id, &node.organization_id);
        Ok(resized)
    }

    async fn update_node_payload(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        payload: NodePayload,
    ) -> Result<NodePayload> {
        let node = self.load_node(ctx, node_id)?;
        if payload.node_type() != node.node_type {
            return Err(Error::invalid_input(format!(
                "Payload of type {} does not fit a {} node",
                payload.node_type(),
                node.node_type
            )));
        }
        let payload = normalize_payload(payload)?;
        let saved = self.repository.update_payload(node_id, payload).await?;
        self.changed(&node.canvas_id, &node.organization_id);
        Ok(saved)
    }

    async fn append_chat_message(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        message: NewChatMessage,
    ) -> Result<NodePayload> {
        let node = self.load_node(ctx, node_id)?;
        let NodePayload::Chat {
            title,
            mut messages,
        } = self.repository.get_payload(&node.payload_id)?
        else {
            return Err(Error::invalid_input(format!(
                "Node {} is not a chat node",
                node_id
            )));
        };
        if message.content.trim().is_empty() {
            return Err(Error::invalid_input("Message cannot be empty"));
        }
        messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            role: message.role,
            content: message.content,
            created_at: now_utc(),
        });
        let saved = self
            .repository
            .update_payload(node_id, NodePayload::Chat { title, messages })
            .await?;
        self.changed(&node.canvas_id, &node.organization_id);
        Ok(saved)
    }

    async fn delete_node(&self, ctx: &RequestContext, node_id: &str) -> Result<()> {
        let node = self.load_node(ctx, node_id)?;
        self.repository.delete_node(node_id).await?;
        self.changed(&node.canvas_id, &node.organization_id);
        Ok(())
    }

    async fn create_edge(
        &self,
        ctx: &RequestContext,
        new_edge: NewCanvasEdge,
    ) -> Result<CanvasEdge> {
        let canvas = self.load_canvas(ctx, &new_edge.canvas_id)?;
        if new_edge.source_node_id == new_edge.target_node_id {
            return Err(Error::invalid_input("An edge cannot connect a node to itself"));
        }
        for endpoint in [&new_edge.source_node_id, &new_edge.target_node_id] {
            let node = self.load_node(ctx, endpoint)?;
            if node.canvas_id != canvas.id {
                return Err(Error::invalid_input(format!(
                    "Node {} is not on canvas {}",
                    endpoint, canvas.id
                )));
            }
        }
        let edge = CanvasEdge {
            id: Uuid::new_v4().to_string(),
            canvas_id: canvas.id.clone(),
            organization_id: canvas.organization_id.clone(),
            source_node_id: new_edge.source_node_id,
            target_node_id: new_edge.target_node_id,
            source_handle: normalize_optional(new_edge.source_handle),
            target_handle: normalize_optional(new_edge.target_handle),
            created_at: now_utc(),
        };
        let created = self.repository.create_edge(edge).await?;
        self.changed(&canvas.id, &canvas.organization_id);
        Ok(created)
    }

    async fn delete_edge(&self, ctx: &RequestContext, edge_id: &str) -> Result<()> {
        let edge = self.repository.get_edge(edge_id)?;
        ctx.ensure_org_access(&edge.organization_id)?;
        self.repository.delete_edge(edge_id).await?;
        self.changed(&edge.canvas_id, &edge.organization_id);
        Ok(())
    }

    fn list_edges(&self, ctx: &RequestContext, canvas_id: &str) -> Result<Vec<CanvasEdge>> {
        self.load_canvas(ctx, canvas_id)?;
        self.repository.list_edges(canvas_id)
    }

    async fn create_group(
        &self,
        ctx: &RequestContext,
        new_group: NewCanvasGroup,
    ) -> Result<CanvasNodeWithPayload> {
        self.create_node(
            ctx,
            NewCanvasNode {
                canvas_id: new_group.canvas_id,
                payload: NodePayload::Group {
                    label: new_group.label,
                },
                position: new_group.position,
                width: new_group.width,
                height: new_group.height,
                parent_group_id: None,
            },
        )
        .await
    }

    async fn add_node_to_group(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        group_id: &str,
    ) -> Result<CanvasNode> {
        let node = self.load_node(ctx, node_id)?;
        if node.id == group_id {
            return Err(Error::invalid_input("A node cannot be grouped into itself"));
        }
        let group = self.load_node(ctx, group_id)?;
        Self::check_grouping(&node, &group)?;
        if node.parent_group_id.as_deref() == Some(group_id) {
            debug!("Node {} already in group {}", node_id, group_id);
            return Ok(node);
        }
        let placed = self.repository.place_in_group(node_id, group_id).await?;
        self.changed(&node.canvas_id, &node.organization_id);
        Ok(placed)
    }

    async fn remove_node_from_group(
        &self,
        ctx: &RequestContext,
        node_id: &str,
        new_position: Option<Position>,
    ) -> Result<CanvasNode> {
        let node = self.load_node(ctx, node_id)?;
        if let Some(position) = &new_position {
            check_position(position)?;
        }
        let Some(parent_id) = node.parent_group_id.clone() else {
            let Some(position) = new_position else {
                return Ok(node);
            };
            let moved = self
                .repository
                .apply_placement(GroupPlacement {
                    node_id: node.id.clone(),
                    parent_group_id: None,
                    position,
                })
                .await?;
            self.changed(&node.canvas_id, &node.organization_id);
            return Ok(moved);
        };
        let parent = match self.repository.get_node(&parent_id) {
            Ok(parent) => Some(parent),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        let position = position_after_ungroup(&node, parent.as_ref(), new_position);
        let released = self
            .repository
            .apply_placement(GroupPlacement {
                node_id: node.id.clone(),
                parent_group_id: None,
                position,
            })
            .await?;
        self.changed(&node.canvas_id, &node.organization_id);
        Ok(released)
    }

    async fn delete_group(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        delete_children: bool,
    ) -> Result<()> {
        let group = self.load_group(ctx, group_id)?;
        let removed = self
            .repository
            .delete_group(group_id, delete_children)
            .await?;
        info!(
            "Group {} deleted (children {}, {} rows)",
            group_id,
            if delete_children { "deleted" } else { "kept" },
            removed
        );
        self.changed(&group.canvas_id, &group.organization_id);
        Ok(())
    }

    fn list_group_children(
        &self,
        ctx: &RequestContext,
        group_id: &str,
    ) -> Result<Vec<CanvasNode>> {
        self.load_group(ctx, group_id)?;
        self.repository.list_group_children(group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{grid_slot, to_absolute, ChatRole};
    use crate::events::RecordingEventSink;
    use std::collections::HashMap;
    use std::sync::RwLock;

    #[derive(Default)]
    struct MockCanvasRepository {
        canvases: RwLock<Vec<Canvas>>,
        nodes: RwLock<Vec<CanvasNode>>,
        payloads: RwLock<HashMap<String, NodePayload>>,
        edges: RwLock<Vec<CanvasEdge>>,
    }

    impl MockCanvasRepository {
        fn remove_node_rows(&self, node_id: &str) -> usize {
            let mut nodes = self.nodes.write().unwrap();
            let Some(node) = nodes.iter().find(|n| n.id == node_id).cloned() else {
                return 0;
            };
            nodes.retain(|n| n.id != node_id);
            self.payloads.write().unwrap().remove(&node.payload_id);
            self.edges
                .write()
                .unwrap()
                .retain(|e| e.source_node_id != node_id && e.target_node_id != node_id);
            1
        }

        fn children(&self, group_id: &str) -> Vec<CanvasNode> {
            self.nodes
                .read()
                .unwrap()
                .iter()
                .filter(|n| n.parent_group_id.as_deref() == Some(group_id))
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl CanvasRepositoryTrait for MockCanvasRepository {
        fn get_canvas(&self, canvas_id: &str) -> Result<Canvas> {
            self.canvases
                .read()
                .unwrap()
                .iter()
                .find(|c| c.id == canvas_id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Canvas".to_string()))
        }

        fn list_canvases(&self, organization_id: &str) -> Result<Vec<Canvas>> {
            Ok(self
                .canvases
                .read()
                .unwrap()
                .iter()
                .filter(|c| c.organization_id == organization_id)
                .cloned()
                .collect())
        }

        async fn create_canvas(&self, canvas: Canvas) -> Result<Canvas> {
            self.canvases.write().unwrap().push(canvas.clone());
            Ok(canvas)
        }

        async fn update_canvas(&self, canvas: Canvas) -> Result<Canvas> {
            let mut canvases = self.canvases.write().unwrap();
            canvases.retain(|c| c.id != canvas.id);
            canvases.push(canvas.clone());
            Ok(canvas)
        }

        async fn delete_canvas(&self, canvas_id: &str) -> Result<usize> {
            let ids: Vec<String> = self
                .list_nodes(canvas_id)?
                .into_iter()
                .map(|n| n.id)
                .collect();
            let removed: usize = ids.iter().map(|id| self.remove_node_rows(id)).sum();
            self.canvases.write().unwrap().retain(|c| c.id != canvas_id);
            Ok(removed + 1)
        }

        fn get_node(&self, node_id: &str) -> Result<CanvasNode> {
            self.nodes
                .read()
                .unwrap()
                .iter()
                .find(|n| n.id == node_id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Canvas node".to_string()))
        }

        fn list_nodes(&self, canvas_id: &str) -> Result<Vec<CanvasNode>> {
            Ok(self
                .nodes
                .read()
                .unwrap()
                .iter()
                .filter(|n| n.canvas_id == canvas_id)
                .cloned()
                .collect())
        }

        fn list_nodes_with_payloads(
            &self,
            canvas_id: &str,
        ) -> Result<Vec<CanvasNodeWithPayload>> {
            self.list_nodes(canvas_id)?
                .into_iter()
                .map(|node| {
                    let payload = self.get_payload(&node.payload_id)?;
                    Ok(CanvasNodeWithPayload { node, payload })
                })
                .collect()
        }

        fn get_payload(&self, payload_id: &str) -> Result<NodePayload> {
            self.payloads
                .read()
                .unwrap()
                .get(payload_id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Node payload".to_string()))
        }

        fn list_group_children(&self, group_id: &str) -> Result<Vec<CanvasNode>> {
            Ok(self.children(group_id))
        }

        async fn create_node(&self, mut node: CanvasNode, payload: NodePayload) -> Result<CanvasNode> {
            if let Some(group_id) = node.parent_group_id.as_deref() {
                node.position = grid_slot(self.children(group_id).len());
            }
            self.payloads
                .write()
                .unwrap()
                .insert(node.payload_id.clone(), payload);
            self.nodes.write().unwrap().push(node.clone());
            Ok(node)
        }

        async fn place_in_group(&self, node_id: &str, group_id: &str) -> Result<CanvasNode> {
            let index = self.children(group_id).len();
            self.apply_placement(GroupPlacement {
                node_id: node_id.to_string(),
                parent_group_id: Some(group_id.to_string()),
                position: grid_slot(index),
            })
            .await
        }

        async fn apply_placement(&self, placement: GroupPlacement) -> Result<CanvasNode> {
            let mut nodes = self.nodes.write().unwrap();
            let node = nodes
                .iter_mut()
                .find(|n| n.id == placement.node_id)
                .ok_or_else(|| Error::NotFound("Canvas node".to_string()))?;
            node.parent_group_id = placement.parent_group_id;
            node.position = placement.position;
            Ok(node.clone())
        }

        async fn update_positions(
            &self,
            _canvas_id: &str,
            updates: Vec<NodePositionUpdate>,
        ) -> Result<usize> {
            let mut nodes = self.nodes.write().unwrap();
            for update in &updates {
                if let Some(node) = nodes.iter_mut().find(|n| n.id == update.node_id) {
                    node.position = update.position;
                }
            }
            Ok(updates.len())
        }

        async fn resize_node(&self, node_id: &str, width: f64, height: f64) -> Result<CanvasNode> {
            let mut nodes = self.nodes.write().unwrap();
            let node = nodes.iter_mut().find(|n| n.id == node_id).unwrap();
            node.width = Some(width);
            node.height = Some(height);
            Ok(node.clone())
        }

        async fn update_payload(&self, node_id: &str, payload: NodePayload) -> Result<NodePayload> {
            let node = self.get_node(node_id)?;
            self.payloads
                .write()
                .unwrap()
                .insert(node.payload_id, payload.clone());
            Ok(payload)
        }

        async fn delete_node(&self, node_id: &str) -> Result<usize> {
            let node = self.get_node(node_id)?;
            if node.node_type == NodeType::Group {
                for child in self.children(node_id) {
                    let position = to_absolute(child.position, &node);
                    self.apply_placement(GroupPlacement {
                        node_id: child.id,
                        parent_group_id: None,
                        position,
                    })
                    .await?;
                }
            }
            Ok(self.remove_node_rows(node_id))
        }

        async fn delete_group(&self, group_id: &str, delete_children: bool) -> Result<usize> {
            let mut removed = 0;
            for child in self.children(group_id) {
                if delete_children {
                    removed += self.remove_node_rows(&child.id);
                } else {
                    self.apply_placement(GroupPlacement {
                        node_id: child.id,
                        parent_group_id: None,
                        position: child.position,
                    })
                    .await?;
                }
            }
            Ok(removed + self.remove_node_rows(group_id))
        }

        fn get_edge(&self, edge_id: &str) -> Result<CanvasEdge> {
            self.edges
                .read()
                .unwrap()
                .iter()
                .find(|e| e.id == edge_id)
                .cloned()
                .ok_or_else(|| Error::NotFound("Canvas edge".to_string()))
        }

        fn list_edges(&self, canvas_id: &str) -> Result<Vec<CanvasEdge>> {
            Ok(self
                .edges
                .read()
                .unwrap()
                .iter()
                .filter(|e| e.canvas_id == canvas_id)
                .cloned()
                .collect())
        }

        async fn create_edge(&self, edge: CanvasEdge) -> Result<CanvasEdge> {
            let mut edges = self.edges.write().unwrap();
            if edges.iter().any(|e| {
                e.canvas_id == edge.canvas_id
                    && e.source_node_id == edge.source_node_id
                    && e.target_node_id == edge.target_node_id
            }) {
                return Err(Error::ConstraintViolation("edge already exists".to_string()));
            }
            edges.push(edge.clone());
            Ok(edge)
        }

        async fn delete_edge(&self, edge_id: &str) -> Result<usize> {
            let mut edges = self.edges.write().unwrap();
            let before = edges.len();
            edges.retain(|e| e.id != edge_id);
            Ok(before - edges.len())
        }
    }

    struct Fixture {
        service: CanvasService,
        repo: Arc<MockCanvasRepository>,
        sink: RecordingEventSink,
        ctx: RequestContext,
        canvas: Canvas,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(MockCanvasRepository::default());
        let sink = RecordingEventSink::new();
        let service = CanvasService::new(repo.clone(), Arc::new(sink.clone()));
        let ctx = RequestContext::new("user-1", Some("org-a".to_string()));
        let canvas = service
            .create_canvas(
                &ctx,
                NewCanvas {
                    name: "Research".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        Fixture {
            service,
            repo,
            sink,
            ctx,
            canvas,
        }
    }

    impl Fixture {
        async fn text(&self, content: &str, x: f64, y: f64) -> CanvasNode {
            self.service
                .create_node(
                    &self.ctx,
                    NewCanvasNode {
                        canvas_id: self.canvas.id.clone(),
                        payload: NodePayload::Text {
                            content: content.to_string(),
                        },
                        position: Position::new(x, y),
                        width: None,
                        height: None,
                        parent_group_id: None,
                    },
                )
                .await
                .unwrap()
                .node
        }

        async fn group(&self, x: f64, y: f64) -> CanvasNode {
            self.service
                .create_group(
                    &self.ctx,
                    NewCanvasGroup {
                        canvas_id: self.canvas.id.clone(),
                        label: "Ideas".to_string(),
                        position: Position::new(x, y),
                        width: Some(660.0),
                        height: Some(480.0),
                    },
                )
                .await
                .unwrap()
                .node
        }

        async fn edge(&self, source: &str, target: &str) -> Result<CanvasEdge> {
            self.service
                .create_edge(
                    &self.ctx,
                    NewCanvasEdge {
                        canvas_id: self.canvas.id.clone(),
                        source_node_id: source.to_string(),
                        target_node_id: target.to_string(),
                        source_handle: None,
                        target_handle: None,
                    },
                )
                .await
        }
    }

    #[tokio::test]
    async fn duplicate_edge_is_rejected() {
        let f = fixture().await;
        let a = f.text("a", 0.0, 0.0).await;
        let b = f.text("b", 400.0, 0.0).await;

        f.edge(&a.id, &b.id).await.unwrap();
        let second = f.edge(&a.id, &b.id).await;
        assert!(matches!(second, Err(Error::ConstraintViolation(ref m)) if m == "edge already exists"));
        assert!(matches!(f.edge(&a.id, &a.id).await, Err(Error::Validation(_))));
        assert_eq!(f.service.list_edges(&f.ctx, &f.canvas.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn children_fill_the_grid_in_order() {
        let f = fixture().await;
        let group = f.group(100.0, 100.0).await;
        let mut placed = Vec::new();
        for i in 0..3 {
            let node = f.text(&format!("n{}", i), 0.0, 0.0).await;
            placed.push(
                f.service
                    .add_node_to_group(&f.ctx, &node.id, &group.id)
                    .await
                    .unwrap(),
            );
        }
        assert_eq!(placed[0].position, Position::new(20.0, 20.0));
        assert_eq!(placed[1].position, Position::new(340.0, 20.0));
        assert_eq!(placed[2].position, Position::new(20.0, 240.0));
        assert_eq!(
            f.service.list_group_children(&f.ctx, &group.id).unwrap().len(),
            3
        );
    }

    #[tokio::test]
    async fn regrouping_into_same_group_is_a_no_op() {
        let f = fixture().await;
        let group = f.group(0.0, 0.0).await;
        let node = f.text("n", 0.0, 0.0).await;
        let first = f
            .service
            .add_node_to_group(&f.ctx, &node.id, &group.id)
            .await
            .unwrap();
        let again = f
            .service
            .add_node_to_group(&f.ctx, &node.id, &group.id)
            .await
            .unwrap();
        assert_eq!(first.position, again.position);
        assert_eq!(f.repo.children(&group.id).len(), 1);
    }

    #[tokio::test]
    async fn grouping_rules() {
        let f = fixture().await;
        let group = f.group(0.0, 0.0).await;
        let other_group = f.group(800.0, 0.0).await;
        let node = f.text("n", 0.0, 0.0).await;

        let self_group = f.service.add_node_to_group(&f.ctx, &group.id, &group.id).await;
        assert!(matches!(self_group, Err(Error::Validation(_))));
        let nested = f
            .service
            .add_node_to_group(&f.ctx, &other_group.id, &group.id)
            .await;
        assert!(matches!(nested, Err(Error::Validation(_))));
        let into_text = f.service.add_node_to_group(&f.ctx, &group.id, &node.id).await;
        assert!(matches!(into_text, Err(Error::Validation(_))));
    }

    fn text_into(canvas_id: &str, parent_group_id: &str) -> NewCanvasNode {
        NewCanvasNode {
            canvas_id: canvas_id.to_string(),
            payload: NodePayload::Text {
                content: "grouped".to_string(),
            },
            position: Position::new(900.0, 900.0),
            width: None,
            height: None,
            parent_group_id: Some(parent_group_id.to_string()),
        }
    }

    #[tokio::test]
    async fn groups_only_accept_nodes_from_their_own_canvas() {
        let f = fixture().await;
        let second = f
            .service
            .create_canvas(
                &f.ctx,
                NewCanvas {
                    name: "Second".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let foreign_group = f
            .service
            .create_group(
                &f.ctx,
                NewCanvasGroup {
                    canvas_id: second.id.clone(),
                    label: "Elsewhere".to_string(),
                    position: Position::new(0.0, 0.0),
                    width: None,
                    height: None,
                },
            )
            .await
            .unwrap()
            .node;
        let node = f.text("n", 10.0, 10.0).await;

        let moved = f
            .service
            .add_node_to_group(&f.ctx, &node.id, &foreign_group.id)
            .await;
        assert!(matches!(moved, Err(Error::Validation(_))));
        let created = f
            .service
            .create_node(&f.ctx, text_into(&f.canvas.id, &foreign_group.id))
            .await;
        assert!(matches!(created, Err(Error::Validation(_))));

        let untouched = f.repo.get_node(&node.id).unwrap();
        assert_eq!(untouched.parent_group_id, None);
        assert_eq!(untouched.position, Position::new(10.0, 10.0));
        assert!(f.repo.children(&foreign_group.id).is_empty());
    }

    #[tokio::test]
    async fn new_node_parent_must_be_a_group() {
        let f = fixture().await;
        let text = f.text("not a group", 0.0, 0.0).await;

        let created = f
            .service
            .create_node(&f.ctx, text_into(&f.canvas.id, &text.id))
            .await;
        assert!(matches!(created, Err(Error::Validation(_))));
        assert_eq!(f.repo.list_nodes(&f.canvas.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn node_created_inside_group_takes_next_grid_slot() {
        let f = fixture().await;
        let group = f.group(100.0, 100.0).await;
        let first = f.text("first", 0.0, 0.0).await;
        f.service
            .add_node_to_group(&f.ctx, &first.id, &group.id)
            .await
            .unwrap();

        let created = f
            .service
            .create_node(&f.ctx, text_into(&f.canvas.id, &group.id))
            .await
            .unwrap()
            .node;
        assert_eq!(created.parent_group_id.as_deref(), Some(group.id.as_str()));
        assert_eq!(created.position, grid_slot(1));
        assert_eq!(f.repo.children(&group.id).len(), 2);
    }

    #[tokio::test]
    async fn ungroup_keeps_on_screen_position() {
        let f = fixture().await;
        let group = f.group(100.0, 50.0).await;
        let node = f.text("n", 5.0, 5.0).await;
        let grouped = f
            .service
            .add_node_to_group(&f.ctx, &node.id, &group.id)
            .await
            .unwrap();
        let on_screen = to_absolute(grouped.position, &group);

        let released = f
            .service
            .remove_node_from_group(&f.ctx, &node.id, None)
            .await
            .unwrap();
        assert_eq!(released.parent_group_id, None);
        assert_eq!(released.position, on_screen);
        assert_eq!(released.position, Position::new(120.0, 70.0));
    }

    #[tokio::test]
    async fn ungroup_with_explicit_position() {
        let f = fixture().await;
        let group = f.group(100.0, 50.0).await;
        let node = f.text("n", 5.0, 5.0).await;
        f.service
            .add_node_to_group(&f.ctx, &node.id, &group.id)
            .await
            .unwrap();
        let released = f
            .service
            .remove_node_from_group(&f.ctx, &node.id, Some(Position::new(-10.0, 900.0)))
            .await
            .unwrap();
        assert_eq!(released.position, Position::new(-10.0, 900.0));
    }

    #[tokio::test]
    async fn delete_group_with_children_removes_everything() {
        let f = fixture().await;
        let group = f.group(0.0, 0.0).await;
        let outside = f.text("outside", 900.0, 0.0).await;
        let a = f.text("a", 0.0, 0.0).await;
        let b = f.text("b", 0.0, 0.0).await;
        for n in [&a, &b] {
            f.service
                .add_node_to_group(&f.ctx, &n.id, &group.id)
                .await
                .unwrap();
        }
        f.edge(&a.id, &outside.id).await.unwrap();
        f.edge(&outside.id, &b.id).await.unwrap();

        f.service.delete_group(&f.ctx, &group.id, true).await.unwrap();

        let graph = f.service.get_canvas_graph(&f.ctx, &f.canvas.id).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].node.id, outside.id);
        assert!(graph.edges.is_empty());
        assert_eq!(f.repo.payloads.read().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_group_keeping_children_clears_parent() {
        let f = fixture().await;
        let group = f.group(300.0, 300.0).await;
        let a = f.text("a", 0.0, 0.0).await;
        let grouped = f
            .service
            .add_node_to_group(&f.ctx, &a.id, &group.id)
            .await
            .unwrap();

        f.service.delete_group(&f.ctx, &group.id, false).await.unwrap();

        let kept = f.service.get_node(&f.ctx, &a.id).unwrap();
        assert_eq!(kept.node.parent_group_id, None);
        assert_eq!(kept.node.position, grouped.position);
        assert!(f.service.get_node(&f.ctx, &group.id).is_err());
    }

    #[tokio::test]
    async fn graph_lists_groups_before_children() {
        let f = fixture().await;
        let node = f.text("first", 0.0, 0.0).await;
        let group = f.group(0.0, 0.0).await;
        f.service
            .add_node_to_group(&f.ctx, &node.id, &group.id)
            .await
            .unwrap();

        let graph = f.service.get_canvas_graph(&f.ctx, &f.canvas.id).unwrap();
        let ids: Vec<_> = graph.nodes.iter().map(|n| n.node.id.clone()).collect();
        assert_eq!(ids, vec![group.id.clone(), node.id.clone()]);
    }

    #[tokio::test]
    async fn other_organization_is_locked_out() {
        let f = fixture().await;
        let node = f.text("secret", 0.0, 0.0).await;
        let intruder = RequestContext::new("user-2", Some("org-b".to_string()));

        assert!(matches!(
            f.service.get_canvas(&intruder, &f.canvas.id),
            Err(Error::Unauthorized(_))
        ));
        assert!(f.service.get_node(&intruder, &node.id).is_err());
        assert!(f.service.delete_node(&intruder, &node.id).await.is_err());
        assert!(f.service.list_canvases(&intruder).unwrap().is_empty());
    }

    #[tokio::test]
    async fn payload_updates_must_match_node_type() {
        let f = fixture().await;
        let node = f.text("a", 0.0, 0.0).await;
        let wrong = f
            .service
            .update_node_payload(
                &f.ctx,
                &node.id,
                NodePayload::Group {
                    label: "x".to_string(),
                },
            )
            .await;
        assert!(matches!(wrong, Err(Error::Validation(_))));

        let chat_on_text = f
            .service
            .append_chat_message(
                &f.ctx,
                &node.id,
                NewChatMessage {
                    role: ChatRole::User,
                    content: "hi".to_string(),
                },
            )
            .await;
        assert!(matches!(chat_on_text, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn chat_messages_append_in_order() {
        let f = fixture().await;
        let chat = f
            .service
            .create_node(
                &f.ctx,
                NewCanvasNode {
                    canvas_id: f.canvas.id.clone(),
                    payload: NodePayload::Chat {
                        title: " ".to_string(),
                        messages: vec![],
                    },
                    position: Position::default(),
                    width: None,
                    height: None,
                    parent_group_id: None,
                },
            )
            .await
            .unwrap();
        for (role, content) in [(ChatRole::User, "hi"), (ChatRole::Assistant, "hello")] {
            f.service
                .append_chat_message(
                    &f.ctx,
                    &chat.node.id,
                    NewChatMessage {
                        role,
                        content: content.to_string(),
                    },
                )
                .await
                .unwrap();
        }
        let stored = f.service.get_node(&f.ctx, &chat.node.id).unwrap();
        match stored.payload {
            NodePayload::Chat { title, messages } => {
                assert_eq!(title, "New chat");
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[1].role, ChatRole::Assistant);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[tokio::test]
    async fn mutations_emit_canvas_changed() {
        let f = fixture().await;
        let node = f.text("a", 0.0, 0.0).await;
        f.service
            .resize_node(&f.ctx, &node.id, 320.0, 240.0)
            .await
            .unwrap();
        assert!(f
            .service
            .resize_node(&f.ctx, &node.id, 0.0, 240.0)
            .await
            .is_err());
        let expected = DomainEvent::canvas_changed(f.canvas.id.clone(), "org-a");
        assert_eq!(f.sink.events(), vec![expected.clone(), expected]);
    }

    #[tokio::test]
    async fn position_batch_rejects_foreign_nodes() {
        let f = fixture().await;
        let node = f.text("a", 0.0, 0.0).await;
        let result = f
            .service
            .update_node_positions(
                &f.ctx,
                &f.canvas.id,
                vec![
                    NodePositionUpdate {
                        node_id: node.id.clone(),
                        position: Position::new(1.0, 1.0),
                    },
                    NodePositionUpdate {
                        node_id: "missing".to_string(),
                        position: Position::new(2.0, 2.0),
                    },
                ],
            )
            .await;
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(
            f.service.get_node(&f.ctx, &node.id).unwrap().node.position,
            Position::new(0.0, 0.0)
        );
    }
}
