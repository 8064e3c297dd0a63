use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use adscout_core::canvas::{
    grid_slot, position_after_ungroup, Canvas, CanvasEdge, CanvasNode, CanvasNodeWithPayload,
    CanvasRepositoryTrait, GroupPlacement, NodePayload, NodePositionUpdate, NodeType,
};
use adscout_core::utils::time_utils::now_utc;
use adscout_core::{Error, Result};

use super::model::{CanvasDB, CanvasEdgeDB, CanvasNodeDB, CanvasNodePayloadDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{canvas_edges, canvas_node_payloads, canvas_nodes, canvases};
use crate::utils::chunk_for_sqlite;

pub struct CanvasRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CanvasRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn load_node(conn: &mut SqliteConnection, node_id: &str) -> Result<CanvasNodeDB> {
    not_found_as(
        canvas_nodes::table
            .find(node_id)
            .select(CanvasNodeDB::as_select())
            .first::<CanvasNodeDB>(conn),
        "Canvas node",
    )
}

fn load_children(conn: &mut SqliteConnection, group_id: &str) -> Result<Vec<CanvasNodeDB>> {
    Ok(canvas_nodes::table
        .filter(canvas_nodes::parent_group_id.eq(group_id))
        .select(CanvasNodeDB::as_select())
        .order((canvas_nodes::created_at.asc(), canvas_nodes::id.asc()))
        .load::<CanvasNodeDB>(conn)
        .map_err(StorageError::from)?)
}

fn count_children(conn: &mut SqliteConnection, group_id: &str) -> Result<usize> {
    let count: i64 = canvas_nodes::table
        .filter(canvas_nodes::parent_group_id.eq(group_id))
        .count()
        .get_result(conn)
        .map_err(StorageError::from)?;
    Ok(count as usize)
}

fn touch_canvas(conn: &mut SqliteConnection, canvas_id: &str) -> Result<()> {
    diesel::update(canvases::table.find(canvas_id))
        .set(canvases::updated_at.eq(now_utc()))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

fn write_position(
    conn: &mut SqliteConnection,
    node_id: &str,
    parent_group_id: Option<&str>,
    x: f64,
    y: f64,
) -> Result<CanvasNodeDB> {
    not_found_as(
        diesel::update(canvas_nodes::table.find(node_id))
            .set((
                canvas_nodes::parent_group_id.eq(parent_group_id),
                canvas_nodes::position_x.eq(x),
                canvas_nodes::position_y.eq(y),
                canvas_nodes::updated_at.eq(now_utc()),
            ))
            .returning(CanvasNodeDB::as_returning())
            .get_result(conn),
        "Canvas node",
    )
}

/// Removes one node row with its edges and payload. Children must already
/// have been detached.
fn remove_node_row(conn: &mut SqliteConnection, node: &CanvasNodeDB) -> Result<usize> {
    let edges = diesel::delete(
        canvas_edges::table.filter(
            canvas_edges::source_node_id
                .eq(&node.id)
                .or(canvas_edges::target_node_id.eq(&node.id)),
        ),
    )
    .execute(conn)
    .map_err(StorageError::from)?;
    let nodes = diesel::delete(canvas_nodes::table.find(&node.id))
        .execute(conn)
        .map_err(StorageError::from)?;
    let payloads = diesel::delete(canvas_node_payloads::table.find(&node.payload_id))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(edges + nodes + payloads)
}

#[async_trait]
impl CanvasRepositoryTrait for CanvasRepository {
    fn get_canvas(&self, canvas_id: &str) -> Result<Canvas> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            canvases::table
                .find(canvas_id)
                .select(CanvasDB::as_select())
                .first::<CanvasDB>(&mut conn),
            "Canvas",
        )?;
        Ok(row.into())
    }

    fn list_canvases(&self, organization_id: &str) -> Result<Vec<Canvas>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = canvases::table
            .filter(canvases::organization_id.eq(organization_id))
            .select(CanvasDB::as_select())
            .order((canvases::updated_at.desc(), canvases::id.asc()))
            .load::<CanvasDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Canvas::from).collect())
    }

    async fn create_canvas(&self, canvas: Canvas) -> Result<Canvas> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Canvas> {
                let row = diesel::insert_into(canvases::table)
                    .values(CanvasDB::from(canvas))
                    .returning(CanvasDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update_canvas(&self, canvas: Canvas) -> Result<Canvas> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Canvas> {
                let canvas_db = CanvasDB::from(canvas);
                let row = not_found_as(
                    diesel::update(canvases::table.find(&canvas_db.id))
                        .set(&canvas_db)
                        .returning(CanvasDB::as_returning())
                        .get_result(conn),
                    "Canvas",
                )?;
                Ok(row.into())
            })
            .await
    }

    async fn delete_canvas(&self, canvas_id: &str) -> Result<usize> {
        let canvas_id = canvas_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let edges = diesel::delete(
                    canvas_edges::table.filter(canvas_edges::canvas_id.eq(&canvas_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::update(canvas_nodes::table.filter(canvas_nodes::canvas_id.eq(&canvas_id)))
                    .set(canvas_nodes::parent_group_id.eq(None::<String>))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let payload_ids: Vec<String> = canvas_nodes::table
                    .filter(canvas_nodes::canvas_id.eq(&canvas_id))
                    .select(canvas_nodes::payload_id)
                    .load(conn)
                    .map_err(StorageError::from)?;
                let nodes = diesel::delete(
                    canvas_nodes::table.filter(canvas_nodes::canvas_id.eq(&canvas_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                let mut payloads = 0;
                for chunk in chunk_for_sqlite(&payload_ids) {
                    payloads += diesel::delete(
                        canvas_node_payloads::table.filter(canvas_node_payloads::id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                let removed = diesel::delete(canvases::table.find(&canvas_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if removed == 0 {
                    return Err(Error::NotFound("Canvas".to_string()));
                }
                Ok(edges + nodes + payloads + removed)
            })
            .await
    }

    fn get_node(&self, node_id: &str) -> Result<CanvasNode> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_node(&mut conn, node_id)?.into())
    }

    fn list_nodes(&self, canvas_id: &str) -> Result<Vec<CanvasNode>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = canvas_nodes::table
            .filter(canvas_nodes::canvas_id.eq(canvas_id))
            .select(CanvasNodeDB::as_select())
            .order((canvas_nodes::created_at.asc(), canvas_nodes::id.asc()))
            .load::<CanvasNodeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CanvasNode::from).collect())
    }

    fn list_nodes_with_payloads(&self, canvas_id: &str) -> Result<Vec<CanvasNodeWithPayload>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = canvas_nodes::table
            .inner_join(canvas_node_payloads::table)
            .filter(canvas_nodes::canvas_id.eq(canvas_id))
            .select((CanvasNodeDB::as_select(), CanvasNodePayloadDB::as_select()))
            .order((canvas_nodes::created_at.asc(), canvas_nodes::id.asc()))
            .load::<(CanvasNodeDB, CanvasNodePayloadDB)>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|(node, payload)| -> Result<CanvasNodeWithPayload> {
                Ok(CanvasNodeWithPayload {
                    payload: payload.decode()?,
                    node: node.into(),
                })
            })
            .collect()
    }

    fn get_payload(&self, payload_id: &str) -> Result<NodePayload> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            canvas_node_payloads::table
                .find(payload_id)
                .select(CanvasNodePayloadDB::as_select())
                .first::<CanvasNodePayloadDB>(&mut conn),
            "Node payload",
        )?;
        Ok(row.decode()?)
    }

    fn list_group_children(&self, group_id: &str) -> Result<Vec<CanvasNode>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_children(&mut conn, group_id)?
            .into_iter()
            .map(CanvasNode::from)
            .collect())
    }

    async fn create_node(&self, node: CanvasNode, payload: NodePayload) -> Result<CanvasNode> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CanvasNode> {
                let mut node_db = CanvasNodeDB::from(node);
                if let Some(group_id) = node_db.parent_group_id.clone() {
                    let slot = grid_slot(count_children(conn, &group_id)?);
                    node_db.position_x = slot.x;
                    node_db.position_y = slot.y;
                }
                let payload_db = CanvasNodePayloadDB::encode(
                    node_db.payload_id.clone(),
                    node_db.organization_id.clone(),
                    &payload,
                )?;
                diesel::insert_into(canvas_node_payloads::table)
                    .values(&payload_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let row = diesel::insert_into(canvas_nodes::table)
                    .values(&node_db)
                    .returning(CanvasNodeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                touch_canvas(conn, &row.canvas_id)?;
                Ok(row.into())
            })
            .await
    }

    async fn place_in_group(&self, node_id: &str, group_id: &str) -> Result<CanvasNode> {
        let node_id = node_id.to_string();
        let group_id = group_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CanvasNode> {
                let slot = grid_slot(count_children(conn, &group_id)?);
                let row = write_position(conn, &node_id, Some(&group_id), slot.x, slot.y)?;
                touch_canvas(conn, &row.canvas_id)?;
                Ok(row.into())
            })
            .await
    }

    async fn apply_placement(&self, placement: GroupPlacement) -> Result<CanvasNode> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CanvasNode> {
                let row = write_position(
                    conn,
                    &placement.node_id,
                    placement.parent_group_id.as_deref(),
                    placement.position.x,
                    placement.position.y,
                )?;
                touch_canvas(conn, &row.canvas_id)?;
                Ok(row.into())
            })
            .await
    }

    async fn update_positions(
        &self,
        canvas_id: &str,
        updates: Vec<NodePositionUpdate>,
    ) -> Result<usize> {
        let canvas_id = canvas_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let now = now_utc();
                let mut updated = 0;
                for update in updates {
                    updated += diesel::update(
                        canvas_nodes::table
                            .filter(canvas_nodes::id.eq(&update.node_id))
                            .filter(canvas_nodes::canvas_id.eq(&canvas_id)),
                    )
                    .set((
                        canvas_nodes::position_x.eq(update.position.x),
                        canvas_nodes::position_y.eq(update.position.y),
                        canvas_nodes::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                touch_canvas(conn, &canvas_id)?;
                Ok(updated)
            })
            .await
    }

    async fn resize_node(&self, node_id: &str, width: f64, height: f64) -> Result<CanvasNode> {
        let node_id = node_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CanvasNode> {
                let row = not_found_as(
                    diesel::update(canvas_nodes::table.find(&node_id))
                        .set((
                            canvas_nodes::width.eq(Some(width)),
                            canvas_nodes::height.eq(Some(height)),
                            canvas_nodes::updated_at.eq(now_utc()),
                        ))
                        .returning(CanvasNodeDB::as_returning())
                        .get_result(conn),
                    "Canvas node",
                )?;
                touch_canvas(conn, &row.canvas_id)?;
                Ok(row.into())
            })
            .await
    }

    async fn update_payload(&self, node_id: &str, payload: NodePayload) -> Result<NodePayload> {
        let node_id = node_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<NodePayload> {
                let node = load_node(conn, &node_id)?;
                let payload_db = CanvasNodePayloadDB::encode(
                    node.payload_id.clone(),
                    node.organization_id,
                    &payload,
                )?;
                diesel::update(canvas_node_payloads::table.find(&node.payload_id))
                    .set((
                        canvas_node_payloads::node_type.eq(&payload_db.node_type),
                        canvas_node_payloads::data.eq(&payload_db.data),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::update(canvas_nodes::table.find(&node_id))
                    .set(canvas_nodes::updated_at.eq(now_utc()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                touch_canvas(conn, &node.canvas_id)?;
                Ok(payload)
            })
            .await
    }

    async fn delete_node(&self, node_id: &str) -> Result<usize> {
        let node_id = node_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let node = load_node(conn, &node_id)?;
                if node.node_type == NodeType::Group.as_str() {
                    let group = CanvasNode::from(node.clone());
                    for child in load_children(conn, &node.id)? {
                        let child = CanvasNode::from(child);
                        let released = position_after_ungroup(&child, Some(&group), None);
                        write_position(conn, &child.id, None, released.x, released.y)?;
                    }
                }
                let removed = remove_node_row(conn, &node)?;
                touch_canvas(conn, &node.canvas_id)?;
                Ok(removed)
            })
            .await
    }

    async fn delete_group(&self, group_id: &str, delete_children: bool) -> Result<usize> {
        let group_id = group_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let group = load_node(conn, &group_id)?;
                let children = load_children(conn, &group.id)?;
                let mut removed = 0;
                if delete_children {
                    for child in &children {
                        removed += remove_node_row(conn, child)?;
                    }
                } else {
                    diesel::update(
                        canvas_nodes::table.filter(canvas_nodes::parent_group_id.eq(&group.id)),
                    )
                    .set(canvas_nodes::parent_group_id.eq(None::<String>))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                removed += remove_node_row(conn, &group)?;
                touch_canvas(conn, &group.canvas_id)?;
                debug!(
                    "Group {} removed with {} children ({})",
                    group.id,
                    children.len(),
                    if delete_children { "deleted" } else { "detached" }
                );
                Ok(removed)
            })
            .await
    }

    fn get_edge(&self, edge_id: &str) -> Result<CanvasEdge> {
        let mut conn = get_connection(&self.pool)?;
        let row = not_found_as(
            canvas_edges::table
                .find(edge_id)
                .select(CanvasEdgeDB::as_select())
                .first::<CanvasEdgeDB>(&mut conn),
            "Canvas edge",
        )?;
        Ok(row.into())
    }

    fn list_edges(&self, canvas_id: &str) -> Result<Vec<CanvasEdge>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = canvas_edges::table
            .filter(canvas_edges::canvas_id.eq(canvas_id))
            .select(CanvasEdgeDB::as_select())
            .order((canvas_edges::created_at.asc(), canvas_edges::id.asc()))
            .load::<CanvasEdgeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CanvasEdge::from).collect())
    }

    async fn create_edge(&self, edge: CanvasEdge) -> Result<CanvasEdge> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CanvasEdge> {
                let existing = canvas_edges::table
                    .filter(canvas_edges::canvas_id.eq(&edge.canvas_id))
                    .filter(canvas_edges::source_node_id.eq(&edge.source_node_id))
                    .filter(canvas_edges::target_node_id.eq(&edge.target_node_id))
                    .select(canvas_edges::id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if existing.is_some() {
                    return Err(Error::ConstraintViolation("edge already exists".to_string()));
                }
                let row = diesel::insert_into(canvas_edges::table)
                    .values(CanvasEdgeDB::from(edge))
                    .returning(CanvasEdgeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                touch_canvas(conn, &row.canvas_id)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete_edge(&self, edge_id: &str) -> Result<usize> {
        let edge_id = edge_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let edge = not_found_as(
                    canvas_edges::table
                        .find(&edge_id)
                        .select(CanvasEdgeDB::as_select())
                        .first::<CanvasEdgeDB>(conn),
                    "Canvas edge",
                )?;
                let removed = diesel::delete(canvas_edges::table.find(&edge_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                touch_canvas(conn, &edge.canvas_id)?;
                Ok(removed)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;
    use adscout_core::canvas::{
        CanvasService, CanvasServiceTrait, NewCanvas, NewCanvasEdge, NewCanvasGroup,
        NewCanvasNode, Position,
    };
    use adscout_core::events::NoOpDomainEventSink;
    use adscout_core::RequestContext;

    struct Fixture {
        service: CanvasService,
        repo: Arc<CanvasRepository>,
        ctx: RequestContext,
        canvas_id: String,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let (pool, writer, dir) = setup_db();
        let repo = Arc::new(CanvasRepository::new(pool, writer));
        let service = CanvasService::new(repo.clone(), Arc::new(NoOpDomainEventSink));
        let ctx = RequestContext::new("alice", Some("org-a".to_string()));
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
            ctx,
            canvas_id: canvas.id,
            _dir: dir,
        }
    }

    impl Fixture {
        async fn text(&self, content: &str, position: Position) -> String {
            self.service
                .create_node(
                    &self.ctx,
                    NewCanvasNode {
                        canvas_id: self.canvas_id.clone(),
                        payload: NodePayload::Text {
                            content: content.to_string(),
                        },
                        position,
                        width: None,
                        height: None,
                        parent_group_id: None,
                    },
                )
                .await
                .unwrap()
                .node
                .id
        }

        async fn group(&self, position: Position) -> String {
            self.service
                .create_group(
                    &self.ctx,
                    NewCanvasGroup {
                        canvas_id: self.canvas_id.clone(),
                        label: "Hooks".to_string(),
                        position,
                        width: Some(700.0),
                        height: Some(500.0),
                    },
                )
                .await
                .unwrap()
                .node
                .id
        }
    }

    #[tokio::test]
    async fn grouping_uses_grid_and_ungrouping_restores_canvas_position() {
        let f = fixture().await;
        let group = f.group(Position::new(100.0, 50.0)).await;
        let first = f.text("one", Position::new(900.0, 900.0)).await;
        let second = f.text("two", Position::new(10.0, 10.0)).await;

        let placed = f.service.add_node_to_group(&f.ctx, &first, &group).await.unwrap();
        assert_eq!(placed.position, grid_slot(0));
        let placed = f.service.add_node_to_group(&f.ctx, &second, &group).await.unwrap();
        assert_eq!(placed.position, grid_slot(1));
        assert_eq!(f.service.list_group_children(&f.ctx, &group).unwrap().len(), 2);

        let released = f
            .service
            .remove_node_from_group(&f.ctx, &first, None)
            .await
            .unwrap();
        assert_eq!(released.parent_group_id, None);
        assert_eq!(released.position, Position::new(120.0, 70.0));

        let moved = f
            .service
            .remove_node_from_group(&f.ctx, &second, Some(Position::new(5.0, 6.0)))
            .await
            .unwrap();
        assert_eq!(moved.position, Position::new(5.0, 6.0));
    }

    #[tokio::test]
    async fn node_created_inside_group_is_stored_at_next_grid_slot() {
        let f = fixture().await;
        let group = f.group(Position::new(100.0, 50.0)).await;
        let existing = f.text("existing", Position::default()).await;
        f.service.add_node_to_group(&f.ctx, &existing, &group).await.unwrap();

        let created = f
            .service
            .create_node(
                &f.ctx,
                NewCanvasNode {
                    canvas_id: f.canvas_id.clone(),
                    payload: NodePayload::Text {
                        content: "direct".to_string(),
                    },
                    position: Position::new(900.0, 900.0),
                    width: None,
                    height: None,
                    parent_group_id: Some(group.clone()),
                },
            )
            .await
            .unwrap()
            .node;
        assert_eq!(created.position, grid_slot(1));

        let stored = f.repo.get_node(&created.id).unwrap();
        assert_eq!(stored.parent_group_id.as_deref(), Some(group.as_str()));
        assert_eq!(stored.position, grid_slot(1));
        assert_eq!(f.service.list_group_children(&f.ctx, &group).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleting_group_node_releases_children_to_absolute_positions() {
        let f = fixture().await;
        let group = f.group(Position::new(100.0, 50.0)).await;
        let child = f.text("child", Position::default()).await;
        f.service.add_node_to_group(&f.ctx, &child, &group).await.unwrap();

        f.service.delete_node(&f.ctx, &group).await.unwrap();

        let released = f.repo.get_node(&child).unwrap();
        assert_eq!(released.parent_group_id, None);
        assert_eq!(released.position, Position::new(120.0, 70.0));
    }

    #[tokio::test]
    async fn delete_group_keeps_or_removes_children() {
        let f = fixture().await;
        let kept_group = f.group(Position::new(0.0, 0.0)).await;
        let kept = f.text("kept", Position::default()).await;
        f.service.add_node_to_group(&f.ctx, &kept, &kept_group).await.unwrap();

        f.service.delete_group(&f.ctx, &kept_group, false).await.unwrap();
        let detached = f.repo.get_node(&kept).unwrap();
        assert_eq!(detached.parent_group_id, None);
        assert_eq!(detached.position, grid_slot(0));

        let doomed_group = f.group(Position::new(0.0, 0.0)).await;
        let doomed = f.text("doomed", Position::default()).await;
        f.service.add_node_to_group(&f.ctx, &doomed, &doomed_group).await.unwrap();
        let payload_id = f.repo.get_node(&doomed).unwrap().payload_id;

        f.service.delete_group(&f.ctx, &doomed_group, true).await.unwrap();
        assert!(f.repo.get_node(&doomed).unwrap_err().is_not_found());
        assert!(f.repo.get_payload(&payload_id).unwrap_err().is_not_found());
        assert_eq!(f.repo.list_nodes(&f.canvas_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_edges_conflict_and_node_delete_removes_edges() {
        let f = fixture().await;
        let a = f.text("a", Position::default()).await;
        let b = f.text("b", Position::new(400.0, 0.0)).await;
        let edge = |source: &str, target: &str| NewCanvasEdge {
            canvas_id: f.canvas_id.clone(),
            source_node_id: source.to_string(),
            target_node_id: target.to_string(),
            source_handle: None,
            target_handle: None,
        };

        f.service.create_edge(&f.ctx, edge(&a, &b)).await.unwrap();
        let duplicate = f.service.create_edge(&f.ctx, edge(&a, &b)).await;
        assert!(matches!(duplicate, Err(Error::ConstraintViolation(_))));
        let self_loop = f.service.create_edge(&f.ctx, edge(&a, &a)).await;
        assert!(matches!(self_loop, Err(Error::Validation(_))));
        f.service.create_edge(&f.ctx, edge(&b, &a)).await.unwrap();

        f.service.delete_node(&f.ctx, &a).await.unwrap();
        assert!(f.service.list_edges(&f.ctx, &f.canvas_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn graph_orders_groups_first_and_delete_canvas_cleans_up() {
        let f = fixture().await;
        let child = f.text("child", Position::default()).await;
        let group = f.group(Position::new(50.0, 50.0)).await;
        f.service.add_node_to_group(&f.ctx, &child, &group).await.unwrap();
        let other = f.text("other", Position::default()).await;
        f.service
            .create_edge(
                &f.ctx,
                NewCanvasEdge {
                    canvas_id: f.canvas_id.clone(),
                    source_node_id: child.clone(),
                    target_node_id: other.clone(),
                    source_handle: Some("right".to_string()),
                    target_handle: None,
                },
            )
            .await
            .unwrap();

        let graph = f.service.get_canvas_graph(&f.ctx, &f.canvas_id).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        let group_index = graph.nodes.iter().position(|n| n.node.id == group).unwrap();
        let child_index = graph.nodes.iter().position(|n| n.node.id == child).unwrap();
        assert!(group_index < child_index);
        assert_eq!(graph.edges.len(), 1);

        let outsider = RequestContext::new("mallory", Some("org-b".to_string()));
        assert!(matches!(
            f.service.get_canvas_graph(&outsider, &f.canvas_id),
            Err(Error::Unauthorized(_))
        ));

        f.service.delete_canvas(&f.ctx, &f.canvas_id).await.unwrap();
        assert!(f.repo.list_nodes(&f.canvas_id).unwrap().is_empty());
        assert!(f.repo.get_canvas(&f.canvas_id).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn node_mutations_bump_canvas_updated_at() {
        let f = fixture().await;
        let before = f.repo.get_canvas(&f.canvas_id).unwrap().updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        f.text("note", Position::default()).await;
        let after = f.repo.get_canvas(&f.canvas_id).unwrap().updated_at;
        assert!(after > before);
    }
}
