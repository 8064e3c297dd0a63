//! Database models for canvases.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use adscout_core::canvas::{Canvas, CanvasEdge, CanvasNode, NodePayload, NodeType, Position};

use crate::errors::StorageError;
use crate::utils::{parse_text_or, to_json_text};

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    Insertable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::canvases)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CanvasDB {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::canvas_nodes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CanvasNodeDB {
    pub id: String,
    pub canvas_id: String,
    pub organization_id: String,
    pub node_type: String,
    pub payload_id: String,
    pub position_x: f64,
    pub position_y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub parent_group_id: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Type-specific node content, stored as the tagged JSON of [`NodePayload`].
#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::canvas_node_payloads)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CanvasNodePayloadDB {
    pub id: String,
    pub organization_id: String,
    pub node_type: String,
    pub data: String,
}

#[derive(
    Queryable, Identifiable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::canvas_edges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdgeDB {
    pub id: String,
    pub canvas_id: String,
    pub organization_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<CanvasDB> for Canvas {
    fn from(db: CanvasDB) -> Self {
        Self {
            id: db.id,
            organization_id: db.organization_id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Canvas> for CanvasDB {
    fn from(domain: Canvas) -> Self {
        Self {
            id: domain.id,
            organization_id: domain.organization_id,
            user_id: domain.user_id,
            name: domain.name,
            description: domain.description,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl From<CanvasNodeDB> for CanvasNode {
    fn from(db: CanvasNodeDB) -> Self {
        Self {
            node_type: parse_text_or(&db.node_type, NodeType::Text, "canvas_nodes.node_type"),
            position: Position::new(db.position_x, db.position_y),
            id: db.id,
            canvas_id: db.canvas_id,
            organization_id: db.organization_id,
            payload_id: db.payload_id,
            width: db.width,
            height: db.height,
            parent_group_id: db.parent_group_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<CanvasNode> for CanvasNodeDB {
    fn from(domain: CanvasNode) -> Self {
        Self {
            id: domain.id,
            canvas_id: domain.canvas_id,
            organization_id: domain.organization_id,
            node_type: domain.node_type.as_str().to_string(),
            payload_id: domain.payload_id,
            position_x: domain.position.x,
            position_y: domain.position.y,
            width: domain.width,
            height: domain.height,
            parent_group_id: domain.parent_group_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl CanvasNodePayloadDB {
    pub fn encode(
        id: String,
        organization_id: String,
        payload: &NodePayload,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            id,
            organization_id,
            node_type: payload.node_type().as_str().to_string(),
            data: to_json_text(payload)?,
        })
    }

    pub fn decode(&self) -> Result<NodePayload, StorageError> {
        serde_json::from_str(&self.data).map_err(|e| {
            log::error!("Failed to decode payload {}: {}", self.id, e);
            StorageError::from(e)
        })
    }
}

impl From<CanvasEdgeDB> for CanvasEdge {
    fn from(db: CanvasEdgeDB) -> Self {
        Self {
            id: db.id,
            canvas_id: db.canvas_id,
            organization_id: db.organization_id,
            source_node_id: db.source_node_id,
            target_node_id: db.target_node_id,
            source_handle: db.source_handle,
            target_handle: db.target_handle,
            created_at: db.created_at,
        }
    }
}

impl From<CanvasEdge> for CanvasEdgeDB {
    fn from(domain: CanvasEdge) -> Self {
        Self {
            id: domain.id,
            canvas_id: domain.canvas_id,
            organization_id: domain.organization_id,
            source_node_id: domain.source_node_id,
            target_node_id: domain.target_node_id,
            source_handle: domain.source_handle,
            target_handle: domain.target_handle,
            created_at: domain.created_at,
        }
    }
}
