//! Canvas domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCanvas {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CanvasUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Text,
    Chat,
    Youtube,
    Website,
    Tiktok,
    FacebookAd,
    Group,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Text => "text",
            NodeType::Chat => "chat",
            NodeType::Youtube => "youtube",
            NodeType::Website => "website",
            NodeType::Tiktok => "tiktok",
            NodeType::FacebookAd => "facebook_ad",
            NodeType::Group => "group",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(NodeType::Text),
            "chat" => Ok(NodeType::Chat),
            "youtube" => Ok(NodeType::Youtube),
            "website" => Ok(NodeType::Website),
            "tiktok" => Ok(NodeType::Tiktok),
            "facebook_ad" => Ok(NodeType::FacebookAd),
            "group" => Ok(NodeType::Group),
            other => Err(Error::invalid_input(format!("Unknown node type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Type-specific content of a node. The variant always matches the node's type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodePayload {
    Text {
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Chat {
        title: String,
        #[serde(default)]
        messages: Vec<ChatMessage>,
    },
    #[serde(rename_all = "camelCase")]
    Youtube {
        url: String,
        #[serde(default)]
        video_id: String,
        title: Option<String>,
        thumbnail_url: Option<String>,
        transcript: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Website {
        url: String,
        title: Option<String>,
        markdown: Option<String>,
        screenshot_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Tiktok {
        url: String,
        video_id: Option<String>,
        title: Option<String>,
        thumbnail_url: Option<String>,
        transcript: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    FacebookAd {
        ad_id: Option<String>,
        page_name: Option<String>,
        title: Option<String>,
        body: Option<String>,
        image_url: Option<String>,
        video_url: Option<String>,
    },
    Group {
        label: String,
    },
}

impl NodePayload {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodePayload::Text { .. } => NodeType::Text,
            NodePayload::Chat { .. } => NodeType::Chat,
            NodePayload::Youtube { .. } => NodeType::Youtube,
            NodePayload::Website { .. } => NodeType::Website,
            NodePayload::Tiktok { .. } => NodeType::Tiktok,
            NodePayload::FacebookAd { .. } => NodeType::FacebookAd,
            NodePayload::Group { .. } => NodeType::Group,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: String,
    pub canvas_id: String,
    pub organization_id: String,
    pub node_type: NodeType,
    pub payload_id: String,
    /// Absolute for top-level nodes, relative to the parent for grouped ones.
    pub position: Position,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub parent_group_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCanvasNode {
    pub canvas_id: String,
    pub payload: NodePayload,
    #[serde(default)]
    pub position: Position,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub parent_group_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCanvasGroup {
    pub canvas_id: String,
    pub label: String,
    #[serde(default)]
    pub position: Position,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePositionUpdate {
    pub node_id: String,
    pub position: Position,
}

/// Where a node ends up when grouped or ungrouped.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlacement {
    pub node_id: String,
    pub parent_group_id: Option<String>,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub canvas_id: String,
    pub organization_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCanvasEdge {
    pub canvas_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNodeWithPayload {
    #[serde(flatten)]
    pub node: CanvasNode,
    pub payload: NodePayload,
}

/// Client model of a canvas: groups precede their children.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasGraph {
    pub canvas: Canvas,
    pub nodes: Vec<CanvasNodeWithPayload>,
    pub edges: Vec<CanvasEdge>,
}
