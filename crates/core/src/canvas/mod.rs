//! Canvas module - boards of nodes, edges and single-level groups.

mod canvas_graph;
mod canvas_layout;
mod canvas_media;
mod canvas_model;
mod canvas_service;
mod canvas_traits;

pub use canvas_graph::order_parents_first;
pub use canvas_layout::{grid_slot, position_after_ungroup, to_absolute};
pub use canvas_media::{normalize_payload, parse_tiktok_video_id, parse_youtube_video_id};
pub use canvas_model::{
    Canvas, CanvasEdge, CanvasGraph, CanvasNode, CanvasNodeWithPayload, CanvasUpdate,
    ChatMessage, ChatRole, GroupPlacement, NewCanvas, NewCanvasEdge, NewCanvasGroup,
    NewCanvasNode, NewChatMessage, NodePayload, NodePositionUpdate, NodeType, Position,
};
pub use canvas_service::CanvasService;
pub use canvas_traits::{CanvasRepositoryTrait, CanvasServiceTrait};
