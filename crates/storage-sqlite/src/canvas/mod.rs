//! SQLite storage implementation for canvases, their nodes, node payloads and edges.

mod model;
mod repository;

pub use model::{CanvasDB, CanvasEdgeDB, CanvasNodeDB, CanvasNodePayloadDB};
pub use repository::CanvasRepository;
