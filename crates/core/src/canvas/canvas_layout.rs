//! Group grid placement.
//!
//! Children of a group store their position relative to the group. New
//! children are appended to a two-column grid; existing children never move.

use super::canvas_model::{CanvasNode, Position};
use crate::constants::{
    GROUP_CHILD_HEIGHT, GROUP_CHILD_WIDTH, GROUP_COLUMNS, GROUP_GAP, GROUP_PADDING,
};

/// Relative position of the `index`-th child of a group.
pub fn grid_slot(index: usize) -> Position {
    let column = (index % GROUP_COLUMNS) as f64;
    let row = (index / GROUP_COLUMNS) as f64;
    Position::new(
        GROUP_PADDING + column * (GROUP_CHILD_WIDTH + GROUP_GAP),
        GROUP_PADDING + row * (GROUP_CHILD_HEIGHT + GROUP_GAP),
    )
}

/// Converts a child's relative position into canvas coordinates.
pub fn to_absolute(relative: Position, parent: &CanvasNode) -> Position {
    relative + parent.position
}

/// Position a node takes when it leaves its group. An explicit position wins;
/// otherwise the node keeps its on-screen spot, or its stored position when
/// the parent is gone.
pub fn position_after_ungroup(
    node: &CanvasNode,
    parent: Option<&CanvasNode>,
    explicit: Option<Position>,
) -> Position {
    if let Some(position) = explicit {
        return position;
    }
    match parent {
        Some(parent) => to_absolute(node.position, parent),
        None => node.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NodeType;
    use crate::utils::time_utils::now_utc;

    fn node(id: &str, position: Position) -> CanvasNode {
        let now = now_utc();
        CanvasNode {
            id: id.to_string(),
            canvas_id: "c1".to_string(),
            organization_id: "org-a".to_string(),
            node_type: NodeType::Text,
            payload_id: format!("p-{}", id),
            position,
            width: None,
            height: None,
            parent_group_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn grid_fills_two_columns() {
        assert_eq!(grid_slot(0), Position::new(20.0, 20.0));
        assert_eq!(grid_slot(1), Position::new(340.0, 20.0));
        assert_eq!(grid_slot(2), Position::new(20.0, 240.0));
        assert_eq!(grid_slot(5), Position::new(340.0, 460.0));
    }

    #[test]
    fn ungroup_prefers_explicit_then_parent_offset() {
        let parent = node("g", Position::new(100.0, 50.0));
        let child = node("n", grid_slot(1));

        assert_eq!(
            position_after_ungroup(&child, Some(&parent), Some(Position::new(1.0, 2.0))),
            Position::new(1.0, 2.0)
        );
        assert_eq!(
            position_after_ungroup(&child, Some(&parent), None),
            Position::new(440.0, 70.0)
        );
        assert_eq!(position_after_ungroup(&child, None, None), grid_slot(1));
    }
}
