use std::collections::HashSet;

use super::canvas_model::CanvasNodeWithPayload;

/// Orders nodes so every group comes before its children, keeping the input
/// order otherwise. Children whose parent is absent stay in place.
pub fn order_parents_first(nodes: Vec<CanvasNodeWithPayload>) -> Vec<CanvasNodeWithPayload> {
    let present: HashSet<String> = nodes.iter().map(|n| n.node.id.clone()).collect();
    let (children, roots): (Vec<_>, Vec<_>) = nodes.into_iter().partition(|n| {
        n.node
            .parent_group_id
            .as_ref()
            .is_some_and(|parent| present.contains(parent))
    });
    roots.into_iter().chain(children).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasNode, NodePayload, NodeType, Position};
    use crate::utils::time_utils::now_utc;

    fn item(id: &str, parent: Option<&str>) -> CanvasNodeWithPayload {
        let now = now_utc();
        CanvasNodeWithPayload {
            node: CanvasNode {
                id: id.to_string(),
                canvas_id: "c1".to_string(),
                organization_id: "org-a".to_string(),
                node_type: NodeType::Text,
                payload_id: format!("p-{}", id),
                position: Position::default(),
                width: None,
                height: None,
                parent_group_id: parent.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
            payload: NodePayload::Text {
                content: id.to_string(),
            },
        }
    }

    #[test]
    fn groups_precede_children() {
        let ordered = order_parents_first(vec![
            item("child-1", Some("group")),
            item("loose", None),
            item("group", None),
            item("orphan", Some("missing")),
            item("child-2", Some("group")),
        ]);
        let ids: Vec<_> = ordered.iter().map(|n| n.node.id.as_str()).collect();
        assert_eq!(ids, ["loose", "group", "orphan", "child-1", "child-2"]);
    }
}
