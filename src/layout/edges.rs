// Connector paths between visible parent/child pairs.
//
// Each connector is a cubic Bezier leaving the right side of the parent box
// and entering the left side of the child box.

use serde::Serialize;

use super::{CollapseState, LayoutConfig, PointF, child_anchor};
use crate::tree::Node;

/// Rendered size of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeBox {
    pub w: f64,
    pub h: f64,
    pub radius: f64,
}

impl Default for NodeBox {
    fn default() -> Self {
        Self {
            w: 120.0,
            h: 34.0,
            radius: 18.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// SVG path data for the connector.
    pub path: String,
}

pub fn edges(root: &Node, collapsed: &CollapseState) -> Vec<Edge> {
    edges_with(root, collapsed, &LayoutConfig::default(), &NodeBox::default())
}

pub fn edges_with(
    root: &Node,
    collapsed: &CollapseState,
    cfg: &LayoutConfig,
    node_box: &NodeBox,
) -> Vec<Edge> {
    fn walk(
        node: &Node,
        at: PointF,
        collapsed: &CollapseState,
        cfg: &LayoutConfig,
        node_box: &NodeBox,
        out: &mut Vec<Edge>,
    ) {
        if collapsed.is_collapsed(&node.id) {
            return;
        }
        let n = node.children.len();
        for (idx, child) in node.children.iter().enumerate() {
            let c = child_anchor(at, idx, n, cfg);
            out.push(Edge {
                from: node.id.clone(),
                to: child.id.clone(),
                path: connector_path(at, c, node_box),
            });
            walk(child, c, collapsed, cfg, node_box, out);
        }
    }

    let mut out = Vec::new();
    walk(root, PointF::new(0.0, 0.0), collapsed, cfg, node_box, &mut out);
    out
}

fn connector_path(from: PointF, to: PointF, node_box: &NodeBox) -> String {
    let half = node_box.w / 2.0;
    format!(
        "M {} {} C {} {} {} {} {} {}",
        from.x + half,
        from.y,
        from.x + half + 40.0,
        from.y,
        to.x - 60.0,
        to.y,
        to.x - half,
        to.y
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::sample_tree;

    #[test]
    fn test_one_edge_per_visible_child() {
        let edges = edges(&sample_tree(), &CollapseState::default());
        assert_eq!(edges.len(), 10);
        assert_eq!(edges[0].from, "root");
        assert_eq!(edges[0].to, "a");
    }

    #[test]
    fn test_connector_geometry() {
        let edges = edges(&sample_tree(), &CollapseState::default());
        let root_to_b = edges.iter().find(|e| e.to == "b").unwrap();
        assert_eq!(root_to_b.path, "M 60 0 C 100 0 160 0 160 0");
    }

    #[test]
    fn test_collapsed_node_has_no_outgoing_edges() {
        let mut collapsed = CollapseState::default();
        collapsed.toggle("a");
        let edges = edges(&sample_tree(), &collapsed);
        assert!(edges.iter().all(|e| e.from != "a"));
        assert!(edges.iter().any(|e| e.to == "a"));
    }
}
