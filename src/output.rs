//! Output types for frontend consumption.
//!
//! These structs are serialized to JSON and sent to the frontend, which
//! draws exactly what they describe.

use std::collections::HashMap;

use serde::Serialize;

use crate::layout::{Edge, NodeBox, PointF, RectF, SizeF};
use crate::session::{Session, Tooltip};
use crate::tree::Node;
use crate::view::{PointerCapture, ViewTransform};

/// A laid-out node ready for the frontend to display
#[derive(Debug, Clone, Serialize)]
pub struct NodeOutput {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Whether to draw the +/- collapse handle
    pub has_children: bool,
    pub collapsed: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinimapOutput {
    pub size: SizeF,
    /// One dot per laid-out node, in minimap pixels
    pub dots: Vec<PointF>,
    /// Main viewport outline, in minimap pixels
    pub viewport: RectF,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutput {
    pub nodes: Vec<NodeOutput>,
    pub edges: Vec<Edge>,
    pub node_box: NodeBox,
    pub view: ViewTransform,
    pub zoom_percent: i64,
    pub minimap: MinimapOutput,
    pub tooltip: Tooltip,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Node>,
}

/// Error information for the frontend
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl SceneOutput {
    pub fn from_session<C: PointerCapture>(session: &Session<C>) -> Self {
        let visible = session.visible_tree();
        let mut by_id: HashMap<&str, &Node> = HashMap::new();
        index(&visible, &mut by_id);

        let selected = session.selected_node();
        let positions = session.positions();
        let nodes = positions
            .iter()
            .map(|p| NodeOutput {
                id: p.id.clone(),
                label: p.label.clone(),
                x: p.x,
                y: p.y,
                has_children: by_id.get(p.id.as_str()).is_some_and(|n| n.has_children()),
                collapsed: session.collapsed().is_collapsed(&p.id),
                selected: selected.is_some_and(|s| s.id == p.id),
            })
            .collect();

        let minimap = session.minimap();
        let minimap = MinimapOutput {
            size: minimap.size,
            dots: positions.iter().map(|p| minimap.diagram_to_mini(p.point())).collect(),
            viewport: minimap.viewport_rect(session.view(), session.view_config().viewport),
        };

        SceneOutput {
            nodes,
            edges: session.edges(),
            node_box: *session.node_box(),
            view: *session.view(),
            zoom_percent: session.view().zoom_percent(),
            minimap,
            tooltip: session.tooltip().clone(),
            selected: selected.cloned(),
        }
    }
}

fn index<'a>(node: &'a Node, out: &mut HashMap<&'a str, &'a Node>) {
    out.insert(node.id.as_str(), node);
    for c in &node.children {
        index(c, out);
    }
}
