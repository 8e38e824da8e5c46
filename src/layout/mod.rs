// Horizontal tree layout for roadmap nodes.
//
// Goals:
// - Deterministic: a pure function of (tree, collapse state)
// - Pre-order output: a parent always precedes its children
// - Left-to-right: each depth level sits a fixed distance to the right
// - Centered sibling fan: children are spread vertically around the parent
//
// Submodules:
// - collapse: per-node collapse flags
// - edges: connector paths between visible parent/child pairs
//
// Output:
// - Vec<Position> in diagram coordinates, root at (0, 0).

use serde::Serialize;

use crate::tree::Node;

mod collapse;
mod edges;

pub use collapse::CollapseState;
pub use edges::{Edge, NodeBox, edges, edges_with};

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SizeF {
    pub w: f64,
    pub h: f64,
}

impl SizeF {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A laid-out node in diagram coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn point(&self) -> PointF {
        PointF::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal distance between a parent and its children.
    pub child_x_offset: f64,
    /// Vertical distance between adjacent siblings.
    pub gap_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            child_x_offset: 220.0,
            gap_y: 90.0,
        }
    }
}

/// Lay out `root` with the default spacing.
pub fn layout(root: &Node, collapsed: &CollapseState) -> Vec<Position> {
    layout_with(root, collapsed, &LayoutConfig::default())
}

pub fn layout_with(root: &Node, collapsed: &CollapseState, cfg: &LayoutConfig) -> Vec<Position> {
    fn walk(
        node: &Node,
        at: PointF,
        collapsed: &CollapseState,
        cfg: &LayoutConfig,
        out: &mut Vec<Position>,
    ) {
        out.push(Position {
            id: node.id.clone(),
            label: node.label.clone(),
            x: at.x,
            y: at.y,
        });
        if collapsed.is_collapsed(&node.id) {
            return;
        }
        let n = node.children.len();
        for (idx, child) in node.children.iter().enumerate() {
            walk(child, child_anchor(at, idx, n, cfg), collapsed, cfg, out);
        }
    }

    let mut out = Vec::new();
    walk(root, PointF::new(0.0, 0.0), collapsed, cfg, &mut out);
    out
}

/// Position of child `idx` of `n` relative to a parent at `parent`.
pub(crate) fn child_anchor(parent: PointF, idx: usize, n: usize, cfg: &LayoutConfig) -> PointF {
    let offset = idx as f64 - (n as f64 - 1.0) / 2.0;
    PointF::new(parent.x + cfg.child_x_offset, parent.y + offset * cfg.gap_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{descendant_ids, find_node, sample_tree};

    #[test]
    fn test_root_at_origin_and_preorder() {
        let positions = layout(&sample_tree(), &CollapseState::default());
        assert_eq!(positions[0].id, "root");
        assert_eq!(positions[0].point(), PointF::new(0.0, 0.0));

        let ids: Vec<&str> = positions.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["root", "a", "a1", "a2", "b", "b1", "b2", "b2a", "c", "c1", "c2"]
        );
    }

    #[test]
    fn test_layout_is_deterministic() {
        let tree = sample_tree();
        let mut collapsed = CollapseState::default();
        collapsed.toggle("b");
        assert_eq!(layout(&tree, &collapsed), layout(&tree, &collapsed));
    }

    #[test]
    fn test_three_children_fan() {
        let positions = layout(&sample_tree(), &CollapseState::default());
        let get = |id: &str| positions.iter().find(|p| p.id == id).unwrap().point();

        assert_eq!(get("a"), PointF::new(220.0, -90.0));
        assert_eq!(get("b"), PointF::new(220.0, 0.0));
        assert_eq!(get("c"), PointF::new(220.0, 90.0));
        // b's two children straddle b
        assert_eq!(get("b1"), PointF::new(440.0, -45.0));
        assert_eq!(get("b2"), PointF::new(440.0, 45.0));
        // single child sits level with its parent
        assert_eq!(get("b2a"), PointF::new(660.0, 45.0));
    }

    #[test]
    fn test_sibling_offsets_are_symmetric() {
        let cfg = LayoutConfig::default();
        let parent = PointF::new(0.0, 0.0);
        for k in 1..=5 {
            let offsets: Vec<f64> = (0..k).map(|i| child_anchor(parent, i, k, &cfg).y).collect();
            let sum: f64 = offsets.iter().sum();
            assert!(sum.abs() < 1e-9, "k={} offsets={:?}", k, offsets);
            for i in 0..k {
                assert!((offsets[i] + offsets[k - 1 - i]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_collapsed_descendants_excluded() {
        let tree = sample_tree();
        let mut collapsed = CollapseState::default();
        collapsed.toggle("b");
        let positions = layout(&tree, &collapsed);

        let b = find_node(&tree, "b").unwrap();
        for id in descendant_ids(b) {
            assert!(positions.iter().all(|p| p.id != id), "{} should be hidden", id);
        }
        // b itself is still laid out
        assert!(positions.iter().any(|p| p.id == "b"));
        assert_eq!(positions.len(), 8);
    }

    #[test]
    fn test_collapsed_root_yields_single_position() {
        let mut collapsed = CollapseState::default();
        collapsed.toggle("root");
        assert_eq!(layout(&sample_tree(), &collapsed).len(), 1);
    }

    #[test]
    fn test_custom_spacing() {
        let cfg = LayoutConfig {
            child_x_offset: 100.0,
            gap_y: 10.0,
        };
        let positions = layout_with(&sample_tree(), &CollapseState::default(), &cfg);
        assert_eq!(positions[1].point(), PointF::new(100.0, -10.0));
    }
}
