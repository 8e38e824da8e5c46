//! Interactive mind-map session.
//!
//! [`Session`] owns the current roadmap tree and all view state around it.
//! Everything drawn on screen (positions, edges, minimap) is derived from
//! that state on demand; the layout is memoized until the tree, the collapse
//! flags or the level filter change.

use std::cell::OnceCell;

use serde::Serialize;

use crate::layout::{
    CollapseState, Edge, LayoutConfig, NodeBox, PointF, Position, SizeF, edges_with, layout_with,
};
use crate::minimap::Minimap;
use crate::tree::{Node, ensure_unique_ids, explore_subtopics, find_node, update_node};
use crate::view::{ActiveDrag, LevelFilter, PanDrag, PointerCapture, ViewConfig, ViewTransform};

/// Offset of the tooltip from the pointer, in client pixels.
const TOOLTIP_OFFSET: f64 = 12.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tooltip {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub content: String,
}

#[derive(Debug)]
pub struct Session<C: PointerCapture> {
    view_cfg: ViewConfig,
    layout_cfg: LayoutConfig,
    node_box: NodeBox,
    root: Node,
    collapsed: CollapseState,
    all_collapsed: bool,
    level_filter: LevelFilter,
    view: ViewTransform,
    /// Id of the selected node, re-resolved against the current tree.
    selected: Option<String>,
    tooltip: Tooltip,
    show_tooltips: bool,
    drag: Option<ActiveDrag<C>>,
    positions: OnceCell<Vec<Position>>,
}

impl<C: PointerCapture> Session<C> {
    pub fn new(root: Node) -> Self {
        Self::with_config(root, ViewConfig::default(), LayoutConfig::default())
    }

    pub fn with_config(root: Node, view_cfg: ViewConfig, layout_cfg: LayoutConfig) -> Self {
        Self {
            view: ViewTransform::new(&view_cfg),
            view_cfg,
            layout_cfg,
            node_box: NodeBox::default(),
            root: ensure_unique_ids(&root),
            collapsed: CollapseState::default(),
            all_collapsed: false,
            level_filter: LevelFilter::All,
            selected: None,
            tooltip: Tooltip::default(),
            show_tooltips: true,
            drag: None,
            positions: OnceCell::new(),
        }
    }

    fn invalidate(&mut self) {
        self.positions = OnceCell::new();
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Adopt a freshly acquired tree. Collapse state and the view are reset;
    /// the selection survives only if its id exists in the new tree.
    pub fn load_tree(&mut self, root: Node) {
        self.root = ensure_unique_ids(&root);
        self.collapsed.expand_all();
        self.all_collapsed = false;
        self.view.reset(&self.view_cfg);
        self.invalidate();
    }

    /// "Explore deeper" on a node: leaf nodes get generated subtopics; nodes
    /// that already have children are just expanded. The node is selected.
    pub fn explore(&mut self, id: &str, stamp: u64) -> bool {
        let Some(node) = find_node(&self.root, id) else {
            return false;
        };
        if !node.has_children() {
            let subs = explore_subtopics(node, stamp);
            let updated = update_node(&self.root, id, |n| Node {
                children: subs.clone(),
                ..n.clone()
            });
            self.root = ensure_unique_ids(&updated);
        }
        self.collapsed.set(id, false);
        self.selected = Some(id.to_string());
        self.invalidate();
        true
    }

    // ------------------------------------------------------------------
    // Collapse / filter
    // ------------------------------------------------------------------

    pub fn collapsed(&self) -> &CollapseState {
        &self.collapsed
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        let now = self.collapsed.toggle(id);
        self.invalidate();
        now
    }

    pub fn collapse_all(&mut self) {
        self.collapsed.collapse_all(&self.root);
        self.all_collapsed = true;
        self.invalidate();
    }

    pub fn expand_all(&mut self) {
        self.collapsed.expand_all();
        self.all_collapsed = false;
        self.invalidate();
    }

    /// The sidebar's expand/collapse checkbox.
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        if collapsed {
            self.collapse_all();
        } else {
            self.expand_all();
        }
    }

    pub fn all_collapsed(&self) -> bool {
        self.all_collapsed
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.level_filter
    }

    pub fn set_level_filter(&mut self, filter: LevelFilter) {
        if self.level_filter != filter {
            self.level_filter = filter;
            self.invalidate();
        }
    }

    /// The tree as currently shown, after the level filter.
    pub fn visible_tree(&self) -> Node {
        self.level_filter.apply(&self.root)
    }

    // ------------------------------------------------------------------
    // Derived geometry
    // ------------------------------------------------------------------

    pub fn positions(&self) -> &[Position] {
        self.positions
            .get_or_init(|| layout_with(&self.visible_tree(), &self.collapsed, &self.layout_cfg))
    }

    pub fn edges(&self) -> Vec<Edge> {
        edges_with(
            &self.visible_tree(),
            &self.collapsed,
            &self.layout_cfg,
            &self.node_box,
        )
    }

    pub fn node_box(&self) -> &NodeBox {
        &self.node_box
    }

    pub fn minimap(&self) -> Minimap {
        Minimap::for_positions(self.positions())
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view_cfg
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in(&self.view_cfg);
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out(&self.view_cfg);
    }

    /// Start a pan drag. `rendered` is the on-screen size of the surface.
    /// Any previous drag is ended first, releasing its capture.
    pub fn pointer_down(&mut self, pointer: PointF, rendered: SizeF, capture: C) {
        self.drag = None;
        let drag = PanDrag::begin(pointer, self.view.pan, self.view_cfg.viewport, rendered);
        self.drag = Some(ActiveDrag::new(drag, capture));
    }

    /// Returns false when no drag is active.
    pub fn pointer_move(&mut self, pointer: PointF) -> bool {
        match &self.drag {
            Some(active) => {
                self.view.pan = active.drag.pan_at(pointer);
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Recenter the main view on the diagram point under a minimap position
    /// (normalized to `[0, 1]` per axis).
    pub fn minimap_select(&mut self, ratio: PointF) {
        let minimap = self.minimap();
        self.view.pan = minimap.recenter_pan(ratio, self.view_cfg.viewport, self.view.scale);
    }

    // ------------------------------------------------------------------
    // Selection / tooltip
    // ------------------------------------------------------------------

    pub fn select(&mut self, id: &str) -> bool {
        if find_node(&self.root, id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_deref().and_then(|id| find_node(&self.root, id))
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn set_show_tooltips(&mut self, show: bool) {
        self.show_tooltips = show;
        if !show {
            self.tooltip.visible = false;
        }
    }

    pub fn show_tooltip(&mut self, id: &str, client: PointF) {
        if !self.show_tooltips {
            return;
        }
        let Some(node) = find_node(&self.root, id) else {
            return;
        };
        self.tooltip = Tooltip {
            visible: true,
            x: client.x + TOOLTIP_OFFSET,
            y: client.y + TOOLTIP_OFFSET,
            content: node.tooltip_text().to_string(),
        };
    }

    pub fn move_tooltip(&mut self, client: PointF) {
        if !self.show_tooltips {
            return;
        }
        self.tooltip.x = client.x + TOOLTIP_OFFSET;
        self.tooltip.y = client.y + TOOLTIP_OFFSET;
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip.visible = false;
    }
}
