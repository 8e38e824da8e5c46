// Per-node collapse flags. A missing id means expanded.

use std::collections::HashMap;

use serde::Serialize;

use crate::tree::{Node, descendant_ids};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CollapseState {
    flags: HashMap<String, bool>,
}

impl CollapseState {
    pub fn is_collapsed(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Flip the flag for `id`. Returns the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_collapsed(id);
        self.flags.insert(id.to_string(), next);
        next
    }

    pub fn set(&mut self, id: &str, collapsed: bool) {
        self.flags.insert(id.to_string(), collapsed);
    }

    /// Collapse every node below the root.
    pub fn collapse_all(&mut self, root: &Node) {
        self.flags = descendant_ids(root).into_iter().map(|id| (id, true)).collect();
    }

    pub fn expand_all(&mut self) {
        self.flags.clear();
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.values().any(|&v| v)
    }
}
