//! Roadmap tree model.
//!
//! A roadmap is a strict tree of [`Node`]s. Every update is expressed as a
//! structural copy: the subtree rooted at the target id is replaced and all
//! of its ancestors are rebuilt, while the input tree is left untouched.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

mod explore;
mod validate;

pub use explore::explore_subtopics;
pub use validate::{SchemaError, parse_node, validate_node};

/// A learning resource attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

impl Resource {
    /// The two canned resources used by the local generators: a guide link
    /// and a video search link for `topic`.
    pub fn samples(topic: &str) -> Vec<Resource> {
        vec![
            Resource {
                title: format!("{} - Official Guide", topic),
                url: guide_url(topic),
            },
            Resource {
                title: format!("{} - Video Intro", topic),
                url: video_url(topic),
            },
        ]
    }
}

// Both links percent-encode the topic the same way (space as `%20`).
fn guide_url(topic: &str) -> String {
    format!("https://example.com/{}", urlencoding::encode(topic))
}

fn video_url(topic: &str) -> String {
    format!(
        "https://youtube.com/results?search_query={}",
        urlencoding::encode(topic)
    )
}

/// A single roadmap entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
    /// Absent, `null` and `[]` all mean "no children".
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<Node>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Node>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            resources: None,
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Text shown in hover tooltips: the description, or the label.
    pub fn tooltip_text(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.label)
    }
}

/// Find a node by id (pre-order).
pub fn find_node<'a>(node: &'a Node, id: &str) -> Option<&'a Node> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|c| find_node(c, id))
}

/// Replace the node with the given id by `updater(node)`, rebuilding every
/// ancestor. Returns a structural copy; if the id is not present the copy is
/// equal to the input.
pub fn update_node<F>(node: &Node, id: &str, updater: F) -> Node
where
    F: Fn(&Node) -> Node,
{
    fn walk<F: Fn(&Node) -> Node>(node: &Node, id: &str, updater: &F) -> Node {
        if node.id == id {
            return updater(node);
        }
        Node {
            children: node.children.iter().map(|c| walk(c, id, updater)).collect(),
            ..node.clone()
        }
    }
    walk(node, id, &updater)
}

/// Ids of every node below the root, in pre-order.
pub fn descendant_ids(root: &Node) -> Vec<String> {
    fn walk(node: &Node, out: &mut Vec<String>) {
        for c in &node.children {
            out.push(c.id.clone());
            walk(c, out);
        }
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

/// Non-destructive depth view: nodes deeper than `max_depth` lose their
/// children. The root is depth 0.
pub fn filter_depth(root: &Node, max_depth: usize) -> Node {
    fn walk(node: &Node, depth: usize, max_depth: usize) -> Node {
        if depth > max_depth {
            return Node {
                children: Vec::new(),
                ..node.clone()
            };
        }
        Node {
            children: node
                .children
                .iter()
                .map(|c| walk(c, depth + 1, max_depth))
                .collect(),
            ..node.clone()
        }
    }
    walk(root, 0, max_depth)
}

/// Rewrite colliding ids so every id in the tree is unique.
///
/// The first occurrence (pre-order) keeps its id; later ones become
/// `"{id}-{n}"` with the smallest free `n >= 2`.
pub fn ensure_unique_ids(root: &Node) -> Node {
    fn collect(node: &Node, all: &mut HashSet<String>) {
        all.insert(node.id.clone());
        for c in &node.children {
            collect(c, all);
        }
    }

    fn walk(node: &Node, seen: &mut HashSet<String>, taken: &mut HashSet<String>) -> Node {
        let id = if seen.insert(node.id.clone()) {
            node.id.clone()
        } else {
            let mut n = 2;
            let fresh = loop {
                let candidate = format!("{}-{}", node.id, n);
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            taken.insert(fresh.clone());
            seen.insert(fresh.clone());
            fresh
        };
        Node {
            id,
            children: node.children.iter().map(|c| walk(c, seen, taken)).collect(),
            ..node.clone()
        }
    }

    let mut taken = HashSet::new();
    collect(root, &mut taken);
    walk(root, &mut HashSet::new(), &mut taken)
}

#[cfg(test)]
pub(crate) fn sample_tree() -> Node {
    Node::new("root", "MindMap").with_children(vec![
        Node::new("a", "Tooltips").with_children(vec![
            Node::new("a1", "Tip 1"),
            Node::new("a2", "Tip 2"),
        ]),
        Node::new("b", "Expand/Collapse").with_children(vec![
            Node::new("b1", "Child 1"),
            Node::new("b2", "Child 2").with_children(vec![Node::new("b2a", "Leaf")]),
        ]),
        Node::new("c", "Expand/Collapse").with_children(vec![
            Node::new("c1", "Item A"),
            Node::new("c2", "Item B"),
        ]),
    ])
}
