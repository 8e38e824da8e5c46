// "Explore deeper": canned subtopics for a leaf node.
//
// Ids are derived from the parent id so that exploring two siblings that
// share a label never produces colliding ids.

use super::{Node, Resource};

/// Two generated subtopics for `node`. `stamp` makes ids unique across
/// repeated explorations of the same node.
pub fn explore_subtopics(node: &Node, stamp: u64) -> Vec<Node> {
    let base = node.label.split_whitespace().next().unwrap_or(&node.label);
    let description = format!("Deeper topic under {}", node.label);

    [("x", 1), ("y", 2)]
        .into_iter()
        .map(|(tag, n)| {
            Node::new(
                format!("{}-{}-{}", node.id, tag, stamp + n - 1),
                format!("{} - Deep {}", base, n),
            )
            .with_description(description.clone())
            .with_resources(Resource::samples(&format!("{} deep{}", base, n)))
        })
        .collect()
}
