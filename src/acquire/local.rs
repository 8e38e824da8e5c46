// Deterministic local roadmap generator.
//
// Keyword match on the topic picks a canned roadmap; anything else gets one
// branch per leading word. Used whenever remote generation is unavailable.

use crate::tree::{Node, Resource};

fn leaf(id: &str, label: &str, description: &str) -> Node {
    Node::new(id, label)
        .with_description(description)
        .with_resources(Resource::samples(label))
}

fn branch(id: &str, label: &str, description: &str, children: Vec<Node>) -> Node {
    leaf(id, label, description).with_children(children)
}

/// Build a roadmap for `topic` without any network access. `stamp` makes
/// the root id unique per generation.
pub fn generate_local(topic: &str, level: &str, stamp: u64) -> Node {
    tracing::debug!(topic, level, "generating local roadmap");
    let t = topic.to_lowercase();
    let root = Node::new(format!("root-{}", stamp), topic);

    if t.contains("web") {
        return root
            .with_description("A learning roadmap for web development.")
            .with_children(vec![
                branch(
                    "frontend",
                    "Frontend",
                    "UI, HTML/CSS, JS frameworks",
                    vec![
                        leaf("html", "HTML", "Structure web pages"),
                        leaf("css", "CSS", "Styling and layout"),
                        leaf("react", "React", "Component-based UI"),
                    ],
                ),
                branch(
                    "backend",
                    "Backend",
                    "Servers, APIs, auth",
                    vec![
                        leaf("node", "Node.js", "JavaScript runtime"),
                        leaf("apis", "APIs", "REST / GraphQL"),
                    ],
                ),
                branch(
                    "databases",
                    "Databases",
                    "Data storage",
                    vec![
                        leaf("sql", "SQL", "Relational DBs"),
                        leaf("nosql", "NoSQL", "Document DBs"),
                    ],
                ),
            ]);
    }

    if t.contains("garden") {
        return root
            .with_description("A roadmap for gardening topics.")
            .with_children(vec![
                Node::new("soil", "Soil Basics")
                    .with_description("Soil types and nutrition")
                    .with_resources(Resource::samples("Soil")),
                leaf("plants", "Plant Types", "Annuals, perennials, shrubs"),
                leaf("watering", "Watering", "Water schedules and techniques"),
            ]);
    }

    let children = topic
        .split_whitespace()
        .take(3)
        .enumerate()
        .map(|(i, w)| {
            Node::new(format!("{}-{}", w, i), capitalize(w))
                .with_description(format!("About {}", w))
                .with_resources(Resource::samples(w))
        })
        .collect();

    root.with_description(format!("Overview for {}", topic))
        .with_children(children)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Milliseconds since the Unix epoch, used as a generation stamp.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}
