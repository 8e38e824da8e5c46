//! Emit the current diagram as a standalone SVG document.
//!
//! Formatting rules:
//! - 2 spaces for indentation
//! - Edges are drawn before nodes so boxes sit on top of connectors
//! - Text content is XML-escaped

use crate::layout::NodeBox;
use crate::output::SceneOutput;

const INDENT: &str = "  ";
const EDGE_STROKE: &str = "#e0e6ea";
const NODE_FILL: &str = "#ffffff";
const NODE_STROKE: &str = "#2f3a49";

/// Emit the scene as SVG markup sized to the logical viewport.
pub fn emit_svg(scene: &SceneOutput, viewport_w: f64, viewport_h: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = viewport_w,
        h = viewport_h
    ));
    out.push_str(&format!(
        "{}<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\" />\n",
        INDENT
    ));
    out.push_str(&format!(
        "{}<g transform=\"{}\">\n",
        INDENT,
        scene.view.svg_transform()
    ));

    for edge in &scene.edges {
        out.push_str(&format!(
            "{}<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" />\n",
            INDENT.repeat(2),
            edge.path,
            EDGE_STROKE
        ));
    }

    for node in &scene.nodes {
        emit_node(
            node.x,
            node.y,
            &node.label,
            handle(node.has_children, node.collapsed),
            &scene.node_box,
            &mut out,
        );
    }

    out.push_str(&format!("{}</g>\n", INDENT));
    out.push_str("</svg>\n");
    out
}

fn handle(has_children: bool, collapsed: bool) -> Option<char> {
    match (has_children, collapsed) {
        (false, _) => None,
        (true, true) => Some('+'),
        (true, false) => Some('-'),
    }
}

/// Emit one node group: box, label and optional collapse handle.
fn emit_node(x: f64, y: f64, label: &str, handle: Option<char>, b: &NodeBox, out: &mut String) {
    let ind = INDENT.repeat(2);
    let inner = INDENT.repeat(3);
    out.push_str(&format!("{}<g transform=\"translate({},{})\">\n", ind, x, y));
    out.push_str(&format!(
        "{}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" />\n",
        inner,
        -b.w / 2.0,
        -b.h / 2.0,
        b.w,
        b.h,
        NODE_FILL,
        NODE_STROKE,
        r = b.radius
    ));
    out.push_str(&format!(
        "{}<text x=\"0\" y=\"6\" text-anchor=\"middle\">{}</text>\n",
        inner,
        escape_xml(label)
    ));
    if let Some(sign) = handle {
        out.push_str(&format!(
            "{}<text x=\"{}\" y=\"6\" text-anchor=\"middle\">{}</text>\n",
            inner,
            b.w / 2.0,
            sign
        ));
    }
    out.push_str(&format!("{}</g>\n", ind));
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
