//! Diagram export: SVG markup, pretty JSON of the tree, and raster sizing.
//!
//! Export only reads the session; a failed export never changes the tree or
//! the view.

use serde::Serialize;
use thiserror::Error;

use crate::layout::SizeF;
use crate::output::SceneOutput;
use crate::session::Session;
use crate::tree::Node;
use crate::view::PointerCapture;

mod svg;

pub use svg::{emit_svg, escape_xml};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no drawing surface available")]
    MissingSurface,
}

/// The current diagram as SVG, at the session's pan and zoom.
pub fn export_svg<C: PointerCapture>(session: &Session<C>) -> String {
    let viewport = session.view_config().viewport;
    emit_svg(&SceneOutput::from_session(session), viewport.w, viewport.h)
}

/// The tree, pretty-printed.
pub fn export_json(root: &Node) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(root)?)
}

/// Pixel size of the canvas a raster export draws onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RasterTarget {
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio the canvas transform is scaled by.
    pub ratio: f64,
}

impl RasterTarget {
    /// Canvas for `viewport` at `device_pixel_ratio`. Non-finite or
    /// non-positive ratios are treated as 1.
    pub fn for_viewport(viewport: SizeF, device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: (viewport.w * ratio).round() as u32,
            height: (viewport.h * ratio).round() as u32,
            ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::sample_tree;
    use crate::view::NoCapture;

    #[test]
    fn test_export_json_is_pretty_and_round_trips() {
        let tree = sample_tree();
        let json = export_json(&tree).unwrap();
        assert!(json.contains("\n  \"id\": \"root\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_export_does_not_touch_session() {
        let mut session: Session<NoCapture> = Session::new(sample_tree());
        session.zoom_in();
        let before = (*session.view(), session.root().clone());
        let svg = export_svg(&session);
        assert!(svg.contains("scale(1.1)"));
        assert_eq!((*session.view(), session.root().clone()), before);
    }

    #[test]
    fn test_raster_target_scales_by_ratio() {
        let target = RasterTarget::for_viewport(SizeF::new(1000.0, 700.0), 2.0);
        assert_eq!((target.width, target.height), (2000, 1400));
        assert_eq!(target.ratio, 2.0);
    }

    #[test]
    fn test_missing_surface_message() {
        assert_eq!(
            ExportError::MissingSurface.to_string(),
            "no drawing surface available"
        );
    }

    #[test]
    fn test_raster_target_bad_ratio_is_one() {
        for ratio in [0.0, -1.0, f64::NAN] {
            let target = RasterTarget::for_viewport(SizeF::new(1000.0, 700.0), ratio);
            assert_eq!((target.width, target.height), (1000, 700));
        }
    }
}
