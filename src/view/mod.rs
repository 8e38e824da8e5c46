//! Pan/zoom view state.
//!
//! The view maps diagram coordinates into the logical viewport:
//! `screen = pan + diagram * scale`. The logical viewport has a fixed size
//! and is scaled responsively by the host, which is why drag deltas are
//! rescaled (see [`drag`]).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::layout::{PointF, SizeF};
use crate::tree::{Node, filter_depth};

pub mod drag;

pub use drag::{ActiveDrag, CaptureScope, NoCapture, PanDrag, PointerCapture};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Logical viewport size (the SVG viewBox).
    pub viewport: SizeF,
    pub default_pan: PointF,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport: SizeF::new(1000.0, 700.0),
            default_pan: PointF::new(160.0, 350.0),
            min_scale: 0.5,
            max_scale: 2.2,
            zoom_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub pan: PointF,
}

impl ViewTransform {
    pub fn new(cfg: &ViewConfig) -> Self {
        Self {
            scale: 1.0,
            pan: cfg.default_pan,
        }
    }

    pub fn reset(&mut self, cfg: &ViewConfig) {
        *self = Self::new(cfg);
    }

    pub fn diagram_to_screen(&self, p: PointF) -> PointF {
        PointF::new(self.pan.x + p.x * self.scale, self.pan.y + p.y * self.scale)
    }

    pub fn screen_to_diagram(&self, p: PointF) -> PointF {
        PointF::new((p.x - self.pan.x) / self.scale, (p.y - self.pan.y) / self.scale)
    }

    pub fn zoom_in(&mut self, cfg: &ViewConfig) {
        self.scale = round2((self.scale + cfg.zoom_step).min(cfg.max_scale));
    }

    pub fn zoom_out(&mut self, cfg: &ViewConfig) {
        self.scale = round2((self.scale - cfg.zoom_step).max(cfg.min_scale));
    }

    /// Zoom level as a whole percentage, e.g. `110`.
    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    /// SVG `transform` attribute value for the diagram group.
    pub fn svg_transform(&self) -> String {
        format!("translate({},{}) scale({})", self.pan.x, self.pan.y, self.scale)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Depth filter applied to the tree before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    /// Show nodes down to this depth (root is 0); deeper nodes are hidden.
    Depth(usize),
}

impl LevelFilter {
    /// Non-destructive filtered view of `root`.
    pub fn apply(&self, root: &Node) -> Node {
        match self {
            LevelFilter::All => root.clone(),
            LevelFilter::Depth(max) => filter_depth(root, *max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level filter '{0}'")]
pub struct LevelFilterError(pub String);

impl FromStr for LevelFilter {
    type Err = LevelFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::All);
        }
        s.parse::<usize>()
            .map(LevelFilter::Depth)
            .map_err(|_| LevelFilterError(s.to_string()))
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => write!(f, "all"),
            LevelFilter::Depth(n) => write!(f, "{}", n),
        }
    }
}
