//! Minimap coordinate mapping.
//!
//! The minimap shows the whole laid-out diagram inside a small fixed box.
//! [`Bounds`] is the padded diagram-space box it covers; [`Minimap`] maps
//! points between that box and minimap pixels, and turns a minimap click
//! back into a pan that centers the main view on the clicked point.

use serde::Serialize;

use crate::layout::{PointF, Position, RectF, SizeF};
use crate::view::ViewTransform;

/// Padding added on each side of the node bounding box.
pub const BOUNDS_PADDING: f64 = 120.0;

/// Axis-aligned diagram-space box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    /// Box used when there is nothing laid out.
    fn default() -> Self {
        Self {
            min_x: -200.0,
            max_x: 200.0,
            min_y: -200.0,
            max_y: 200.0,
        }
    }
}

impl Bounds {
    /// Bounding box of `positions` padded by [`BOUNDS_PADDING`].
    pub fn from_positions(positions: &[Position]) -> Self {
        if positions.is_empty() {
            return Self::default();
        }
        let mut b = Bounds {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in positions {
            b.min_x = b.min_x.min(p.x);
            b.max_x = b.max_x.max(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_y = b.max_y.max(p.y);
        }
        Bounds {
            min_x: b.min_x - BOUNDS_PADDING,
            max_x: b.max_x + BOUNDS_PADDING,
            min_y: b.min_y - BOUNDS_PADDING,
            max_y: b.max_y + BOUNDS_PADDING,
        }
    }

    /// Horizontal span; a zero span is treated as 1.
    pub fn span_x(&self) -> f64 {
        nonzero(self.max_x - self.min_x)
    }

    /// Vertical span; a zero span is treated as 1.
    pub fn span_y(&self) -> f64 {
        nonzero(self.max_y - self.min_y)
    }

    pub fn contains(&self, p: PointF) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

fn nonzero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Minimap {
    pub bounds: Bounds,
    pub size: SizeF,
}

impl Minimap {
    pub const DEFAULT_SIZE: SizeF = SizeF::new(180.0, 120.0);

    pub fn new(bounds: Bounds, size: SizeF) -> Self {
        Self { bounds, size }
    }

    pub fn for_positions(positions: &[Position]) -> Self {
        Self::new(Bounds::from_positions(positions), Self::DEFAULT_SIZE)
    }

    /// Diagram point to minimap pixels.
    pub fn diagram_to_mini(&self, p: PointF) -> PointF {
        PointF::new(
            (p.x - self.bounds.min_x) / self.bounds.span_x() * self.size.w,
            (p.y - self.bounds.min_y) / self.bounds.span_y() * self.size.h,
        )
    }

    /// Normalized minimap position (`[0, 1]` per axis) to a diagram point.
    pub fn mini_to_diagram(&self, ratio: PointF) -> PointF {
        PointF::new(
            self.bounds.min_x + ratio.x * self.bounds.span_x(),
            self.bounds.min_y + ratio.y * self.bounds.span_y(),
        )
    }

    /// Pan that centers the main viewport on the diagram point under `ratio`
    /// at the current `scale`.
    pub fn recenter_pan(&self, ratio: PointF, viewport: SizeF, scale: f64) -> PointF {
        recenter_pan(self.mini_to_diagram(ratio), viewport, scale)
    }

    /// The main viewport's visible area, projected into minimap pixels.
    pub fn viewport_rect(&self, view: &ViewTransform, viewport: SizeF) -> RectF {
        let top_left = self.diagram_to_mini(view.screen_to_diagram(PointF::new(0.0, 0.0)));
        let bottom_right =
            self.diagram_to_mini(view.screen_to_diagram(PointF::new(viewport.w, viewport.h)));
        RectF {
            x: top_left.x,
            y: top_left.y,
            w: bottom_right.x - top_left.x,
            h: bottom_right.y - top_left.y,
        }
    }
}

/// `pan = viewport_center - point * scale`.
pub fn recenter_pan(point: PointF, viewport: SizeF, scale: f64) -> PointF {
    PointF::new(
        viewport.w / 2.0 - point.x * scale,
        viewport.h / 2.0 - point.y * scale,
    )
}

/// Normalize a pointer inside the minimap element to `[0, 1]` per axis.
/// `rect` is the element's client rectangle.
pub fn ratio_from_pointer(client: PointF, rect: RectF) -> PointF {
    fn axis(v: f64, origin: f64, len: f64) -> f64 {
        if len <= 0.0 {
            return 0.0;
        }
        (v - origin).clamp(0.0, len) / len
    }
    PointF::new(axis(client.x, rect.x, rect.w), axis(client.y, rect.y, rect.h))
}
