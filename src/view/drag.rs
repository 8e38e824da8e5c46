//! Drag-to-pan.
//!
//! A drag captures the pointer and pan at pointer-down. Moves are measured
//! against that start state, so no error accumulates over many events.
//!
//! Input capture (global move/up listeners in a browser) is held by a
//! [`CaptureScope`] for the lifetime of the drag. Dropping the scope releases
//! the capture, which happens on pointer-up and also while unwinding out of a
//! panicking move handler.

use crate::layout::{PointF, SizeF};

/// An input-capture resource acquired for the duration of a drag.
pub trait PointerCapture {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// Capture that does nothing; used when the host delivers all pointer events
/// to the view anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

#[derive(Debug)]
pub struct CaptureScope<C: PointerCapture> {
    capture: C,
}

impl<C: PointerCapture> CaptureScope<C> {
    pub fn new(mut capture: C) -> Self {
        capture.acquire();
        Self { capture }
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }
}

impl<C: PointerCapture> Drop for CaptureScope<C> {
    fn drop(&mut self) {
        self.capture.release();
    }
}

/// Start state of a pan drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanDrag {
    start_pointer: PointF,
    start_pan: PointF,
    /// Logical viewport units per rendered pixel, per axis.
    ratio: PointF,
}

impl PanDrag {
    /// `viewport` is the logical size; `rendered` is the on-screen pixel size
    /// of the drawing surface. A zero rendered size falls back to the
    /// logical size.
    pub fn begin(pointer: PointF, start_pan: PointF, viewport: SizeF, rendered: SizeF) -> Self {
        let rw = if rendered.w > 0.0 { rendered.w } else { viewport.w };
        let rh = if rendered.h > 0.0 { rendered.h } else { viewport.h };
        Self {
            start_pointer: pointer,
            start_pan,
            ratio: PointF::new(viewport.w / rw, viewport.h / rh),
        }
    }

    /// Pan for the pointer at `pointer`.
    pub fn pan_at(&self, pointer: PointF) -> PointF {
        let dx = (pointer.x - self.start_pointer.x) * self.ratio.x;
        let dy = (pointer.y - self.start_pointer.y) * self.ratio.y;
        PointF::new(self.start_pan.x + dx, self.start_pan.y + dy)
    }
}

/// An active drag together with its capture scope.
#[derive(Debug)]
pub struct ActiveDrag<C: PointerCapture> {
    pub drag: PanDrag,
    _scope: CaptureScope<C>,
}

impl<C: PointerCapture> ActiveDrag<C> {
    pub fn new(drag: PanDrag, capture: C) -> Self {
        Self {
            drag,
            _scope: CaptureScope::new(capture),
        }
    }
}
