//! WASM bindings for the mindmap-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Frame data crosses the boundary as JSON strings.

use js_sys::Function;
use serde::Serialize;
use serde_json::to_string;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::acquire::{Acquirer, HttpRemote, generate_local, now_millis};
use crate::export::{ExportError, RasterTarget, export_json, export_svg};
use crate::layout::{PointF, RectF, SizeF};
use crate::minimap::ratio_from_pointer;
use crate::output::{ErrorInfo, SceneOutput};
use crate::session::Session;
use crate::tree::{Node, parse_node};
use crate::view::{LevelFilter, PointerCapture};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

#[derive(Serialize)]
struct ErrorOutput {
    error: ErrorInfo,
}

fn error_json(message: impl Into<String>) -> String {
    let output = ErrorOutput {
        error: ErrorInfo {
            message: message.into(),
        },
    };
    to_string(&output).unwrap_or_else(|_| "{\"error\":{\"message\":\"unknown\"}}".to_string())
}

fn parse_tree(json: &str) -> Result<Node, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("invalid JSON: {}", e))?;
    parse_node(value).map_err(|e| e.to_string())
}

/// Pointer capture backed by JS callbacks, typically adding and removing
/// window-level move/up listeners.
#[derive(Debug, Default)]
struct JsCapture {
    on_acquire: Option<Function>,
    on_release: Option<Function>,
}

fn call_hook(hook: &Option<Function>, what: &str) {
    if let Some(f) = hook {
        if let Err(e) = f.call0(&JsValue::NULL) {
            console_error(&format!("pointer {} callback failed: {:?}", what, e));
        }
    }
}

impl PointerCapture for JsCapture {
    fn acquire(&mut self) {
        call_hook(&self.on_acquire, "acquire");
    }

    fn release(&mut self) {
        call_hook(&self.on_release, "release");
    }
}

/// One mind-map view: tree, collapse flags, pan/zoom, selection, tooltip.
#[wasm_bindgen]
pub struct MindMapView {
    session: Session<JsCapture>,
}

#[wasm_bindgen]
impl MindMapView {
    #[wasm_bindgen(constructor)]
    pub fn new(tree_json: &str) -> Result<MindMapView, JsValue> {
        let root = parse_tree(tree_json).map_err(|e| {
            console_error(&format!("Error loading tree: {}", e));
            JsValue::from_str(&e)
        })?;
        Ok(Self {
            session: Session::new(root),
        })
    }

    /// Replace the tree. Returns the new scene, or an error object with the
    /// current tree left untouched.
    #[wasm_bindgen(js_name = loadTree)]
    pub fn load_tree(&mut self, tree_json: &str) -> String {
        match parse_tree(tree_json) {
            Ok(root) => {
                self.session.load_tree(root);
                self.scene()
            }
            Err(e) => {
                console_error(&format!("Error loading tree: {}", e));
                error_json(e)
            }
        }
    }

    /// Everything needed to draw the current frame.
    pub fn scene(&self) -> String {
        to_string(&SceneOutput::from_session(&self.session))
            .unwrap_or_else(|e| error_json(e.to_string()))
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.session.toggle(id)
    }

    #[wasm_bindgen(js_name = setAllCollapsed)]
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        self.session.set_all_collapsed(collapsed);
    }

    #[wasm_bindgen(js_name = allCollapsed)]
    pub fn all_collapsed(&self) -> bool {
        self.session.all_collapsed()
    }

    /// `"all"` or a depth. Unknown values are rejected and leave the filter
    /// unchanged.
    #[wasm_bindgen(js_name = setLevelFilter)]
    pub fn set_level_filter(&mut self, filter: &str) -> bool {
        match filter.parse::<LevelFilter>() {
            Ok(f) => {
                self.session.set_level_filter(f);
                true
            }
            Err(e) => {
                console_error(&e.to_string());
                false
            }
        }
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
    }

    /// Begin a pan drag. `rendered_w`/`rendered_h` are the surface's size on
    /// screen; the callbacks install and remove global listeners.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        rendered_w: f64,
        rendered_h: f64,
        on_acquire: Option<Function>,
        on_release: Option<Function>,
    ) {
        let capture = JsCapture {
            on_acquire,
            on_release,
        };
        self.session.pointer_down(
            PointF::new(x, y),
            SizeF::new(rendered_w, rendered_h),
            capture,
        );
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_move(PointF::new(x, y))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// Recenter on the point under a click inside the minimap element, given
    /// the element's client rectangle.
    #[wasm_bindgen(js_name = minimapSelect)]
    pub fn minimap_select(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) {
        let rect = RectF {
            x: left,
            y: top,
            w: width,
            h: height,
        };
        let ratio = ratio_from_pointer(PointF::new(client_x, client_y), rect);
        self.session.minimap_select(ratio);
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.session.select(id)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// "Explore deeper" on a node.
    pub fn explore(&mut self, id: &str) -> bool {
        self.session.explore(id, now_millis())
    }

    #[wasm_bindgen(js_name = setShowTooltips)]
    pub fn set_show_tooltips(&mut self, show: bool) {
        self.session.set_show_tooltips(show);
    }

    #[wasm_bindgen(js_name = showTooltip)]
    pub fn show_tooltip(&mut self, id: &str, client_x: f64, client_y: f64) {
        self.session.show_tooltip(id, PointF::new(client_x, client_y));
    }

    #[wasm_bindgen(js_name = moveTooltip)]
    pub fn move_tooltip(&mut self, client_x: f64, client_y: f64) {
        self.session.move_tooltip(PointF::new(client_x, client_y));
    }

    #[wasm_bindgen(js_name = hideTooltip)]
    pub fn hide_tooltip(&mut self) {
        self.session.hide_tooltip();
    }

    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&self) -> String {
        export_svg(&self.session)
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        export_json(self.session.root()).map_err(|e| {
            console_error(&format!("Error exporting JSON: {}", e));
            JsValue::from_str(&e.to_string())
        })
    }

    /// Size `canvas` for a PNG export at the window's device pixel ratio and
    /// return its white-filled, pre-scaled 2D context. The caller draws the
    /// exported SVG image onto it.
    #[wasm_bindgen(js_name = prepareRasterCanvas)]
    pub fn prepare_raster_canvas(
        &self,
        canvas: &HtmlCanvasElement,
    ) -> Result<CanvasRenderingContext2d, JsValue> {
        let ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let viewport = self.session.view_config().viewport;
        let target = RasterTarget::for_viewport(viewport, ratio);

        canvas.set_width(target.width);
        canvas.set_height(target.height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| {
                let e = ExportError::MissingSurface;
                console_error(&format!("Error exporting PNG: {}", e));
                JsValue::from_str(&e.to_string())
            })?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.scale(target.ratio, target.ratio)?;
        ctx.set_fill_style_str("#fff");
        ctx.fill_rect(0.0, 0.0, viewport.w, viewport.h);
        Ok(ctx)
    }
}

/// Local roadmap for `topic`, as `{root, source}` JSON.
#[wasm_bindgen(js_name = generateLocal)]
pub fn generate_local_json(topic: &str, level: &str) -> String {
    let root = generate_local(topic, level, now_millis());
    to_string(&serde_json::json!({ "root": root, "source": "local" }))
        .unwrap_or_else(|e| error_json(e.to_string()))
}

/// Ask `endpoint` for a roadmap, falling back to the local generator.
/// Always resolves to `{root, source}` JSON.
#[wasm_bindgen(js_name = generateRoadmap)]
pub async fn generate_roadmap(endpoint: String, topic: String, level: String) -> String {
    let acquirer = Acquirer::new(HttpRemote::new(endpoint));
    let acquired = acquirer.acquire(&topic, &level).await;
    console_log(&format!("roadmap for '{}' from {:?}", topic, acquired.source));
    to_string(&acquired).unwrap_or_else(|e| error_json(e.to_string()))
}
