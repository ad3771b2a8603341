//! Image transform editor exposed to JavaScript
//!
//! Used by the image editing dialog, which works on a single image outside
//! the document flow and writes the result back when it closes.

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, editor_error, serialize};
use crate::config::EditorConfig;
use crate::image::{export_size, rasterize, rgba_from_raw, ExportPlan, ImageTransformEngine, ImageTransformState};
use crate::models::{Point, Size};
use crate::wasm_log;

#[wasm_bindgen]
pub struct ImageEditor {
    engine: ImageTransformEngine,
}

#[wasm_bindgen]
impl ImageEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ImageEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            deserialize(config, "ImageEditor config")?
        };
        Ok(Self {
            engine: ImageTransformEngine::new(&config),
        })
    }

    /// Source loaded; returns the fitted transform state
    pub fn load(
        &mut self,
        natural_width: f64,
        natural_height: f64,
        container_width: f64,
        container_height: f64,
    ) -> Result<JsValue, JsValue> {
        let state = self
            .engine
            .load(
                Size::new(natural_width, natural_height),
                Size::new(container_width, container_height),
            )
            .map_err(|e| editor_error("load", e))?;
        serialize(&state, "load")
    }

    #[wasm_bindgen(js_name = markFailed)]
    pub fn mark_failed(&mut self) {
        self.engine.mark_failed();
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        serialize(&self.engine.state(), "state")
    }

    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&mut self, state: JsValue) -> Result<(), JsValue> {
        let state: ImageTransformState = deserialize(state, "setState")?;
        self.engine.set_state(state).map_err(|e| editor_error("setState", e))
    }

    pub fn handles(&self) -> Result<JsValue, JsValue> {
        let handles = self.engine.handles().map_err(|e| editor_error("handles", e))?;
        serialize(&handles, "handles")
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let action = self
            .engine
            .on_pointer_down(Point::new(x, y))
            .map_err(|e| editor_error("pointerDown", e))?;
        if let Some(a) = action {
            wasm_log!("image gesture {:?}", a);
        }
        serialize(&action, "pointerDown")
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let state = self
            .engine
            .on_pointer_move(Point::new(x, y))
            .map_err(|e| editor_error("pointerMove", e))?;
        serialize(&state, "pointerMove")
    }

    /// Returns the finished gesture (before/after), or null when idle
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<JsValue, JsValue> {
        serialize(&self.engine.on_pointer_up(), "pointerUp")
    }

    /// `style` attribute for the transformed `<img>`
    #[wasm_bindgen(js_name = inlineStyle)]
    pub fn inline_style(&self) -> Result<String, JsValue> {
        self.engine
            .to_inline_style()
            .map(|s| s.to_css())
            .map_err(|e| editor_error("inlineStyle", e))
    }

    #[wasm_bindgen(js_name = exportPlan)]
    pub fn export_plan(&self) -> Result<JsValue, JsValue> {
        let plan = self.engine.export_plan().map_err(|e| editor_error("exportPlan", e))?;
        serialize(&plan, "exportPlan")
    }

    /// Render `pixels` (RGBA, `width × height`) as currently transformed
    #[wasm_bindgen(js_name = exportPixels)]
    pub fn export_pixels(&self, pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
        let plan: ExportPlan = self.engine.export_plan().map_err(|e| editor_error("exportPixels", e))?;
        let source = rgba_from_raw(width, height, pixels).map_err(|e| editor_error("exportPixels", e))?;
        Ok(rasterize(&source, &plan).into_raw())
    }
}

/// Bounding size `[width, height]` of a rotated box
#[wasm_bindgen(js_name = exportSize)]
pub fn export_size_js(width: f64, height: f64, rotation_degrees: f64) -> Vec<f64> {
    let size = export_size(width, height, rotation_degrees);
    vec![size.width, size.height]
}
