//! Overlay positioning and the periodic refresh timer

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::helpers::{deserialize, serialize, validation_error};
use crate::models::{Rect, Size};
use crate::overlay::{anchor_bounds, place_toolbar, selection_highlight, Container};
use crate::wasm_log;

/// Highlight boxes for the selected cells' client rects, or null
#[wasm_bindgen(js_name = selectionHighlight)]
pub fn selection_highlight_js(cell_rects: JsValue, container: JsValue) -> Result<JsValue, JsValue> {
    let rects: Vec<Rect> = deserialize(cell_rects, "selectionHighlight rects")?;
    let container: Container = deserialize(container, "selectionHighlight container")?;
    serialize(&selection_highlight(&rects, &container), "selectionHighlight")
}

#[wasm_bindgen(js_name = anchorBounds)]
pub fn anchor_bounds_js(anchor: JsValue, container: JsValue) -> Result<JsValue, JsValue> {
    let anchor: Rect = deserialize(anchor, "anchorBounds anchor")?;
    let container: Container = deserialize(container, "anchorBounds container")?;
    serialize(&anchor_bounds(anchor, &container), "anchorBounds")
}

/// `anchor` is container-relative (see `anchorBounds`)
#[wasm_bindgen(js_name = placeToolbar)]
pub fn place_toolbar_js(anchor: JsValue, size: JsValue, container: JsValue, gap: f64) -> Result<JsValue, JsValue> {
    let anchor: Rect = deserialize(anchor, "placeToolbar anchor")?;
    let size: Size = deserialize(size, "placeToolbar size")?;
    let container: Container = deserialize(container, "placeToolbar container")?;
    serialize(&place_toolbar(anchor, size, &container, gap), "placeToolbar")
}

/// Browser interval that calls `callback(now_ms)` until stopped
///
/// `LessonEditor.setOverlayRefresh` owns one and runs it exactly while the
/// overlay is visible. `start` is idempotent; `stop` (or dropping the task)
/// clears the interval.
#[wasm_bindgen]
pub struct OverlayPollTask {
    interval_ms: i32,
    callback: js_sys::Function,
    handle: Option<i32>,
    closure: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl OverlayPollTask {
    #[wasm_bindgen(constructor)]
    pub fn new(callback: js_sys::Function, interval_ms: u32) -> OverlayPollTask {
        Self {
            interval_ms: interval_ms.clamp(1, i32::MAX as u32) as i32,
            callback,
            handle: None,
            closure: None,
        }
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.handle.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| validation_error("no window"))?;
        let callback = self.callback.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let now = JsValue::from_f64(js_sys::Date::now());
            if let Err(e) = callback.call1(&JsValue::NULL, &now) {
                log::warn!("overlay poll callback failed: {:?}", e);
            }
        });
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            self.interval_ms,
        )?;
        wasm_log!("overlay poll started ({} ms)", self.interval_ms);
        self.handle = Some(handle);
        self.closure = Some(closure);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(handle);
            }
            wasm_log!("overlay poll stopped");
        }
        self.closure = None;
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for OverlayPollTask {
    fn drop(&mut self) {
        self.stop();
    }
}
