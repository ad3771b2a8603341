//! `LessonEditor`: the document editor exposed to JavaScript
//!
//! Structured arguments (pointer targets, sizes, selection handles) travel as
//! plain JS objects converted with serde; results come back the same way.

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, editor_error, json_args, serialize};
use super::overlay::OverlayPollTask;
use crate::config::EditorConfig;
use crate::editor::{Editor, PointerTarget};
use crate::image::ImageAlignment;
use crate::models::{BlockId, Document, Point, Size};
use crate::overlay::TimerChange;
use crate::table::SelectionHandle;
use crate::{wasm_info, wasm_warn};

#[wasm_bindgen]
pub struct LessonEditor {
    inner: Editor,
    /// Runs exactly while the overlay is visible
    poll: Option<OverlayPollTask>,
}

#[wasm_bindgen]
impl LessonEditor {
    /// Create an editor; `config` is an optional partial `EditorConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LessonEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            deserialize(config, "LessonEditor config")?
        };
        wasm_info!("LessonEditor created");
        Ok(Self {
            inner: Editor::new(config),
            poll: None,
        })
    }

    /// Create an editor over an existing document and config JSON strings
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(document_json: &str, config_json: &str) -> Result<LessonEditor, JsValue> {
        let document: Document = serde_json::from_str(document_json)
            .map_err(|e| editor_error("fromJson", e.into()))?;
        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(|e| editor_error("fromJson", e))?
        };
        Ok(Self {
            inner: Editor::with_document(document, config),
            poll: None,
        })
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Run a table operation by name; returns "applied", "noOp" or "tableRemoved"
    pub fn apply(&mut self, name: &str, args: JsValue) -> Result<JsValue, JsValue> {
        let args = json_args(args, name)?;
        let outcome = self
            .inner
            .apply(name, &args)
            .map_err(|e| editor_error("apply", e))?;
        self.sync_poll();
        serialize(&outcome, "apply")
    }

    #[wasm_bindgen(js_name = insertTable)]
    pub fn insert_table(&mut self, rows: usize, cols: usize) -> Result<u32, JsValue> {
        self.inner
            .insert_table(rows, cols)
            .map(|id| id.0)
            .map_err(|e| editor_error("insertTable", e))
    }

    #[wasm_bindgen(js_name = insertImage)]
    pub fn insert_image(&mut self, src: &str, alt: &str) -> u32 {
        self.inner.insert_image(src, alt).0
    }

    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, block: u32, natural: JsValue, container: JsValue) -> Result<JsValue, JsValue> {
        let natural: Size = deserialize(natural, "imageLoaded natural size")?;
        let container: Size = deserialize(container, "imageLoaded container size")?;
        let state = self
            .inner
            .image_loaded(BlockId(block), natural, container)
            .map_err(|e| editor_error("imageLoaded", e))?;
        serialize(&state, "imageLoaded")
    }

    #[wasm_bindgen(js_name = imageFailed)]
    pub fn image_failed(&mut self, block: u32) -> Result<(), JsValue> {
        wasm_warn!("image {} failed to load", block);
        self.inner
            .image_failed(BlockId(block))
            .map_err(|e| editor_error("imageFailed", e))
    }

    #[wasm_bindgen(js_name = alignImage)]
    pub fn align_image(&mut self, block: u32, alignment: &str) -> Result<(), JsValue> {
        let alignment = ImageAlignment::parse(alignment).map_err(|e| editor_error("alignImage", e))?;
        self.inner
            .align_image(BlockId(block), alignment)
            .map_err(|e| editor_error("alignImage", e))
    }

    #[wasm_bindgen(js_name = imageHandles)]
    pub fn image_handles(&self, block: u32) -> Result<JsValue, JsValue> {
        let handles = self
            .inner
            .image_handles(BlockId(block))
            .map_err(|e| editor_error("imageHandles", e))?;
        serialize(&handles, "imageHandles")
    }

    #[wasm_bindgen(js_name = imageExportPlan)]
    pub fn image_export_plan(&self, block: u32) -> Result<JsValue, JsValue> {
        let plan = self
            .inner
            .image_export_plan(BlockId(block))
            .map_err(|e| editor_error("imageExportPlan", e))?;
        serialize(&plan, "imageExportPlan")
    }

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        let undone = self.inner.undo().map_err(|e| editor_error("undo", e))?;
        self.sync_poll();
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        let redone = self.inner.redo().map_err(|e| editor_error("redo", e))?;
        self.sync_poll();
        Ok(redone)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Returns the cursor code (0 default, 1 col-resize, 2 row-resize)
    #[wasm_bindgen(js_name = pointerHover)]
    pub fn pointer_hover(&mut self, x: f64, y: f64, target: JsValue) -> Result<u8, JsValue> {
        let target: PointerTarget = deserialize(target, "pointerHover target")?;
        Ok(self.inner.pointer_hover(Point::new(x, y), target) as u8)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, target: JsValue, now_ms: f64) -> Result<JsValue, JsValue> {
        let target: PointerTarget = deserialize(target, "pointerDown target")?;
        let down = self
            .inner
            .pointer_down(Point::new(x, y), target, now_ms)
            .map_err(|e| editor_error("pointerDown", e))?;
        self.sync_poll();
        serialize(&down, "pointerDown")
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, target: JsValue) -> Result<bool, JsValue> {
        let target: PointerTarget = deserialize(target, "pointerMove target")?;
        self.inner
            .pointer_move(Point::new(x, y), target)
            .map_err(|e| editor_error("pointerMove", e))
    }

    /// Wire to a global (window-level) pointerup listener
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    // ------------------------------------------------------------------
    // Selection & overlay
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = selectionHandle)]
    pub fn selection_handle(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.selection_handle(), "selectionHandle")
    }

    #[wasm_bindgen(js_name = restoreSelection)]
    pub fn restore_selection(&mut self, handle: JsValue, now_ms: f64) -> Result<bool, JsValue> {
        let handle: SelectionHandle = deserialize(handle, "restoreSelection handle")?;
        let restored = self.inner.restore_selection(handle, now_ms);
        self.sync_poll();
        Ok(restored)
    }

    #[wasm_bindgen(js_name = selectedCells)]
    pub fn selected_cells(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.selection().selected_cells(), "selectedCells")
    }

    #[wasm_bindgen(js_name = overlayTarget)]
    pub fn overlay_target(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.overlay_target(), "overlayTarget")
    }

    /// True when the overlay should be re-measured
    #[wasm_bindgen(js_name = overlayTick)]
    pub fn overlay_tick(&mut self, now_ms: f64) -> bool {
        let due = self.inner.overlay_tick(now_ms);
        self.sync_poll();
        due
    }

    #[wasm_bindgen(js_name = viewportChanged)]
    pub fn viewport_changed(&mut self, now_ms: f64) -> bool {
        let visible = self.inner.viewport_changed(now_ms);
        self.sync_poll();
        visible
    }

    /// Register `callback(nowMs)`, called on the configured interval while
    /// the overlay is visible; the host calls `overlayTick` from it
    #[wasm_bindgen(js_name = setOverlayRefresh)]
    pub fn set_overlay_refresh(&mut self, callback: js_sys::Function) {
        let interval = self.inner.config().overlay_poll_interval_ms;
        // Dropping the previous task clears its interval
        self.poll = Some(OverlayPollTask::new(callback, interval));
        self.sync_poll();
    }

    #[wasm_bindgen(js_name = isOverlayPolling)]
    pub fn is_overlay_polling(&self) -> bool {
        self.poll.as_ref().map_or(false, |t| t.is_running())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = toolbarState)]
    pub fn toolbar_state(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.toolbar_state(), "toolbarState")
    }

    pub fn cursor(&self) -> String {
        self.inner.cursor().as_css().to_string()
    }

    pub fn document(&self) -> Result<JsValue, JsValue> {
        serialize(self.inner.document(), "document")
    }

    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.document()).map_err(|e| editor_error("documentJson", e.into()))
    }
}

impl LessonEditor {
    // Start or stop the refresh timer to match overlay visibility
    fn sync_poll(&mut self) {
        let Some(task) = self.poll.as_mut() else {
            return;
        };
        match self.inner.overlay_timer_change(task.is_running()) {
            Some(TimerChange::Start) => {
                if let Err(e) = task.start() {
                    wasm_warn!("overlay poll not started: {:?}", e);
                }
            }
            Some(TimerChange::Stop) => task.stop(),
            None => {}
        }
    }
}
