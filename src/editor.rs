//! Editor command interface
//!
//! `Editor` owns the document together with every interaction controller and
//! routes pointer input between them. Hosts drive it through named commands
//! (`apply`) and read state back through plain query methods; nothing here
//! assumes a particular UI framework.
//!
//! Pointer routing follows a fixed priority: an armed resize border beats
//! starting a selection, and a single global pointer-up ends whatever
//! gesture is active.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::image::{
    DragAction, ExportPlan, HandlePosition, ImageAlignment, ImageTransformEngine, ImageTransformState,
};
use crate::models::{
    Block, BlockId, BlockKind, Document, ImageBlock, ImageStatus, Point, Rect, Size, Table,
};
use crate::overlay::{OverlayPoller, OverlayTarget, TimerChange};
use crate::table::{
    apply_operation, CellRef, CursorKind, OperationOutcome, ResizeController, SelectionHandle,
    SelectionTracker, TableOperation, TableTarget,
};
use crate::undo::{Command, UndoStack};

/// What the pointer is over, as resolved by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerTarget {
    /// A table cell and its client rect
    Cell { table: BlockId, cell: CellRef, rect: Rect },
    Image { block: BlockId },
    /// Anything that is not a table or an image
    Outside,
}

/// Result of a pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerDown {
    ResizeStarted,
    SelectionStarted,
    ImageGesture { action: DragAction },
    SelectionCleared,
    Ignored,
}

/// Enabled/disabled state for the table toolbar and history buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarState {
    pub has_selection: bool,
    pub can_merge: bool,
    pub can_split: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

// Snapshot taken when a resize drag starts
#[derive(Debug, Clone, PartialEq)]
struct PendingEdit {
    index: usize,
    before: Block,
}

#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    document: Document,
    selection: SelectionTracker,
    resize: ResizeController,
    overlay: OverlayPoller,
    images: BTreeMap<BlockId, ImageTransformEngine>,
    active_image: Option<BlockId>,
    pending_resize: Option<PendingEdit>,
    history: UndoStack,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        Self {
            selection: SelectionTracker::new(),
            resize: ResizeController::new(&config),
            overlay: OverlayPoller::new(config.overlay_poll_interval_ms),
            history: UndoStack::new(config.history_limit),
            images: BTreeMap::new(),
            active_image: None,
            pending_resize: None,
            document,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply a table operation by toolbar name, against the current selection
    pub fn apply(&mut self, name: &str, args: &Value) -> Result<OperationOutcome, EditorError> {
        let op = TableOperation::parse(name, args)?;
        Ok(self.apply_operation(&op))
    }

    /// Apply a parsed operation against the current selection
    pub fn apply_operation(&mut self, op: &TableOperation) -> OperationOutcome {
        let target = self.selection.table().map(|table| TableTarget {
            table,
            bounds: self.selection.bounds(),
        });
        self.apply_to(target, op)
    }

    /// Apply an operation to a specific table
    ///
    /// The current selection's rectangle is used when it lies in that table.
    pub fn apply_to_table(&mut self, table: BlockId, op: &TableOperation) -> OperationOutcome {
        let bounds = self
            .selection
            .bounds()
            .filter(|_| self.selection.table() == Some(table));
        self.apply_to(Some(TableTarget { table, bounds }), op)
    }

    fn apply_to(&mut self, target: Option<TableTarget>, op: &TableOperation) -> OperationOutcome {
        let snapshot = target.and_then(|t| self.snapshot(t.table));
        let outcome = apply_operation(&mut self.document, target, op);

        if let (Some((index, before)), OperationOutcome::Applied | OperationOutcome::TableRemoved) =
            (snapshot, outcome)
        {
            let id = before.id;
            self.history.push(Command::ReplaceBlock {
                block: id,
                index,
                before: Some(before),
                after: self.document.block(id).cloned(),
            });
        }
        if outcome == OperationOutcome::TableRemoved {
            self.selection.clear();
        } else {
            self.selection.revalidate(&self.document);
        }
        self.sync_overlay();
        outcome
    }

    /// Append an empty `rows × cols` table
    pub fn insert_table(&mut self, rows: usize, cols: usize) -> Result<BlockId, EditorError> {
        if rows == 0 || cols == 0 {
            return Err(EditorError::invalid_argument(
                "insertTable",
                format!("{}x{} table has no cells", rows, cols),
            ));
        }
        let id = self.document.push_table(Table::with_size(rows, cols));
        self.record_insert(id);
        log::info!("inserted {}x{} table {}", rows, cols, id);
        Ok(id)
    }

    /// Append an image block; geometry becomes available once it loads
    pub fn insert_image(&mut self, src: &str, alt: &str) -> BlockId {
        let id = self.document.push_image(ImageBlock {
            src: src.to_string(),
            alt: alt.to_string(),
            ..ImageBlock::default()
        });
        self.images.insert(id, ImageTransformEngine::new(&self.config));
        self.record_insert(id);
        id
    }

    fn record_insert(&mut self, id: BlockId) {
        if let Some((index, block)) = self.snapshot(id) {
            self.history.push(Command::ReplaceBlock {
                block: id,
                index,
                before: None,
                after: Some(block),
            });
        }
    }

    fn snapshot(&self, id: BlockId) -> Option<(usize, Block)> {
        let index = self.document.index_of(id)?;
        Some((index, self.document.blocks[index].clone()))
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    fn check_image(&self, id: BlockId) -> Result<(), EditorError> {
        match self.document.block(id).map(|b| &b.kind) {
            None => Err(EditorError::BlockNotFound(id)),
            Some(BlockKind::Image(_)) => Ok(()),
            Some(_) => Err(EditorError::WrongBlockKind { id, expected: "image" }),
        }
    }

    fn engine(&self, id: BlockId) -> Result<&ImageTransformEngine, EditorError> {
        self.check_image(id)?;
        self.images.get(&id).ok_or(EditorError::ImageNotReady)
    }

    /// The image source loaded with the given natural size
    pub fn image_loaded(
        &mut self,
        id: BlockId,
        natural: Size,
        container: Size,
    ) -> Result<ImageTransformState, EditorError> {
        self.check_image(id)?;
        let config = &self.config;
        let engine = self
            .images
            .entry(id)
            .or_insert_with(|| ImageTransformEngine::new(config));
        let state = engine.load(natural, container)?;
        if let Some(image) = self.document.image_mut(id) {
            image.status = ImageStatus::Ready;
            image.style.extend(&state.to_inline_style());
        }
        Ok(state)
    }

    /// The image source failed to load
    pub fn image_failed(&mut self, id: BlockId) -> Result<(), EditorError> {
        self.check_image(id)?;
        let config = &self.config;
        self.images
            .entry(id)
            .or_insert_with(|| ImageTransformEngine::new(config))
            .mark_failed();
        if let Some(image) = self.document.image_mut(id) {
            image.status = ImageStatus::Failed;
        }
        if self.active_image == Some(id) {
            self.active_image = None;
        }
        Ok(())
    }

    pub fn align_image(&mut self, id: BlockId, alignment: ImageAlignment) -> Result<(), EditorError> {
        self.check_image(id)?;
        let Some((index, before)) = self.snapshot(id) else {
            return Err(EditorError::BlockNotFound(id));
        };
        if let Some(image) = self.document.image_mut(id) {
            alignment.apply_to(&mut image.style);
        }
        let after = self.document.block(id).cloned();
        if after.as_ref() != Some(&before) {
            self.history.push(Command::ReplaceBlock {
                block: id,
                index,
                before: Some(before),
                after,
            });
        }
        Ok(())
    }

    pub fn image_state(&self, id: BlockId) -> Result<ImageTransformState, EditorError> {
        self.engine(id)?.state().copied().ok_or(EditorError::ImageNotReady)
    }

    pub fn image_handles(&self, id: BlockId) -> Result<Vec<HandlePosition>, EditorError> {
        self.engine(id)?.handles()
    }

    pub fn image_export_plan(&self, id: BlockId) -> Result<ExportPlan, EditorError> {
        self.engine(id)?.export_plan()
    }

    // ------------------------------------------------------------------
    // Pointer routing
    // ------------------------------------------------------------------

    /// Pointer moved with no button held; returns the cursor to show
    pub fn pointer_hover(&mut self, pointer: Point, target: PointerTarget) -> CursorKind {
        match target {
            PointerTarget::Cell { table, cell, rect } => self.resize.on_hover(pointer, table, cell, rect),
            _ => {
                self.resize.clear_hover();
                self.resize.cursor()
            }
        }
    }

    pub fn pointer_down(
        &mut self,
        pointer: Point,
        target: PointerTarget,
        now_ms: f64,
    ) -> Result<PointerDown, EditorError> {
        match target {
            PointerTarget::Cell { table, cell, .. } => {
                if self.resize.on_pointer_down(pointer) {
                    self.pending_resize = self
                        .resize
                        .session()
                        .and_then(|s| self.snapshot(s.table))
                        .map(|(index, before)| PendingEdit { index, before });
                    return Ok(PointerDown::ResizeStarted);
                }
                let Some(t) = self.document.table(table) else {
                    return Err(EditorError::BlockNotFound(table));
                };
                if self.selection.on_pointer_down(table, t, cell) {
                    self.overlay.show(OverlayTarget::Selection { table }, now_ms);
                    Ok(PointerDown::SelectionStarted)
                } else {
                    self.overlay.hide();
                    Ok(PointerDown::SelectionCleared)
                }
            }
            PointerTarget::Image { block } => {
                self.check_image(block)?;
                self.selection.clear();
                let Some(engine) = self.images.get_mut(&block) else {
                    return Err(EditorError::ImageNotReady);
                };
                match engine.on_pointer_down(pointer)? {
                    Some(action) => {
                        self.active_image = Some(block);
                        self.overlay.show(OverlayTarget::Element { block }, now_ms);
                        Ok(PointerDown::ImageGesture { action })
                    }
                    None => {
                        self.overlay.hide();
                        Ok(PointerDown::Ignored)
                    }
                }
            }
            PointerTarget::Outside => {
                self.selection.clear();
                self.overlay.hide();
                Ok(PointerDown::SelectionCleared)
            }
        }
    }

    /// Pointer moved with a button held; true when something changed
    pub fn pointer_move(&mut self, pointer: Point, target: PointerTarget) -> Result<bool, EditorError> {
        if self.resize.is_dragging() {
            return Ok(self.resize.on_pointer_move(pointer, &mut self.document).is_some());
        }

        if let Some(block) = self.active_image {
            let Some(engine) = self.images.get_mut(&block) else {
                self.active_image = None;
                return Ok(false);
            };
            return match engine.on_pointer_move(pointer)? {
                Some(state) => match self.document.image_mut(block) {
                    Some(image) => {
                        image.style.extend(&state.to_inline_style());
                        Ok(true)
                    }
                    None => {
                        log::warn!("image {} vanished mid-gesture", block);
                        engine.on_pointer_up();
                        self.active_image = None;
                        Ok(false)
                    }
                },
                None => Ok(false),
            };
        }

        if let PointerTarget::Cell { table, cell, .. } = target {
            if let Some(t) = self.document.table(table) {
                return Ok(self.selection.on_pointer_move(table, t, cell));
            }
        }
        Ok(false)
    }

    /// Global pointer-up: ends every active gesture
    pub fn pointer_up(&mut self) {
        if self.resize.on_pointer_up().is_some() {
            if let Some(pending) = self.pending_resize.take() {
                let id = pending.before.id;
                let after = self.document.block(id).cloned();
                if after.as_ref() != Some(&pending.before) {
                    self.history.push(Command::ReplaceBlock {
                        block: id,
                        index: pending.index,
                        before: Some(pending.before),
                        after,
                    });
                }
            }
        }
        self.pending_resize = None;

        if let Some(block) = self.active_image.take() {
            let gesture = self.images.get_mut(&block).and_then(|e| e.on_pointer_up());
            if let Some(g) = gesture.filter(|g| g.changed()) {
                log::debug!("image {} {:?} finished", block, g.action);
                self.history.push(Command::TransformImage {
                    block,
                    before: g.before,
                    after: g.after,
                });
            }
        }

        self.selection.on_pointer_up();
    }

    // ------------------------------------------------------------------
    // Selection handles & overlay
    // ------------------------------------------------------------------

    pub fn selection_handle(&self) -> Option<SelectionHandle> {
        self.selection.handle()
    }

    /// Re-apply a selection saved earlier (e.g. before a modal dialog)
    pub fn restore_selection(&mut self, handle: SelectionHandle, now_ms: f64) -> bool {
        let restored = self.selection.restore(handle, &self.document);
        if restored {
            self.overlay
                .show(OverlayTarget::Selection { table: handle.table() }, now_ms);
        } else {
            self.overlay.hide();
        }
        restored
    }

    /// Poll timer callback; true when the host should re-measure the overlay
    pub fn overlay_tick(&mut self, now_ms: f64) -> bool {
        self.sync_overlay();
        self.overlay.tick(now_ms)
    }

    /// Window resize or container scroll
    pub fn viewport_changed(&mut self, now_ms: f64) -> bool {
        self.sync_overlay();
        self.overlay.on_viewport_change(now_ms)
    }

    fn sync_overlay(&mut self) {
        let doc = &self.document;
        self.overlay.retain_if(|id| doc.block(id).is_some());
        if let Some(OverlayTarget::Selection { .. }) = self.overlay.target() {
            if self.selection.table().is_none() {
                self.overlay.hide();
            }
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let command = self.history.undo(&mut self.document)?;
        if let Some(Command::TransformImage { block, before, .. }) = &command {
            self.sync_engine(*block, *before);
        }
        self.after_history();
        Ok(command.is_some())
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let command = self.history.redo(&mut self.document)?;
        if let Some(Command::TransformImage { block, after, .. }) = &command {
            self.sync_engine(*block, *after);
        }
        self.after_history();
        Ok(command.is_some())
    }

    fn sync_engine(&mut self, block: BlockId, state: ImageTransformState) {
        if let Some(engine) = self.images.get_mut(&block) {
            if let Err(e) = engine.set_state(state) {
                log::warn!("image {} not restored: {}", block, e);
            }
        }
    }

    fn after_history(&mut self) {
        self.selection.revalidate(&self.document);
        self.sync_images();
        self.sync_overlay();
    }

    /// Keep one engine per image block still in the document
    fn sync_images(&mut self) {
        let document = &self.document;
        self.images.retain(|id, _| document.image(*id).is_some());
        for block in &document.blocks {
            if let BlockKind::Image(_) = block.kind {
                self.images
                    .entry(block.id)
                    .or_insert_with(|| ImageTransformEngine::new(&self.config));
            }
        }
        if let Some(active) = self.active_image {
            if !self.images.contains_key(&active) {
                self.active_image = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn cursor(&self) -> CursorKind {
        self.resize.cursor()
    }

    pub fn overlay_target(&self) -> Option<OverlayTarget> {
        self.overlay.target()
    }

    /// How a host refresh timer (`running` or not) must change after the last call
    pub fn overlay_timer_change(&self, running: bool) -> Option<TimerChange> {
        self.overlay.timer_change(running)
    }

    pub fn is_dragging(&self) -> bool {
        self.resize.is_dragging() || self.active_image.is_some() || self.selection.is_selecting()
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        ToolbarState {
            has_selection: self.selection.range().is_some(),
            can_merge: self.selection.can_merge(),
            can_split: self.selection.can_split(&self.document),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cell_target(table: BlockId, row: usize, index: usize) -> PointerTarget {
        PointerTarget::Cell {
            table,
            cell: CellRef::new(row, index),
            rect: Rect::new(index as f64 * 100.0, row as f64 * 30.0, 100.0, 30.0),
        }
    }

    fn select(editor: &mut Editor, table: BlockId, from: (usize, usize), to: (usize, usize)) {
        let p = Point::new(10.0, 10.0);
        editor.pointer_hover(p, PointerTarget::Outside);
        editor
            .pointer_down(p, cell_target(table, from.0, from.1), 0.0)
            .unwrap();
        editor.pointer_move(p, cell_target(table, to.0, to.1)).unwrap();
        editor.pointer_up();
    }

    #[test]
    fn test_apply_without_selection_is_noop() {
        let mut editor = Editor::default();
        editor.insert_table(2, 2).unwrap();
        assert_eq!(editor.apply("mergeCells", &json!({})).unwrap(), OperationOutcome::NoOp);
        assert!(matches!(
            editor.apply("explode", &json!({})),
            Err(EditorError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_select_then_merge_and_undo() {
        let mut editor = Editor::default();
        let t = editor.insert_table(2, 2).unwrap();
        select(&mut editor, t, (0, 0), (1, 1));
        assert!(editor.toolbar_state().can_merge);

        assert_eq!(editor.apply("mergeCells", &json!({})).unwrap(), OperationOutcome::Applied);
        assert_eq!(editor.document().table(t).unwrap().cell_count(), 1);
        assert!(editor.toolbar_state().can_split);

        assert!(editor.undo().unwrap());
        assert_eq!(editor.document().table(t).unwrap().cell_count(), 4);
        assert!(editor.redo().unwrap());
        assert_eq!(editor.document().table(t).unwrap().cell_count(), 1);
    }

    #[test]
    fn test_delete_table_clears_selection() {
        let mut editor = Editor::default();
        let t = editor.insert_table(2, 2).unwrap();
        select(&mut editor, t, (0, 0), (0, 0));
        assert!(editor.overlay_target().is_some());

        assert_eq!(
            editor.apply("deleteTable", &json!({})).unwrap(),
            OperationOutcome::TableRemoved
        );
        assert!(editor.selection().range().is_none());
        assert!(editor.overlay_target().is_none());

        editor.undo().unwrap();
        assert!(editor.document().table(t).is_some());
    }

    #[test]
    fn test_resize_beats_selection() {
        let mut editor = Editor::default();
        let t = editor.insert_table(1, 2).unwrap();
        let target = cell_target(t, 0, 0);
        let edge = Point::new(98.0, 10.0);
        assert_eq!(editor.pointer_hover(edge, target), CursorKind::ColResize);
        assert_eq!(editor.pointer_down(edge, target, 0.0).unwrap(), PointerDown::ResizeStarted);
        assert!(editor.selection().range().is_none());

        editor.pointer_move(Point::new(148.0, 10.0), target).unwrap();
        editor.pointer_up();
        let cell = editor.document().table(t).unwrap().cell(0, 0).unwrap();
        assert_eq!(cell.style.get("width"), Some("150px"));
        assert_eq!(editor.cursor(), CursorKind::Default);

        editor.undo().unwrap();
        let cell = editor.document().table(t).unwrap().cell(0, 0).unwrap();
        assert_eq!(cell.style.get("width"), None);
    }

    #[test]
    fn test_click_outside_clears() {
        let mut editor = Editor::default();
        let t = editor.insert_table(2, 2).unwrap();
        select(&mut editor, t, (0, 0), (1, 0));
        let down = editor
            .pointer_down(Point::new(0.0, 0.0), PointerTarget::Outside, 0.0)
            .unwrap();
        assert_eq!(down, PointerDown::SelectionCleared);
        assert!(!editor.toolbar_state().has_selection);
    }

    #[test]
    fn test_image_gesture_recorded() {
        let mut editor = Editor::default();
        let img = editor.insert_image("cat.png", "a cat");
        assert_eq!(
            editor.pointer_down(Point::new(0.0, 0.0), PointerTarget::Image { block: img }, 0.0),
            Err(EditorError::ImageNotReady)
        );

        editor
            .image_loaded(img, Size::new(200.0, 100.0), Size::new(400.0, 400.0))
            .unwrap();
        let down = editor
            .pointer_down(Point::new(200.0, 200.0), PointerTarget::Image { block: img }, 0.0)
            .unwrap();
        assert_eq!(down, PointerDown::ImageGesture { action: DragAction::Move });
        editor
            .pointer_move(Point::new(220.0, 200.0), PointerTarget::Outside)
            .unwrap();
        editor.pointer_up();

        assert_eq!(editor.image_state(img).unwrap().center_x, 220.0);
        editor.undo().unwrap();
        assert_eq!(editor.image_state(img).unwrap().center_x, 200.0);
        assert_eq!(editor.document().image(img).unwrap().style.get("left"), Some("100px"));
    }

    #[test]
    fn test_undo_drops_image_engine() {
        let mut editor = Editor::default();
        let image = editor.insert_image("a.png", "");
        editor
            .image_loaded(image, Size::new(100.0, 100.0), Size::new(400.0, 400.0))
            .unwrap();
        assert_eq!(editor.images.len(), 1);

        assert!(editor.undo().unwrap());
        assert!(editor.images.is_empty());
        assert!(matches!(editor.image_state(image), Err(EditorError::BlockNotFound(_))));

        // Redo brings the block back with a fresh engine awaiting its load
        assert!(editor.redo().unwrap());
        assert_eq!(editor.images.len(), 1);
        assert!(matches!(editor.image_state(image), Err(EditorError::ImageNotReady)));
    }

    #[test]
    fn test_image_commands_check_kind() {
        let mut editor = Editor::default();
        let t = editor.insert_table(1, 1).unwrap();
        assert_eq!(
            editor.align_image(t, ImageAlignment::Left),
            Err(EditorError::WrongBlockKind { id: t, expected: "image" })
        );
        assert_eq!(
            editor.image_failed(BlockId(99)),
            Err(EditorError::BlockNotFound(BlockId(99)))
        );
    }

    #[test]
    fn test_selection_handle_restore() {
        let mut editor = Editor::default();
        let t = editor.insert_table(3, 3).unwrap();
        select(&mut editor, t, (0, 0), (1, 1));
        let handle = editor.selection_handle().unwrap();

        editor.pointer_down(Point::new(0.0, 0.0), PointerTarget::Outside, 0.0).unwrap();
        assert!(editor.restore_selection(handle, 10.0));
        assert_eq!(editor.selection().selected_cells().len(), 4);
    }
}
