//! Column/row resizing by dragging cell borders
//!
//! Hovering near a cell's right edge arms a column resize, near its bottom
//! edge a row resize. A drag then writes pixel sizes straight into inline
//! styles; the logical grid is never involved.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::selection::CellRef;
use crate::config::EditorConfig;
use crate::models::{BlockId, Document, Point, Rect};

/// Pointer cursor the host should show
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize_repr, Deserialize_repr)]
pub enum CursorKind {
    #[default]
    Default = 0,
    ColResize = 1,
    RowResize = 2,
}

impl CursorKind {
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorKind::Default => "default",
            CursorKind::ColResize => "col-resize",
            CursorKind::RowResize => "row-resize",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAxis {
    Column,
    Row,
}

impl ResizeAxis {
    fn cursor(&self) -> CursorKind {
        match self {
            ResizeAxis::Column => CursorKind::ColResize,
            ResizeAxis::Row => CursorKind::RowResize,
        }
    }
}

/// Border currently under the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHover {
    pub axis: ResizeAxis,
    pub table: BlockId,
    pub cell: CellRef,
    pub rect: Rect,
}

/// An in-progress border drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeSession {
    pub axis: ResizeAxis,
    pub table: BlockId,
    pub cell: CellRef,
    pub initial_size: f64,
    pub initial_pointer: f64,
}

impl ResizeSession {
    fn size_for(&self, pointer: Point, min_size: f64) -> f64 {
        let current = match self.axis {
            ResizeAxis::Column => pointer.x,
            ResizeAxis::Row => pointer.y,
        };
        (self.initial_size + (current - self.initial_pointer)).max(min_size)
    }
}

/// Hover detection plus drag state for one editing surface
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeController {
    threshold: f64,
    min_size: f64,
    hover: Option<ResizeHover>,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            threshold: config.resize_threshold_px,
            min_size: config.min_resize_px,
            hover: None,
            session: None,
        }
    }

    /// Classify the pointer against the hovered cell's borders
    ///
    /// While a drag is active the hover state is frozen and the drag cursor
    /// is returned unchanged.
    pub fn on_hover(&mut self, pointer: Point, table: BlockId, cell: CellRef, rect: Rect) -> CursorKind {
        if self.session.is_some() {
            return self.cursor();
        }
        self.hover = detect_border(pointer, rect, self.threshold).map(|axis| ResizeHover {
            axis,
            table,
            cell,
            rect,
        });
        self.cursor()
    }

    /// Pointer left every cell
    pub fn clear_hover(&mut self) {
        if self.session.is_none() {
            self.hover = None;
        }
    }

    /// Start a drag if a border is hovered; returns whether one started
    pub fn on_pointer_down(&mut self, pointer: Point) -> bool {
        let Some(hover) = self.hover else {
            return false;
        };
        let (initial_size, initial_pointer) = match hover.axis {
            ResizeAxis::Column => (hover.rect.width, pointer.x),
            ResizeAxis::Row => (hover.rect.height, pointer.y),
        };
        self.session = Some(ResizeSession {
            axis: hover.axis,
            table: hover.table,
            cell: hover.cell,
            initial_size,
            initial_pointer,
        });
        log::debug!("resize start {:?} at {}", hover.axis, initial_size);
        true
    }

    /// Apply the drag to the target; returns the size written
    ///
    /// If the target cell or row no longer exists the session is abandoned.
    pub fn on_pointer_move(&mut self, pointer: Point, doc: &mut Document) -> Option<f64> {
        let session = self.session?;
        let size = session.size_for(pointer, self.min_size);

        let applied = doc.table_mut(session.table).and_then(|table| match session.axis {
            ResizeAxis::Column => table
                .cell_mut(session.cell.row, session.cell.index)
                .map(|cell| cell.style.set_px("width", size)),
            ResizeAxis::Row => table
                .rows
                .get_mut(session.cell.row)
                .map(|row| row.style.set_px("height", size)),
        });

        if applied.is_none() {
            log::warn!("resize target vanished, abandoning drag");
            self.end();
            return None;
        }
        Some(size)
    }

    /// Finish the drag; returns the session that ended, if any
    pub fn on_pointer_up(&mut self) -> Option<ResizeSession> {
        let ended = self.session.take();
        if ended.is_some() {
            self.hover = None;
        }
        ended
    }

    fn end(&mut self) {
        self.session = None;
        self.hover = None;
    }

    pub fn cursor(&self) -> CursorKind {
        match (&self.session, &self.hover) {
            (Some(s), _) => s.axis.cursor(),
            (None, Some(h)) => h.axis.cursor(),
            (None, None) => CursorKind::Default,
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hover.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }
}

// Right edge wins over bottom edge when the pointer is near the corner
fn detect_border(pointer: Point, rect: Rect, threshold: f64) -> Option<ResizeAxis> {
    let within_y = pointer.y >= rect.y && pointer.y <= rect.bottom();
    let within_x = pointer.x >= rect.x && pointer.x <= rect.right();
    if within_y && (rect.right() - pointer.x).abs() <= threshold {
        Some(ResizeAxis::Column)
    } else if within_x && (rect.bottom() - pointer.y).abs() <= threshold {
        Some(ResizeAxis::Row)
    } else {
        None
    }
}
