//! Table editing
//!
//! Interaction and mutation logic for tables embedded in a document.
//!
//! ## Modules
//!
//! - `selection`: pointer → cell mapping and rectangular multi-cell selection
//! - `operations`: insert/delete/merge/split and presentation operations
//! - `resize`: border hover detection and drag-to-resize

pub mod operations;
pub mod resize;
pub mod selection;

// Re-exports for convenience
pub use operations::{apply_operation, OperationOutcome, TableOperation, TableTarget};
pub use resize::{CursorKind, ResizeAxis, ResizeController, ResizeSession};
pub use selection::{
    cell_at, cells_in_bounds, locate_cell, CellCoord, CellRef, SelectionHandle, SelectionRange,
    SelectionTracker,
};
