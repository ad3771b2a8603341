//! Models module for the Lesson Editor
//!
//! Data structures shared by the table and image engines: the host document
//! model, the visual (span-annotated) table, its logical grid, inline styles
//! and geometry primitives.

pub mod document;
pub mod geometry;
pub mod grid;
pub mod style;
pub mod table;

// Re-export commonly used types
pub use document::{Block, BlockId, BlockKind, Document, ImageBlock, ImageStatus};
pub use geometry::{rotate_vector, Point, Rect, Size};
pub use grid::{
    from_grid, to_grid, GridCell, GridPos, LogicalCell, LogicalGrid, SelectionBounds, MAX_COL_SPAN,
    MAX_ROW_SPAN,
};
pub use style::InlineStyle;
pub use table::{Table, TableBorders, TableCell, TableRow, VAlign};
