//! Lesson Editor WASM Module
//!
//! Table and image editing core for the browser lesson editor: span-aware
//! table grids, cell selection, structural table operations, border
//! resizing, overlay positioning and free image transforms.

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod image;
pub mod models;
pub mod overlay;
pub mod table;
pub mod undo;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::{Editor, PointerDown, PointerTarget, ToolbarState};
pub use error::EditorError;
pub use models::{
    Block, BlockId, BlockKind, Document, ImageBlock, ImageStatus, InlineStyle, LogicalGrid, Point, Rect,
    Size, Table, TableCell, TableRow,
};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logger();

    log::info!("Lesson Editor WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logger() {
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        wasm_warn!("logger already initialized: {}", e);
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logger() {}
