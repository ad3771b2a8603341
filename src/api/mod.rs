//! Lesson Editor WASM API
//!
//! JavaScript-facing wrappers around the editor core. Stateful editors are
//! exported as classes; pure geometry helpers as free functions.
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serde conversion and error conversion
//! - `editor`: `LessonEditor`, the document/table editor
//! - `image`: `ImageEditor` for the image dialog, plus export helpers
//! - `overlay`: overlay geometry and the `OverlayPollTask` timer

pub mod editor;
pub mod helpers;
pub mod image;
pub mod overlay;

// Re-export the exported classes and functions
pub use editor::LessonEditor;
pub use image::{export_size_js, ImageEditor};
pub use overlay::{anchor_bounds_js, place_toolbar_js, selection_highlight_js, OverlayPollTask};
