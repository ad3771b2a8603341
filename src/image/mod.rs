//! Image transform engine
//!
//! A freely placed image is described by its center, size and rotation
//! inside a container. Eight resize handles and one rotate handle drive
//! pointer gestures; results are applied as inline styles.
//!
//! ## Modules
//!
//! - `handles`: handle placement under rotation and hit testing
//! - `transform`: the transform state and gesture state machine
//! - `export`: bounding-box export plan and RGBA rasterization

pub mod export;
pub mod handles;
pub mod transform;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::models::InlineStyle;

// Re-exports for convenience
pub use export::{export_size, rasterize, rgba_from_raw, ExportPlan};
pub use handles::{handle_positions, hit_test, DragAction, Handle, HandlePosition};
pub use transform::{CompletedGesture, ImageTransformEngine, ImageTransformState, InteractionSession};

/// Flow alignment of an image block that is not freely positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlignment {
    Left,
    Right,
    Center,
    Inline,
}

impl ImageAlignment {
    pub fn parse(value: &str) -> Result<Self, EditorError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(ImageAlignment::Left),
            "right" => Ok(ImageAlignment::Right),
            "center" | "centre" => Ok(ImageAlignment::Center),
            "inline" | "none" => Ok(ImageAlignment::Inline),
            other => Err(EditorError::invalid_argument(
                "alignImage",
                format!("unknown alignment '{}'", other),
            )),
        }
    }

    /// Write `float`/`margin`/`display` for this alignment
    pub fn apply_to(&self, style: &mut InlineStyle) {
        style.remove("float");
        style.remove("display");
        style.remove("margin");
        match self {
            ImageAlignment::Left => {
                style.set("float", "left");
                style.set("margin", "0 1em 1em 0");
            }
            ImageAlignment::Right => {
                style.set("float", "right");
                style.set("margin", "0 0 1em 1em");
            }
            ImageAlignment::Center => {
                style.set("display", "block");
                style.set("margin", "0 auto");
            }
            ImageAlignment::Inline => {}
        }
    }

    /// Read the alignment back from a style map
    pub fn from_style(style: &InlineStyle) -> Self {
        match (style.get("float"), style.get("margin")) {
            (Some("left"), _) => ImageAlignment::Left,
            (Some("right"), _) => ImageAlignment::Right,
            (_, Some("0 auto")) => ImageAlignment::Center,
            _ => ImageAlignment::Inline,
        }
    }
}
