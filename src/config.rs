//! Editor configuration
//!
//! Thresholds and geometry constants shared by the table and image engines.
//! The host may override any subset of them with a JSON object; missing keys
//! fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Tunable constants for interaction and layout
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Distance (px) from a cell's right/bottom edge that counts as a border hover
    pub resize_threshold_px: f64,

    /// Smallest width/height (px) a column or row can be dragged to
    pub min_resize_px: f64,

    /// Smallest width/height (px) of a transformed image
    pub image_min_size_px: f64,

    /// Side length (px) of a square image handle hit box
    pub handle_size_px: f64,

    /// Distance (px) of the rotate handle above the image's top edge
    pub rotate_handle_offset_px: f64,

    /// Fraction of the container a freshly loaded image is fitted into
    pub initial_fit_ratio: f64,

    /// Overlay re-measure interval while visible
    pub overlay_poll_interval_ms: u32,

    /// Gap (px) between a floating toolbar and its anchor
    pub toolbar_gap_px: f64,

    /// Maximum number of undo steps kept
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resize_threshold_px: 5.0,
            min_resize_px: 10.0,
            image_min_size_px: 20.0,
            handle_size_px: 10.0,
            rotate_handle_offset_px: 30.0,
            initial_fit_ratio: 0.5,
            overlay_poll_interval_ms: 100,
            toolbar_gap_px: 8.0,
            history_limit: 100,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration object
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EditorError> {
        if self.image_min_size_px <= 0.0 || self.min_resize_px <= 0.0 {
            return Err(EditorError::Config(
                "minimum sizes must be positive".to_string(),
            ));
        }
        if !(self.initial_fit_ratio > 0.0 && self.initial_fit_ratio <= 1.0) {
            return Err(EditorError::Config(format!(
                "initialFitRatio {} must be in (0, 1]",
                self.initial_fit_ratio
            )));
        }
        if self.overlay_poll_interval_ms == 0 {
            return Err(EditorError::Config(
                "overlayPollIntervalMs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
