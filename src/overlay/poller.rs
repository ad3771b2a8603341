//! Periodic overlay refresh
//!
//! Anchored content (a rotating image, a table being resized) moves without
//! emitting events an overlay could listen to, so a visible overlay is
//! re-measured on a fixed interval in addition to resize/scroll events. This
//! type only decides *when* to re-measure; the host owns the timer.

use serde::{Deserialize, Serialize};

use crate::models::BlockId;

/// What a visible overlay is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayTarget {
    /// The current cell selection inside a table
    Selection { table: BlockId },
    /// A single element (image, whole table)
    Element { block: BlockId },
}

impl OverlayTarget {
    pub fn block(&self) -> BlockId {
        match self {
            OverlayTarget::Selection { table } => *table,
            OverlayTarget::Element { block } => *block,
        }
    }
}

/// What the host timer must do to match the overlay's visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerChange {
    Start,
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPoller {
    interval_ms: f64,
    target: Option<OverlayTarget>,
    last_refresh_ms: Option<f64>,
}

impl OverlayPoller {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms.max(1)),
            target: None,
            last_refresh_ms: None,
        }
    }

    /// Overlay became visible; returns true (measure immediately)
    pub fn show(&mut self, target: OverlayTarget, now_ms: f64) -> bool {
        self.target = Some(target);
        self.last_refresh_ms = Some(now_ms);
        true
    }

    /// Overlay hidden; polling stops at once
    pub fn hide(&mut self) {
        self.target = None;
        self.last_refresh_ms = None;
    }

    /// Replace the target; a `None` target stops polling like `hide`
    pub fn set_target(&mut self, target: Option<OverlayTarget>, now_ms: f64) {
        match target {
            Some(t) => {
                self.show(t, now_ms);
            }
            None => self.hide(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<OverlayTarget> {
        self.target
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Timer callback; true when a re-measure is due
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.target.is_none() {
            return false;
        }
        let due = self
            .last_refresh_ms
            .map_or(true, |last| now_ms - last >= self.interval_ms);
        if due {
            self.last_refresh_ms = Some(now_ms);
        }
        due
    }

    /// Window resize or container scroll; true when visible
    pub fn on_viewport_change(&mut self, now_ms: f64) -> bool {
        if self.target.is_none() {
            return false;
        }
        self.last_refresh_ms = Some(now_ms);
        true
    }

    /// Start or stop a host timer currently `running` so it runs exactly
    /// while the overlay is visible
    pub fn timer_change(&self, running: bool) -> Option<TimerChange> {
        match (self.is_active(), running) {
            (true, false) => Some(TimerChange::Start),
            (false, true) => Some(TimerChange::Stop),
            _ => None,
        }
    }

    /// Stop if the anchored block no longer exists
    pub fn retain_if(&mut self, exists: impl Fn(BlockId) -> bool) {
        if let Some(t) = self.target {
            if !exists(t.block()) {
                log::debug!("overlay target {} gone, stopping poll", t.block());
                self.hide();
            }
        }
    }
}
