//! Overlay positioning
//!
//! Floating toolbars and selection highlights are absolutely positioned
//! inside a scrollable container, so every client rect is converted into the
//! container's own coordinate space before use.
//!
//! ## Modules
//!
//! - `poller`: start/stop bookkeeping for periodic re-measurement

pub mod poller;

use serde::{Deserialize, Serialize};

use crate::models::{Rect, Size};

pub use poller::{OverlayPoller, OverlayTarget, TimerChange};

/// The scrollable element overlays are positioned in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Client rect of the container
    pub rect: Rect,
    #[serde(default)]
    pub scroll_left: f64,
    #[serde(default)]
    pub scroll_top: f64,
}

impl Container {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }

    /// Client rect → container-relative rect (absolute-position space)
    pub fn to_local(&self, client: Rect) -> Rect {
        client.translate(
            self.scroll_left - self.rect.x,
            self.scroll_top - self.rect.y,
        )
    }

    /// Currently visible region, in container-relative space
    pub fn visible(&self) -> Rect {
        Rect::new(self.scroll_left, self.scroll_top, self.rect.width, self.rect.height)
    }
}

/// One box per selected cell plus a frame around all of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionHighlight {
    pub cells: Vec<Rect>,
    pub bounds: Rect,
}

/// Highlight geometry for the selected cells' client rects
pub fn selection_highlight(cell_rects: &[Rect], container: &Container) -> Option<SelectionHighlight> {
    let cells: Vec<Rect> = cell_rects.iter().map(|r| container.to_local(*r)).collect();
    let bounds = Rect::union_all(cells.iter())?;
    Some(SelectionHighlight { cells, bounds })
}

/// Container-relative bounds of a single anchored element
pub fn anchor_bounds(anchor: Rect, container: &Container) -> Rect {
    container.to_local(anchor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolbarPosition {
    pub left: f64,
    pub top: f64,
    pub placement: Placement,
}

/// Place a toolbar of `size` next to `anchor` (container-relative)
///
/// Prefers sitting `gap` above the anchor and flips below when that would
/// leave the visible region. Horizontally centered on the anchor, clamped to
/// the visible width.
pub fn place_toolbar(anchor: Rect, size: Size, container: &Container, gap: f64) -> ToolbarPosition {
    let visible = container.visible();

    let above = anchor.y - gap - size.height;
    let (top, placement) = if above >= visible.y {
        (above, Placement::Above)
    } else {
        (anchor.bottom() + gap, Placement::Below)
    };

    let centered = anchor.center().x - size.width / 2.0;
    let max_left = (visible.right() - size.width).max(visible.x);
    let left = centered.clamp(visible.x, max_left);

    ToolbarPosition {
        left,
        top,
        placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Container {
        Container {
            rect: Rect::new(100.0, 50.0, 400.0, 300.0),
            scroll_left: 0.0,
            scroll_top: 20.0,
        }
    }

    #[test]
    fn test_to_local_accounts_for_scroll() {
        let local = container().to_local(Rect::new(150.0, 100.0, 10.0, 10.0));
        assert_eq!(local, Rect::new(50.0, 70.0, 10.0, 10.0));
    }

    #[test]
    fn test_highlight_has_union_frame() {
        let rects = [
            Rect::new(110.0, 60.0, 50.0, 20.0),
            Rect::new(160.0, 80.0, 50.0, 40.0),
        ];
        let hl = selection_highlight(&rects, &container()).unwrap();
        assert_eq!(hl.cells.len(), 2);
        assert_eq!(hl.bounds, Rect::new(10.0, 30.0, 100.0, 60.0));
        assert!(selection_highlight(&[], &container()).is_none());
    }

    #[test]
    fn test_toolbar_flips_below_near_top() {
        let c = container();
        let toolbar = Size::new(120.0, 32.0);
        let high = Rect::new(50.0, 30.0, 100.0, 20.0);
        let pos = place_toolbar(high, toolbar, &c, 8.0);
        assert_eq!(pos.placement, Placement::Below);
        assert_eq!(pos.top, 58.0);

        let low = Rect::new(50.0, 200.0, 100.0, 20.0);
        let pos = place_toolbar(low, toolbar, &c, 8.0);
        assert_eq!(pos.placement, Placement::Above);
        assert_eq!(pos.top, 160.0);
    }

    #[test]
    fn test_toolbar_clamped_horizontally() {
        let c = container();
        let pos = place_toolbar(Rect::new(0.0, 200.0, 10.0, 10.0), Size::new(120.0, 32.0), &c, 8.0);
        assert_eq!(pos.left, 0.0);
        let pos = place_toolbar(Rect::new(390.0, 200.0, 10.0, 10.0), Size::new(120.0, 32.0), &c, 8.0);
        assert_eq!(pos.left, 280.0);
    }
}
