//! Handle geometry and hit testing for a transformed image
//!
//! Handles are laid out on the unrotated box and then rotated about the
//! image center, so they follow the image at any angle.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::transform::ImageTransformState;
use crate::models::{Point, Rect};

/// One of the eight resize handles or the rotate handle
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
pub enum Handle {
    NorthWest = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
    Rotate = 8,
}

impl Handle {
    /// Hit-test order; the rotate handle sits outside the box so it goes first
    pub const ALL: [Handle; 9] = [
        Handle::Rotate,
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Handle::NorthWest => "nw",
            Handle::North => "n",
            Handle::NorthEast => "ne",
            Handle::East => "e",
            Handle::SouthEast => "se",
            Handle::South => "s",
            Handle::SouthWest => "sw",
            Handle::West => "w",
            Handle::Rotate => "rotate",
        }
    }

    pub fn from_name(name: &str) -> Option<Handle> {
        Handle::ALL.iter().copied().find(|h| h.name() == name)
    }

    /// Direction of the handle from the center in the local frame
    ///
    /// `(-1, 0)` is the west edge, `(1, 1)` the south-east corner. The rotate
    /// handle has no resize direction.
    pub fn direction(&self) -> (f64, f64) {
        match self {
            Handle::NorthWest => (-1.0, -1.0),
            Handle::North => (0.0, -1.0),
            Handle::NorthEast => (1.0, -1.0),
            Handle::East => (1.0, 0.0),
            Handle::SouthEast => (1.0, 1.0),
            Handle::South => (0.0, 1.0),
            Handle::SouthWest => (-1.0, 1.0),
            Handle::West => (-1.0, 0.0),
            Handle::Rotate => (0.0, 0.0),
        }
    }

    pub fn is_corner(&self) -> bool {
        let (dx, dy) = self.direction();
        dx != 0.0 && dy != 0.0
    }
}

/// What a pointer-down on the image starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "handle", rename_all = "camelCase")]
pub enum DragAction {
    Move,
    Resize(Handle),
    Rotate,
}

impl DragAction {
    fn for_handle(handle: Handle) -> DragAction {
        match handle {
            Handle::Rotate => DragAction::Rotate,
            other => DragAction::Resize(other),
        }
    }
}

/// A handle and its on-screen center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandlePosition {
    pub handle: Handle,
    pub at: Point,
}

/// Handle centers in world space, in hit-test order
pub fn handle_positions(state: &ImageTransformState, rotate_offset: f64) -> Vec<HandlePosition> {
    let center = state.center();
    let half_w = state.width / 2.0;
    let half_h = state.height / 2.0;

    Handle::ALL
        .iter()
        .map(|&handle| {
            let local = match handle {
                Handle::Rotate => Point::new(center.x, center.y - half_h - rotate_offset),
                _ => {
                    let (dx, dy) = handle.direction();
                    Point::new(center.x + dx * half_w, center.y + dy * half_h)
                }
            };
            HandlePosition {
                handle,
                at: local.rotate_about(center, state.rotation_degrees),
            }
        })
        .collect()
}

/// Classify a pointer-down position
///
/// Handle boxes win over the body. The body test un-rotates the pointer about
/// the center and checks the plain box.
pub fn hit_test(
    state: &ImageTransformState,
    pointer: Point,
    handle_size: f64,
    rotate_offset: f64,
) -> Option<DragAction> {
    let handle = handle_positions(state, rotate_offset)
        .into_iter()
        .find(|pos| Rect::centered(pos.at, handle_size).contains(pointer));
    if let Some(pos) = handle {
        return Some(DragAction::for_handle(pos.handle));
    }

    let local = pointer.rotate_about(state.center(), -state.rotation_degrees);
    if state.body().contains(local) {
        Some(DragAction::Move)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(rotation: f64) -> ImageTransformState {
        ImageTransformState {
            center_x: 200.0,
            center_y: 200.0,
            width: 100.0,
            height: 100.0,
            rotation_degrees: rotation,
        }
    }

    #[test]
    fn test_unrotated_positions() {
        let positions = handle_positions(&square(0.0), 30.0);
        let find = |h: Handle| positions.iter().find(|p| p.handle == h).unwrap().at;
        assert_eq!(find(Handle::NorthWest), Point::new(150.0, 150.0));
        assert_eq!(find(Handle::East), Point::new(250.0, 200.0));
        assert_eq!(find(Handle::Rotate), Point::new(200.0, 120.0));
    }

    #[test]
    fn test_body_and_miss() {
        let s = square(0.0);
        assert_eq!(hit_test(&s, Point::new(200.0, 210.0), 10.0, 30.0), Some(DragAction::Move));
        assert_eq!(hit_test(&s, Point::new(400.0, 400.0), 10.0, 30.0), None);
        assert_eq!(
            hit_test(&s, Point::new(251.0, 199.0), 10.0, 30.0),
            Some(DragAction::Resize(Handle::East))
        );
    }

    #[test]
    fn test_rotated_body_uses_local_frame() {
        // At 45° the box's unrotated corner region is empty space
        let s = square(45.0);
        assert_eq!(hit_test(&s, Point::new(155.0, 155.0), 10.0, 30.0), None);
        // ...while a point along the rotated diagonal is still inside
        assert_eq!(hit_test(&s, Point::new(260.0, 200.0), 10.0, 30.0), Some(DragAction::Move));
    }

    #[test]
    fn test_handle_names_round_trip() {
        for h in Handle::ALL {
            assert_eq!(Handle::from_name(h.name()), Some(h));
        }
        assert!(Handle::NorthEast.is_corner());
        assert!(!Handle::South.is_corner());
    }
}
