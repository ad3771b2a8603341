//! Image transform state and the move/resize/rotate gesture engine

use serde::{Deserialize, Serialize};

use super::export::ExportPlan;
use super::handles::{handle_positions, hit_test, DragAction, Handle, HandlePosition};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::models::{rotate_vector, ImageStatus, InlineStyle, Point, Rect, Size};

/// Position, size and rotation of an image relative to its container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTransformState {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
}

impl ImageTransformState {
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The unrotated box
    pub fn body(&self) -> Rect {
        Rect::new(
            self.center_x - self.width / 2.0,
            self.center_y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    /// Fit `natural` into `ratio` of `container`, centered and unrotated
    pub fn fitted(natural: Size, container: Size, ratio: f64, min_size: f64) -> Self {
        let scale = (container.width * ratio / natural.width)
            .min(container.height * ratio / natural.height);
        Self {
            center_x: container.width / 2.0,
            center_y: container.height / 2.0,
            width: (natural.width * scale).max(min_size),
            height: (natural.height * scale).max(min_size),
            rotation_degrees: 0.0,
        }
    }

    fn translate(&mut self, delta: Point) {
        self.center_x += delta.x;
        self.center_y += delta.y;
    }

    /// Drag `handle` by a world-space `delta`, keeping the opposite side fixed
    fn resize(&mut self, handle: Handle, delta: Point, min_size: f64) {
        let local = rotate_vector(delta, -self.rotation_degrees);
        let (dir_x, dir_y) = handle.direction();

        let new_width = (self.width + dir_x * local.x).max(min_size);
        let new_height = (self.height + dir_y * local.y).max(min_size);
        let applied = Point::new(
            dir_x * (new_width - self.width) / 2.0,
            dir_y * (new_height - self.height) / 2.0,
        );

        self.width = new_width;
        self.height = new_height;
        self.translate(rotate_vector(applied, self.rotation_degrees));
    }

    /// Point the rotate handle at `pointer`
    fn rotate_towards(&mut self, pointer: Point) {
        let angle = (pointer.y - self.center_y)
            .atan2(pointer.x - self.center_x)
            .to_degrees()
            + 90.0;
        self.rotation_degrees = angle.rem_euclid(360.0);
    }

    /// Absolute-positioning style for the `<img>` element
    pub fn to_inline_style(&self) -> InlineStyle {
        let body = self.body();
        let mut style = InlineStyle::new();
        style.set("position", "absolute");
        style.set_px("left", body.x);
        style.set_px("top", body.y);
        style.set_px("width", body.width);
        style.set_px("height", body.height);
        style.set(
            "transform",
            format!("rotate({}deg)", (self.rotation_degrees * 100.0).round() / 100.0),
        );
        style
    }
}

/// A pointer gesture in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSession {
    pub action: DragAction,
    pub last_pointer: Point,
    pub initial: ImageTransformState,
}

/// A finished gesture, for the edit history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedGesture {
    pub action: DragAction,
    pub before: ImageTransformState,
    pub after: ImageTransformState,
}

impl CompletedGesture {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Transform state plus the `Idle → Dragging → Idle` gesture machine
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTransformEngine {
    min_size: f64,
    handle_size: f64,
    rotate_offset: f64,
    fit_ratio: f64,
    status: ImageStatus,
    state: Option<ImageTransformState>,
    session: Option<InteractionSession>,
}

impl ImageTransformEngine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            min_size: config.image_min_size_px,
            handle_size: config.handle_size_px,
            rotate_offset: config.rotate_handle_offset_px,
            fit_ratio: config.initial_fit_ratio,
            status: ImageStatus::Loading,
            state: None,
            session: None,
        }
    }

    /// Source finished loading; fit it into the container
    pub fn load(&mut self, natural: Size, container: Size) -> Result<ImageTransformState, EditorError> {
        if !(natural.width > 0.0 && natural.height > 0.0) {
            return Err(EditorError::invalid_argument(
                "load",
                format!("natural size {}x{} must be positive", natural.width, natural.height),
            ));
        }
        let state = ImageTransformState::fitted(natural, container, self.fit_ratio, self.min_size);
        self.status = ImageStatus::Ready;
        self.state = Some(state);
        self.session = None;
        log::debug!("image loaded at {}x{}", state.width, state.height);
        Ok(state)
    }

    /// Source failed to load; drops any geometry
    pub fn mark_failed(&mut self) {
        log::warn!("image failed to load");
        self.status = ImageStatus::Failed;
        self.state = None;
        self.session = None;
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == ImageStatus::Ready
    }

    pub fn state(&self) -> Option<&ImageTransformState> {
        self.state.as_ref()
    }

    fn ready_state(&self) -> Result<&ImageTransformState, EditorError> {
        match (&self.status, &self.state) {
            (ImageStatus::Ready, Some(state)) => Ok(state),
            _ => Err(EditorError::ImageNotReady),
        }
    }

    /// Replace the state wholesale (undo/redo); the size floor still applies
    pub fn set_state(&mut self, mut state: ImageTransformState) -> Result<(), EditorError> {
        self.ready_state()?;
        state.width = state.width.max(self.min_size);
        state.height = state.height.max(self.min_size);
        self.state = Some(state);
        Ok(())
    }

    pub fn handles(&self) -> Result<Vec<HandlePosition>, EditorError> {
        Ok(handle_positions(self.ready_state()?, self.rotate_offset))
    }

    pub fn hit_test(&self, pointer: Point) -> Result<Option<DragAction>, EditorError> {
        Ok(hit_test(self.ready_state()?, pointer, self.handle_size, self.rotate_offset))
    }

    /// Start a gesture if the pointer is on a handle or the body
    pub fn on_pointer_down(&mut self, pointer: Point) -> Result<Option<DragAction>, EditorError> {
        let state = *self.ready_state()?;
        let action = hit_test(&state, pointer, self.handle_size, self.rotate_offset);
        self.session = action.map(|action| InteractionSession {
            action,
            last_pointer: pointer,
            initial: state,
        });
        Ok(action)
    }

    /// Apply the active gesture; `None` when idle
    pub fn on_pointer_move(&mut self, pointer: Point) -> Result<Option<ImageTransformState>, EditorError> {
        if self.session.is_none() {
            return Ok(None);
        }
        if self.ready_state().is_err() {
            self.session = None;
            return Err(EditorError::ImageNotReady);
        }
        let (Some(session), Some(state)) = (self.session.as_mut(), self.state.as_mut()) else {
            return Ok(None);
        };

        let delta = pointer.delta_from(session.last_pointer);
        match session.action {
            DragAction::Move => state.translate(delta),
            DragAction::Resize(handle) => state.resize(handle, delta, self.min_size),
            DragAction::Rotate => state.rotate_towards(pointer),
        }
        session.last_pointer = pointer;
        Ok(Some(*state))
    }

    /// End the gesture; safe to call from a global listener at any time
    pub fn on_pointer_up(&mut self) -> Option<CompletedGesture> {
        let session = self.session.take()?;
        let after = self.state?;
        Some(CompletedGesture {
            action: session.action,
            before: session.initial,
            after,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn to_inline_style(&self) -> Result<InlineStyle, EditorError> {
        Ok(self.ready_state()?.to_inline_style())
    }

    pub fn export_plan(&self) -> Result<ExportPlan, EditorError> {
        Ok(ExportPlan::for_state(self.ready_state()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn ready_engine(state: ImageTransformState) -> ImageTransformEngine {
        let mut engine = ImageTransformEngine::new(&EditorConfig::default());
        engine.load(Size::new(10.0, 10.0), Size::new(400.0, 400.0)).unwrap();
        engine.set_state(state).unwrap();
        engine
    }

    fn state(w: f64, h: f64, rotation: f64) -> ImageTransformState {
        ImageTransformState {
            center_x: 200.0,
            center_y: 200.0,
            width: w,
            height: h,
            rotation_degrees: rotation,
        }
    }

    #[test]
    fn test_load_fits_half_container() {
        let mut engine = ImageTransformEngine::new(&EditorConfig::default());
        let s = engine.load(Size::new(800.0, 400.0), Size::new(600.0, 400.0)).unwrap();
        assert_eq!((s.width, s.height), (300.0, 150.0));
        assert_eq!(s.center(), Point::new(300.0, 200.0));
        assert_eq!(s.rotation_degrees, 0.0);
        assert!(engine.is_ready());
    }

    #[test]
    fn test_failed_image_rejects_geometry() {
        let mut engine = ImageTransformEngine::new(&EditorConfig::default());
        assert_eq!(engine.hit_test(Point::new(0.0, 0.0)), Err(EditorError::ImageNotReady));
        engine.mark_failed();
        assert_eq!(engine.status(), ImageStatus::Failed);
        assert_eq!(engine.on_pointer_down(Point::new(0.0, 0.0)), Err(EditorError::ImageNotReady));
        assert!(engine.export_plan().is_err());
        assert!(engine.on_pointer_up().is_none());
    }

    #[test]
    fn test_move_adds_raw_delta() {
        let mut engine = ready_engine(state(100.0, 100.0, 30.0));
        assert_eq!(engine.on_pointer_down(Point::new(200.0, 200.0)).unwrap(), Some(DragAction::Move));
        let s = engine.on_pointer_move(Point::new(215.0, 190.0)).unwrap().unwrap();
        assert_eq!(s.center(), Point::new(215.0, 190.0));
        let done = engine.on_pointer_up().unwrap();
        assert!(done.changed());
        assert_eq!(done.before.center(), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_east_resize_keeps_west_edge() {
        let mut engine = ready_engine(state(100.0, 100.0, 0.0));
        engine.on_pointer_down(Point::new(250.0, 200.0)).unwrap();
        let s = engine.on_pointer_move(Point::new(290.0, 230.0)).unwrap().unwrap();
        assert!(approx(s.width, 140.0));
        assert!(approx(s.height, 100.0));
        assert!(approx(s.body().x, 150.0));
    }

    #[test]
    fn test_resize_rotated_uses_local_frame() {
        // At 90° the local +x axis points down the screen
        let mut engine = ready_engine(state(100.0, 50.0, 90.0));
        let east = engine
            .handles()
            .unwrap()
            .into_iter()
            .find(|p| p.handle == Handle::East)
            .unwrap()
            .at;
        assert_eq!(
            engine.on_pointer_down(east).unwrap(),
            Some(DragAction::Resize(Handle::East))
        );
        let s = engine
            .on_pointer_move(Point::new(east.x, east.y + 20.0))
            .unwrap()
            .unwrap();
        assert!(approx(s.width, 120.0));
        assert!(approx(s.center_x, 200.0));
        assert!(approx(s.center_y, 210.0));
    }

    #[test]
    fn test_rotate_is_absolute() {
        let mut engine = ready_engine(state(100.0, 100.0, 0.0));
        assert_eq!(engine.on_pointer_down(Point::new(200.0, 120.0)).unwrap(), Some(DragAction::Rotate));
        let s = engine.on_pointer_move(Point::new(300.0, 200.0)).unwrap().unwrap();
        assert!(approx(s.rotation_degrees, 90.0));
        let s = engine.on_pointer_move(Point::new(200.0, 100.0)).unwrap().unwrap();
        assert!(approx(s.rotation_degrees, 0.0));
    }

    #[test]
    fn test_inline_style() {
        let style = state(100.0, 50.0, 45.0).to_inline_style();
        assert_eq!(style.get("left"), Some("150px"));
        assert_eq!(style.get("top"), Some("175px"));
        assert_eq!(style.get("transform"), Some("rotate(45deg)"));
    }

    #[test]
    fn test_move_without_session_is_idle() {
        let mut engine = ready_engine(state(100.0, 100.0, 0.0));
        assert_eq!(engine.on_pointer_move(Point::new(1.0, 1.0)).unwrap(), None);
        assert_eq!(engine.on_pointer_down(Point::new(5.0, 5.0)).unwrap(), None);
        assert!(!engine.is_dragging());
    }
}
