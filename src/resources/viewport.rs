use bevy::prelude::*;
use std::time::Duration;
use crate::resources::constants::DRAG_THRESHOLD;
use crate::resources::settings::ViewerConfig;

/// How a pointer press ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRelease {
    /// Released without moving past the drag threshold
    Click,
    /// The press turned into a pan
    Pan,
}

#[derive(Debug, Clone, Copy)]
struct DragGesture {
    start: Vec2,
    last_offset: Vec2,
}

/// Pan and zoom of the map view.
///
/// A layout point `world` is drawn at
/// `viewport_center + offset + world * zoom` in window coordinates.
#[derive(Resource, Debug, Clone)]
pub struct ViewportState {
    pub zoom: f32,
    pub offset: Vec2,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
    initial_zoom: f32,
    drag: Option<DragGesture>,
    has_dragged: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl ViewportState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        let initial_zoom = config.initial_zoom.clamp(config.min_zoom, config.max_zoom);
        Self {
            zoom: initial_zoom,
            offset: Vec2::ZERO,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            initial_zoom,
            drag: None,
            has_dragged: false,
        }
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    /// Start a drag at `pos`
    pub fn begin_drag(&mut self, pos: Vec2) {
        self.drag = Some(DragGesture {
            start: pos,
            last_offset: self.offset,
        });
        self.has_dragged = false;
    }

    /// Move an active drag to `pos`. Returns false when no drag is active.
    pub fn drag_to(&mut self, pos: Vec2) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };

        let delta = pos - drag.start;
        if delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD {
            self.has_dragged = true;
        }
        self.offset = drag.last_offset + delta;
        true
    }

    /// Finish the active drag, if any
    pub fn end_drag(&mut self) -> Option<PointerRelease> {
        self.drag.take()?;
        Some(if self.has_dragged {
            PointerRelease::Pan
        } else {
            PointerRelease::Click
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the current (or last) press moved past the drag threshold
    pub fn has_dragged(&self) -> bool {
        self.has_dragged
    }

    /// Drop a drag without classifying it, e.g. when a second finger lands
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Set zoom to `zoom` (clamped), keeping the layout point under `anchor`
    /// fixed. `anchor` is relative to the viewport centre.
    pub fn zoom_at(&mut self, anchor: Vec2, zoom: f32) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if new_zoom == self.zoom {
            return;
        }
        let world = (anchor - self.offset) / self.zoom;
        self.offset = anchor - world * new_zoom;
        self.zoom = new_zoom;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_at(Vec2::ZERO, self.zoom + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_at(Vec2::ZERO, self.zoom - self.zoom_step);
    }

    /// Centre-anchored zoom by a fraction of `zoom_step` (negative zooms out)
    pub fn zoom_by_steps(&mut self, steps: f32) {
        self.zoom_at(Vec2::ZERO, self.zoom + steps * self.zoom_step);
    }

    /// Back to the initial zoom with no pan
    pub fn reset(&mut self) {
        self.zoom = self.initial_zoom;
        self.offset = Vec2::ZERO;
        self.drag = None;
        self.has_dragged = false;
    }

    /// Centre the view on a layout point at the current zoom
    pub fn pan_to(&mut self, world: Vec2) {
        self.offset = -world * self.zoom;
    }

    /// Layout point currently drawn at the centre of the viewport
    pub fn look_at(&self) -> Vec2 {
        -self.offset / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2, viewport_size: Vec2) -> Vec2 {
        viewport_size / 2.0 + self.offset + world * self.zoom
    }

    pub fn screen_to_world(&self, screen: Vec2, viewport_size: Vec2) -> Vec2 {
        (screen - viewport_size / 2.0 - self.offset) / self.zoom
    }

    /// Window-space rectangle of a layout-space rectangle
    pub fn rect_to_screen(&self, rect: Rect, viewport_size: Vec2) -> Rect {
        Rect::from_corners(
            self.world_to_screen(rect.min, viewport_size),
            self.world_to_screen(rect.max, viewport_size),
        )
    }
}

/// Defers work until input has been quiet for `delay`.
///
/// Every `poke` pushes the deadline out; `poll` fires once when the deadline
/// passes, so a burst of pokes yields exactly one firing after the last one.
#[derive(Debug, Clone)]
pub struct SettleTimer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl SettleTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn poke(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Debounce for recomputes triggered by wheel and pinch zoom
#[derive(Resource, Debug, Clone)]
pub struct ZoomSettle(pub SettleTimer);

impl Default for ZoomSettle {
    fn default() -> Self {
        Self(SettleTimer::new(crate::resources::constants::ZOOM_SETTLE_DELAY))
    }
}
