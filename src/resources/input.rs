use bevy::prelude::*;

/// Two-finger pinch in progress
#[derive(Debug, Clone, Copy)]
pub struct Pinch {
    pub start_distance: f32,
    pub start_zoom: f32,
}

// Resource to track touch gestures
#[derive(Resource, Default)]
pub struct TouchGestureState {
    /// Finger driving a one-finger pan/tap
    pub primary: Option<u64>,
    pub pinch: Option<Pinch>,
}

impl TouchGestureState {
    /// Zoom for the current finger spread, if pinching
    pub fn pinch_zoom(&self, distance: f32) -> Option<f32> {
        let pinch = self.pinch?;
        if pinch.start_distance <= f32::EPSILON {
            return None;
        }
        Some(pinch.start_zoom * distance / pinch.start_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinch_zoom_scales_with_finger_spread() {
        let state = TouchGestureState {
            primary: None,
            pinch: Some(Pinch { start_distance: 100.0, start_zoom: 1.2 }),
        };
        let zoom = state.pinch_zoom(150.0).unwrap();
        assert!((zoom - 1.8).abs() < 1e-5);
        assert_eq!(TouchGestureState::default().pinch_zoom(150.0), None);
    }
}
