//! Finite-state gesture recognizer: one finger rotates, two fingers
//! pinch-scale, a double tap resets the view.
//!
//! The controller is fed the full set of active points after every touch
//! transition, so switching between one- and two-finger contact always
//! re-baselines instead of carrying stale anchors.

use std::time::{Duration, Instant};

use corelib::view::ViewState;

/// Degrees of rotation per pixel of drag, both axes.
pub const ROTATE_SENSITIVITY: f32 = 0.5;
/// Two touch-end events closer than this count as a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: TouchPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    Rotating {
        last: TouchPoint,
    },
    Scaling {
        initial_distance: f32,
        initial_scale: f32,
    },
}

pub struct GestureController {
    state: GestureState,
    last_tap: Option<Instant>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            last_tap: None,
        }
    }

    #[inline]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// A touch began; `points` is every currently active point.
    pub fn touch_began(&mut self, points: &[TouchPoint], view: &ViewState) {
        self.rebaseline(points, view);
    }

    /// Active points moved.
    pub fn touch_moved(&mut self, points: &[TouchPoint], view: &mut ViewState) {
        match (self.state, points) {
            (GestureState::Rotating { last }, [p]) => {
                let dx = p.x - last.x;
                let dy = p.y - last.y;
                // Screen y grows downward: dragging up tilts the view up.
                view.rotate_by(dx * ROTATE_SENSITIVITY, -dy * ROTATE_SENSITIVITY);
                self.state = GestureState::Rotating { last: *p };
            }
            (
                GestureState::Scaling {
                    initial_distance,
                    initial_scale,
                },
                [a, b],
            ) => {
                if initial_distance > 0.0 {
                    let ratio = a.distance(*b) / initial_distance;
                    view.set_scale(initial_scale * ratio);
                }
            }
            // Point count disagrees with the recorded state: re-anchor
            // rather than apply a bogus delta.
            _ => self.rebaseline(points, view),
        }
    }

    /// A touch ended or was cancelled; `remaining` is what is still down.
    pub fn touch_ended(&mut self, remaining: &[TouchPoint], now: Instant, view: &mut ViewState) {
        if remaining.is_empty() {
            if let Some(previous) = self.last_tap {
                if now.duration_since(previous) < DOUBLE_TAP_WINDOW {
                    log::debug!("double tap: resetting view");
                    view.reset();
                }
            }
            self.last_tap = Some(now);
            self.state = GestureState::Idle;
        } else {
            // 2 -> 1 fingers: restart rotation from the surviving point.
            self.rebaseline(remaining, view);
        }
    }

    fn rebaseline(&mut self, points: &[TouchPoint], view: &ViewState) {
        self.state = match points {
            [] => GestureState::Idle,
            [p] => GestureState::Rotating { last: *p },
            [a, b, ..] => GestureState::Scaling {
                initial_distance: a.distance(*b),
                initial_scale: view.scale,
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::view::{PITCH_LIMIT_DEG, SCALE_MAX};

    fn p(x: f32, y: f32) -> TouchPoint {
        TouchPoint::new(x, y)
    }

    #[test]
    fn horizontal_drag_rotates_yaw_only() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(100.0, 100.0)], &view);
        ctl.touch_moved(&[p(110.0, 100.0)], &mut view);
        assert!((view.rotation_y_deg - 5.0).abs() < 1e-6);
        assert_eq!(view.rotation_x_deg, 0.0);
    }

    #[test]
    fn drag_up_tilts_up_and_clamps_at_ninety() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(0.0, 500.0)], &view);
        // Drag up 100px: pitch += 50.
        ctl.touch_moved(&[p(0.0, 400.0)], &mut view);
        assert!((view.rotation_x_deg - 50.0).abs() < 1e-6);
        // Keep dragging far past the limit.
        ctl.touch_moved(&[p(0.0, -2000.0)], &mut view);
        assert_eq!(view.rotation_x_deg, PITCH_LIMIT_DEG);
    }

    #[test]
    fn deltas_accumulate_from_the_last_point() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(0.0, 0.0)], &view);
        ctl.touch_moved(&[p(10.0, 0.0)], &mut view);
        ctl.touch_moved(&[p(20.0, 0.0)], &mut view);
        assert!((view.rotation_y_deg - 10.0).abs() < 1e-6);
    }

    #[test]
    fn pinch_scales_by_distance_ratio() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(0.0, 0.0), p(100.0, 0.0)], &view);
        ctl.touch_moved(&[p(0.0, 0.0), p(200.0, 0.0)], &mut view);
        assert!((view.scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn pinch_clamps_at_scale_bounds() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(0.0, 0.0), p(10.0, 0.0)], &view);
        // Ratio of 10 would mean scale 10; it clamps to the max.
        ctl.touch_moved(&[p(0.0, 0.0), p(100.0, 0.0)], &mut view);
        assert_eq!(view.scale, SCALE_MAX);
    }

    #[test]
    fn pinch_baseline_is_the_scale_at_gesture_start() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        view.set_scale(2.0);
        ctl.touch_began(&[p(0.0, 0.0), p(100.0, 0.0)], &view);
        ctl.touch_moved(&[p(0.0, 0.0), p(50.0, 0.0)], &mut view);
        assert!((view.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn adding_a_second_finger_rebaselines_to_scaling() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(0.0, 0.0)], &view);
        ctl.touch_moved(&[p(30.0, 0.0)], &mut view);
        let yaw_before = view.rotation_y_deg;

        ctl.touch_began(&[p(30.0, 0.0), p(130.0, 0.0)], &view);
        assert!(matches!(ctl.state(), GestureState::Scaling { .. }));
        // An unmoved pair must not change anything.
        ctl.touch_moved(&[p(30.0, 0.0), p(130.0, 0.0)], &mut view);
        assert_eq!(view.rotation_y_deg, yaw_before);
        assert_eq!(view.scale, 1.0);
    }

    #[test]
    fn lifting_to_one_finger_restarts_rotation_cleanly() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(0.0, 0.0), p(100.0, 0.0)], &view);
        ctl.touch_ended(&[p(100.0, 0.0)], Instant::now(), &mut view);
        assert_eq!(
            ctl.state(),
            GestureState::Rotating {
                last: p(100.0, 0.0)
            }
        );
        // First move after the switch applies only the fresh delta.
        ctl.touch_moved(&[p(110.0, 0.0)], &mut view);
        assert!((view.rotation_y_deg - 5.0).abs() < 1e-6);
    }

    #[test]
    fn double_tap_within_window_resets_view() {
        let mut ctl = GestureController::new();
        let mut view = ViewState {
            rotation_x_deg: 40.0,
            rotation_y_deg: 200.0,
            scale: 2.0,
            auto_rotate: false,
        };
        let t0 = Instant::now();
        ctl.touch_ended(&[], t0, &mut view);
        ctl.touch_ended(&[], t0 + Duration::from_millis(200), &mut view);
        assert_eq!(view.rotation_x_deg, 0.0);
        assert_eq!(view.rotation_y_deg, 0.0);
        assert_eq!(view.scale, 1.0);
    }

    #[test]
    fn slow_taps_do_not_reset() {
        let mut ctl = GestureController::new();
        let mut view = ViewState {
            rotation_x_deg: 40.0,
            rotation_y_deg: 200.0,
            scale: 2.0,
            auto_rotate: false,
        };
        let t0 = Instant::now();
        ctl.touch_ended(&[], t0, &mut view);
        ctl.touch_ended(&[], t0 + Duration::from_millis(400), &mut view);
        assert_eq!(view.rotation_y_deg, 200.0);
        assert_eq!(view.scale, 2.0);
    }

    #[test]
    fn release_clears_tracking_state() {
        let mut ctl = GestureController::new();
        let mut view = ViewState::default();
        ctl.touch_began(&[p(5.0, 5.0)], &view);
        ctl.touch_ended(&[], Instant::now(), &mut view);
        assert_eq!(ctl.state(), GestureState::Idle);
    }
}
