//! Shared view state: the rotation/scale the user has applied to the model.
//!
//! Mutated by gesture and keyboard input and by the frame loop's
//! auto-rotate step; read every frame when building the model transform.

use crate::transform::Transform;
use crate::vec3;

/// Pitch is clamped so the model never flips over the top.
pub const PITCH_LIMIT_DEG: f32 = 90.0;
/// Uniform scale bounds for pinch/keyboard zoom.
pub const SCALE_MIN: f32 = 0.5;
pub const SCALE_MAX: f32 = 3.0;
/// Yaw added per rendered frame while auto-rotation is on (0.01 rad).
pub const AUTO_ROTATE_STEP_DEG: f32 = 0.573;
/// Scale step for keyboard/wheel zoom.
pub const ZOOM_STEP: f32 = 0.2;

/// User-controlled model orientation and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Pitch in degrees, clamped to `[-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG]`.
    pub rotation_x_deg: f32,
    /// Yaw in degrees, unbounded.
    pub rotation_y_deg: f32,
    /// Uniform scale, clamped to `[SCALE_MIN, SCALE_MAX]`.
    pub scale: f32,
    pub auto_rotate: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation_x_deg: 0.0,
            rotation_y_deg: 0.0,
            scale: 1.0,
            auto_rotate: false,
        }
    }
}

impl ViewState {
    /// Apply a rotation delta in degrees; pitch is clamped, yaw is not.
    pub fn rotate_by(&mut self, dyaw_deg: f32, dpitch_deg: f32) {
        self.rotation_y_deg += dyaw_deg;
        self.rotation_x_deg =
            (self.rotation_x_deg + dpitch_deg).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Set the absolute scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(SCALE_MIN, SCALE_MAX);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.set_scale(self.scale + delta);
    }

    /// Clamp pitch in place. The frame loop calls this even though input
    /// paths already clamp.
    pub fn clamp_pitch(&mut self) {
        self.rotation_x_deg = self
            .rotation_x_deg
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Advance yaw by one auto-rotate step if enabled. The new value is
    /// stored back here so anything displaying the angle stays in sync.
    pub fn advance_auto_rotate(&mut self) {
        if self.auto_rotate {
            self.rotation_y_deg += AUTO_ROTATE_STEP_DEG;
        }
    }

    /// Reset rotation and scale to defaults; auto-rotate is left alone.
    pub fn reset(&mut self) {
        self.rotation_x_deg = 0.0;
        self.rotation_y_deg = 0.0;
        self.scale = 1.0;
    }

    /// Model transform for the current state (rotation about the origin
    /// plus uniform scale; the mesh is pre-centered by normalization).
    pub fn model_transform(&self) -> Transform {
        Transform::from_rotation_scale(
            vec3(
                self.rotation_x_deg.to_radians(),
                self.rotation_y_deg.to_radians(),
                0.0,
            ),
            self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let v = ViewState::default();
        assert_eq!(v.rotation_x_deg, 0.0);
        assert_eq!(v.rotation_y_deg, 0.0);
        assert_eq!(v.scale, 1.0);
        assert!(!v.auto_rotate);
    }

    #[test]
    fn pitch_clamps_at_limit() {
        let mut v = ViewState::default();
        v.rotate_by(0.0, 120.0);
        assert_eq!(v.rotation_x_deg, PITCH_LIMIT_DEG);
        v.rotate_by(0.0, -500.0);
        assert_eq!(v.rotation_x_deg, -PITCH_LIMIT_DEG);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut v = ViewState::default();
        v.rotate_by(400.0, 0.0);
        assert_eq!(v.rotation_y_deg, 400.0);
    }

    #[test]
    fn scale_clamps_both_ends() {
        let mut v = ViewState::default();
        v.set_scale(10.0);
        assert_eq!(v.scale, SCALE_MAX);
        v.set_scale(0.01);
        assert_eq!(v.scale, SCALE_MIN);
        v.set_scale(1.7);
        assert_eq!(v.scale, 1.7);
    }

    #[test]
    fn auto_rotate_advances_only_when_enabled() {
        let mut v = ViewState::default();
        v.advance_auto_rotate();
        assert_eq!(v.rotation_y_deg, 0.0);
        v.auto_rotate = true;
        v.advance_auto_rotate();
        assert!((v.rotation_y_deg - AUTO_ROTATE_STEP_DEG).abs() < 1e-6);
    }

    #[test]
    fn reset_keeps_auto_rotate_flag() {
        let mut v = ViewState {
            rotation_x_deg: 45.0,
            rotation_y_deg: 180.0,
            scale: 2.5,
            auto_rotate: true,
        };
        v.reset();
        assert_eq!(v.rotation_x_deg, 0.0);
        assert_eq!(v.rotation_y_deg, 0.0);
        assert_eq!(v.scale, 1.0);
        assert!(v.auto_rotate);
    }

    #[test]
    fn model_transform_encodes_rotation_and_scale() {
        let v = ViewState {
            rotation_x_deg: 30.0,
            rotation_y_deg: 60.0,
            scale: 2.0,
            auto_rotate: false,
        };
        let t = v.model_transform();
        assert!((t.rotation_euler.x - 30f32.to_radians()).abs() < 1e-6);
        assert!((t.rotation_euler.y - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!(t.scale.x, 2.0);
        assert_eq!(t.translation.x, 0.0);
    }
}
