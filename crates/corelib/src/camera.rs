use crate::{Mat4, Vec3, vec3};

/// Default vertical field of view for the model viewer, in degrees.
pub const DEFAULT_FOV_Y_DEG: f32 = 70.0;
/// Default camera distance from the model along +Z.
pub const DEFAULT_EYE_Z: f32 = 5.0;
/// Default near/far planes.
pub const DEFAULT_Z_NEAR: f32 = 1.0;
pub const DEFAULT_Z_FAR: f32 = 1000.0;

/// Simple perspective camera (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// The fixed viewer camera: on the +Z axis looking at the origin.
    pub fn viewer_default(aspect: f32) -> Self {
        Self::new_perspective(
            vec3(0.0, 0.0, DEFAULT_EYE_Z),
            Vec3::ZERO,
            Vec3::Y,
            DEFAULT_FOV_Y_DEG.to_radians(),
            DEFAULT_Z_NEAR,
            DEFAULT_Z_FAR,
            aspect,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// wgpu-style projection (z in [0,1]).
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}
