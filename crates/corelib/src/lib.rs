//! Core types: math re-exports, Transform, Camera, ViewState.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;
pub mod view;
