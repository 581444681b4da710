//! SceneRuntime: camera + GPU state + the single owned mesh slot, and the
//! per-frame update/render step driven by the platform loop.

use std::sync::Arc;

use winit::window::Window;

use asset::mesh::MeshData;
use corelib::camera::Camera;
use corelib::view::ViewState;

use crate::{GpuState, InstalledMesh, RendererError};

pub struct SceneRuntime {
    gpu: GpuState,
    camera: Camera,
    /// Single-owner slot for the displayed model. Only this type mutates
    /// it, and only after disposing whatever it held before.
    mesh: Option<InstalledMesh>,
}

impl SceneRuntime {
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self, RendererError> {
        let gpu = GpuState::new(window, backends).await?;
        let camera = Camera::viewer_default(gpu.aspect());
        Ok(Self {
            gpu,
            camera,
            mesh: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.camera.aspect = self.gpu.aspect();
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Replace the displayed model. The previous mesh's geometry and
    /// material are disposed first; two live meshes never coexist.
    pub fn install_mesh(&mut self, mesh: &MeshData) {
        if let Some(previous) = self.mesh.take() {
            log::debug!(
                "disposing previous mesh ({} vertices)",
                previous.vertex_count()
            );
            previous.dispose();
        }
        self.mesh = Some(self.gpu.create_mesh(mesh));
    }

    /// One frame: clamp pitch (defense in depth), advance auto-rotation
    /// (writing the new yaw back into the shared state), then render with
    /// the resulting model transform.
    pub fn frame(&mut self, view: &mut ViewState) -> Result<(), wgpu::SurfaceError> {
        view.clamp_pitch();
        view.advance_auto_rotate();

        let model = view.model_transform().matrix();
        let mvp = self.camera.proj_view() * model;
        self.gpu.render(mvp, model, self.mesh.as_ref())
    }

    pub fn recreate_surface(&mut self) {
        self.gpu.recreate_surface();
    }

    /// Release everything owned by the runtime before it is discarded:
    /// mesh buffers now, device/surface when `self` drops.
    pub fn teardown(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            mesh.dispose();
        }
        log::info!("scene runtime torn down");
    }
}

impl Drop for SceneRuntime {
    fn drop(&mut self) {
        // Teardown is idempotent thanks to the Option slot.
        if let Some(mesh) = self.mesh.take() {
            mesh.dispose();
        }
    }
}
