//! Renderer: wgpu init + depth + a single replaceable mesh slot.
//! wgpu = 26.x, winit = 0.30.x

use std::num::NonZeroU64;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use thiserror::Error;
use wgpu::{
    util::DeviceExt,
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, DepthBiasState, DepthStencilState, Device, DeviceDescriptor,
    Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor, ShaderModuleDescriptor,
    ShaderSource, ShaderStages, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor, VertexBufferLayout, VertexState, VertexStepMode,
};

use winit::{dpi::PhysicalSize, window::Window};

use asset::mesh::MeshData;
use asset::normalize;

pub mod scene;
pub use scene::SceneRuntime;

/// The 3D path could not be brought up. Fatal: callers are expected to
/// degrade to a non-3D presentation, not retry.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(String),
    #[error("GPU device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Vertex: position + normal, interleaved from flat mesh arrays.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}
impl Vertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

/// Camera UBO (16-byte aligned): clip transform + model matrix for
/// lighting in world space.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct CameraUniform {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct MaterialUniform {
    color: [f32; 4],
}

/// The untextured default material (the classic saddle-brown the
/// original product viewer shipped with).
pub const DEFAULT_MODEL_COLOR: [f32; 4] = [0.545, 0.271, 0.075, 1.0];

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Interleave flat mesh arrays into GPU vertices. Missing normals are
/// derived on the spot so a mesh straight from the parser still renders.
pub fn vertex_data(mesh: &MeshData) -> Vec<Vertex> {
    let derived;
    let normals: &[f32] = match &mesh.normals {
        Some(n) => n,
        None => {
            derived = normalize::face_normals(&mesh.positions);
            &derived
        }
    };
    mesh.positions
        .chunks_exact(3)
        .zip(normals.chunks_exact(3))
        .map(|(p, n)| Vertex {
            pos: [p[0], p[1], p[2]],
            normal: [n[0], n[1], n[2]],
        })
        .collect()
}

/// GPU-side geometry + material for one installed model. Disposal is
/// explicit: the owner must call [`InstalledMesh::dispose`] before
/// dropping the slot, so repeated loads never accumulate buffers.
pub struct InstalledMesh {
    vertex_buf: Buffer,
    material_buf: Buffer,
    material_bg: BindGroup,
    vertex_count: u32,
}

impl InstalledMesh {
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Release the GPU buffers now rather than whenever the handles
    /// happen to drop.
    pub fn dispose(self) {
        self.vertex_buf.destroy();
        self.material_buf.destroy();
    }
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    #[allow(dead_code)]
    surface_format: TextureFormat,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipeline
    pipeline: RenderPipeline,

    // Camera
    camera_bg: BindGroup,
    camera_buf: Buffer,

    // Material layout for mesh installs
    material_bgl: BindGroupLayout,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window>. Every acquisition
    /// failure maps to a typed [`RendererError`].
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self, RendererError> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .map_err(|e| RendererError::SurfaceUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RendererError::AdapterUnavailable(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("MeshView Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| RendererError::DeviceUnavailable(e.to_string()))?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        // Configure surface
        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Depth texture
        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let shader_src: &str = include_str!("shaders/mesh.wgsl");
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh WGSL"),
            source: ShaderSource::Wgsl(shader_src.into()),
        });

        // ==== Camera BGL/BG ====
        let camera_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Camera BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        NonZeroU64::new(std::mem::size_of::<CameraUniform>() as u64).unwrap(),
                    ),
                },
                count: None,
            }],
        });

        let camera_init = CameraUniform {
            mvp: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let camera_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera UBO"),
            contents: bytemuck::bytes_of(&camera_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let camera_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera BG"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buf.as_entire_binding(),
            }],
        });

        // ==== Material BGL (bind groups are created per installed mesh) ====
        let material_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Material BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        NonZeroU64::new(std::mem::size_of::<MaterialUniform>() as u64).unwrap(),
                    ),
                },
                count: None,
            }],
        });

        // ==== Pipeline ====
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Mesh PipelineLayout"),
            bind_group_layouts: &[&camera_bgl, &material_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                // OBJ files in the wild disagree on winding; render
                // double-sided like the original viewer.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            surface_format,
            surface_config,
            device,
            queue,
            pipeline,
            camera_bg,
            camera_buf,
            material_bgl,
            depth_view,
            width,
            height,
        })
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Upload a mesh into fresh GPU buffers with the default material.
    pub fn create_mesh(&self, mesh: &MeshData) -> InstalledMesh {
        let vertices = vertex_data(mesh);
        let vertex_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model VB"),
                contents: bytemuck::cast_slice(&vertices),
                usage: BufferUsages::VERTEX,
            });
        let material = MaterialUniform {
            color: DEFAULT_MODEL_COLOR,
        };
        let material_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Material UBO"),
                contents: bytemuck::bytes_of(&material),
                usage: BufferUsages::UNIFORM,
            });
        let material_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material BG"),
            layout: &self.material_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buf.as_entire_binding(),
            }],
        });
        InstalledMesh {
            vertex_buf,
            material_buf,
            material_bg,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: upload matrices, clear, draw the installed mesh
    /// (clear-only when nothing is installed yet).
    pub fn render(
        &mut self,
        mvp: Mat4,
        model: Mat4,
        mesh: Option<&InstalledMesh>,
    ) -> Result<(), SurfaceError> {
        let cam = CameraUniform {
            mvp: mvp.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.camera_buf, 0, bytemuck::bytes_of(&cam));

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color {
                            r: 1.0,
                            g: 1.0,
                            b: 1.0,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(mesh) = mesh {
                if mesh.vertex_count > 0 {
                    rpass.set_pipeline(&self.pipeline);
                    rpass.set_bind_group(0, &self.camera_bg, &[]);
                    rpass.set_bind_group(1, &mesh.material_bg, &[]);
                    rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                    rpass.draw(0..mesh.vertex_count, 0..1);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn interleaves_supplied_normals() {
        let mesh = MeshData::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            Some(vec![0.0, 0.0, 1.0].repeat(3)),
            None,
        );
        let verts = vertex_data(&mesh);
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].pos, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn derives_normals_for_bare_positions() {
        let mesh = MeshData::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            None,
            None,
        );
        let verts = vertex_data(&mesh);
        assert_eq!(verts[0].normal, [0.0, 0.0, 1.0]);
    }
}
