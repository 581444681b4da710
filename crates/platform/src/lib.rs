//! Platform layer: windowing & event loop.
//!
//! Owns the wiring between the pieces: winit events feed the gesture
//! controller, the loader is polled once per frame, and completed loads
//! (or their fallback) are installed into the scene runtime.

use std::sync::Arc;

use anyhow::Result;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    window::Window,
};

use corelib::view::ViewState;
use loader::{ModelLoader, ModelSource};
use renderer::{GpuState, SceneRuntime};

pub mod gesture;
pub mod input;

pub use renderer::RendererError;

const WINDOW_TITLE: &str = "MeshView";

pub struct ViewerConfig {
    pub model_url: String,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
}

/// Run the viewer until the window is closed.
pub fn run(config: ViewerConfig) -> Result<()> {
    let event_loop: EventLoop<()> =
        EventLoop::new().map_err(|e| anyhow::anyhow!("Failed to create event loop: {e:?}"))?;

    let window = Arc::new(
        event_loop.create_window(
            Window::default_attributes()
                .with_title(format!("{WINDOW_TITLE} — loading…"))
                .with_inner_size(PhysicalSize::new(config.width.max(1), config.height.max(1))),
        )?,
    );

    log::info!(
        "Window created: {}x{}",
        window.inner_size().width,
        window.inner_size().height
    );

    // Renderer acquisition failures are fatal to the 3D path; the caller
    // is expected to fall back to a non-3D presentation.
    let mut runtime = pollster::block_on(SceneRuntime::new(window.clone(), config.backends))?;
    let mut loader = ModelLoader::new()?;
    let mut view = ViewState::default();
    let mut input = input::InputState::new();

    loader.load(&config.model_url);

    event_loop
        .run(move |event, window_target| {
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        log::info!("Close requested. Exiting event loop.");
                        runtime.teardown();
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        log::debug!("Resized: {}x{}", new_size.width, new_size.height);
                        runtime.resize(new_size.width, new_size.height);
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        log::debug!("Scale factor changed: {:.3}", scale_factor);
                    }
                    WindowEvent::Touch(touch) => {
                        input.handle_touch(touch, &mut view);
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        input.handle_mouse_button(state, button, &mut view);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        input.handle_cursor_moved(position.x, position.y, &mut view);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        input.handle_scroll(delta, &mut view);
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed {
                            input.handle_key(&event.logical_key, &mut view);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        // The frame loop doubles as the loader poll point:
                        // a completed load replaces the installed mesh.
                        if let Some(model) = loader.poll() {
                            match model.source {
                                ModelSource::Remote => {
                                    window.set_title(WINDOW_TITLE);
                                }
                                ModelSource::Fallback => {
                                    window.set_title(&format!("{WINDOW_TITLE} — placeholder"));
                                }
                            }
                            runtime.install_mesh(&model.mesh);
                        }

                        match runtime.frame(&mut view) {
                            Ok(()) => {}
                            Err(err) if GpuState::is_surface_lost(&err) => {
                                log::warn!("Surface lost/outdated; recreating.");
                                runtime.recreate_surface();
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of GPU memory. Exiting.");
                                runtime.teardown();
                                window_target.exit();
                            }
                            Err(err) => {
                                log::warn!("Frame skipped: {err:?}");
                            }
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    // Continuous redraws drive both animation and polling.
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    Ok(())
}
