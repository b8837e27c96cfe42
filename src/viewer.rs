//! Windowed interactive viewer.
//!
//! Wires the pieces together: a winit window, the wgpu grid renderer, the
//! orbit camera, and the drag controller over the mass registry. Left-drag
//! on a mass handle moves it; left-drag on empty space orbits the camera;
//! right-drag pans; the scroll wheel zooms. Camera gestures are suppressed
//! while a mass is being dragged.
//!
//! # Example
//!
//! ```ignore
//! use warpgrid::config::SceneConfig;
//! use warpgrid::viewer::Viewer;
//!
//! fn main() -> Result<(), warpgrid::error::ViewerError> {
//!     Viewer::new(SceneConfig::default()).run()
//! }
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::OrbitCamera;
use crate::config::SceneConfig;
use crate::error::ViewerError;
use crate::gpu::GpuState;
use crate::input::{PointerButton, PointerInput};
use crate::interaction::DragController;
use crate::registry::MassRegistry;

const ORBIT_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.02;
const ZOOM_SENSITIVITY: f32 = 0.8;

/// The interactive sandbox window.
pub struct Viewer {
    scene: SceneConfig,
}

impl Viewer {
    /// Create a viewer for the given scene configuration.
    pub fn new(scene: SceneConfig) -> Self {
        Self { scene }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.scene);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: SceneConfig,
    registry: MassRegistry,
    camera: OrbitCamera,
    controller: DragController,
    input: PointerInput,
    /// Left button went down over empty space, so it drives the camera.
    orbiting: bool,
    #[cfg(feature = "egui")]
    egui: Option<crate::panel::EguiIntegration>,
    #[cfg(feature = "egui")]
    panel: crate::panel::ControlPanel,
}

impl App {
    fn new(scene: SceneConfig) -> Self {
        Self {
            window: None,
            gpu: None,
            registry: MassRegistry::new(scene.mass),
            camera: OrbitCamera::new(scene.camera),
            controller: DragController::new(&scene),
            input: PointerInput::new(),
            orbiting: false,
            #[cfg(feature = "egui")]
            egui: None,
            #[cfg(feature = "egui")]
            panel: crate::panel::ControlPanel::new(&scene),
            scene,
        }
    }

    fn aspect(&self) -> f32 {
        self.gpu
            .as_ref()
            .map(|gpu| gpu.config.width as f32 / gpu.config.height as f32)
            .unwrap_or(16.0 / 9.0)
    }

    /// Apply this frame's accumulated camera gestures. Suppressed entirely
    /// while a mass drag is in progress.
    fn apply_camera_gestures(&mut self) {
        if self.registry.is_dragging() {
            return;
        }
        let delta = self.input.delta();
        if self.orbiting {
            self.camera
                .orbit(-delta.x * ORBIT_SENSITIVITY, delta.y * ORBIT_SENSITIVITY);
        } else if self.input.held(PointerButton::Right) {
            self.camera.pan(delta * PAN_SENSITIVITY);
        }
        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            self.camera.zoom(scroll * ZOOM_SENSITIVITY);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_camera_gestures();

        // Frame boundary: flush at most one buffered drag commit.
        self.controller.frame_tick(&mut self.registry);

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.sync_masses(self.registry.masses());
        gpu.sync_handles(
            self.registry.masses(),
            self.registry.selected(),
            self.controller.hovered(),
            self.controller.drag_position(),
        );

        #[cfg(feature = "egui")]
        let result = {
            match (&mut self.egui, &self.window) {
                (Some(egui), Some(window)) => {
                    egui.begin_frame(window);
                    self.panel.ui(&egui.ctx, &mut self.registry);
                    let frame = egui.end_frame(window);
                    gpu.render_with_panel(&self.camera, egui, frame)
                }
                _ => gpu.render(&self.camera),
            }
        };
        #[cfg(not(feature = "egui"))]
        let result = gpu.render(&self.camera);

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                width: gpu.config.width,
                height: gpu.config.height,
            }),
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => eprintln!("Render error: {:?}", e),
        }

        self.input.begin_frame();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Warpgrid - Spacetime Curvature Sandbox")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);

        match pollster::block_on(GpuState::new(window.clone(), self.scene)) {
            Ok(gpu) => {
                #[cfg(feature = "egui")]
                {
                    self.egui = Some(crate::panel::EguiIntegration::new(
                        gpu.device(),
                        gpu.config.format,
                        &window,
                    ));
                }
                self.gpu = Some(gpu);
                self.window = Some(window);
            }
            Err(e) => {
                eprintln!("Failed to initialize GPU: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        {
            if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
                if egui.on_window_event(window, &event) {
                    return;
                }
            }
        }

        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    let ray = self.camera.screen_ray(self.input.ndc(), self.aspect());
                    let consumed = self.controller.pointer_down(ray, &mut self.registry);
                    self.orbiting = !consumed;
                }
                ElementState::Released => {
                    self.controller.pointer_up(&mut self.registry);
                    self.orbiting = false;
                }
            },
            WindowEvent::CursorMoved { .. } => {
                let ray = self.camera.screen_ray(self.input.ndc(), self.aspect());
                self.controller.pointer_move(ray, &self.registry);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}
