//! Optional egui control panel.
//!
//! Available when the `egui` feature is enabled. The panel mirrors the
//! registry: add a mass at a random free spot, reset the scene, and per
//! mass pick a category, tune the magnitude (custom bodies only; preset
//! categories pin their magnitude), or remove it.

use std::sync::Arc;

use rand::thread_rng;
use winit::window::Window;

use crate::config::SceneConfig;
use crate::mass::MassCategory;
use crate::registry::MassRegistry;

/// Egui integration state.
///
/// Wraps egui context, winit state, and wgpu renderer.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Output from egui frame processing.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiIntegration {
    /// Create new egui integration.
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: &Arc<Window>,
    ) -> Self {
        let ctx = egui::Context::default();

        // Dark theme fits the space scene.
        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Process a winit event.
    ///
    /// Returns true if egui consumed the event (don't pass to camera or
    /// drag controls).
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// Begin a new frame. Call before your UI code.
    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
    }

    /// End the frame and get the output for rendering.
    pub fn end_frame(&mut self, window: &Window) -> EguiFrameOutput {
        let full_output = self.ctx.end_pass();

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        EguiFrameOutput {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Prepare textures and buffers for rendering. Call before creating the
    /// render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        self.renderer
            .update_buffers(device, queue, encoder, &output.paint_jobs, screen_descriptor);
    }

    /// Get a reference to the renderer for direct rendering.
    pub fn renderer(&self) -> &egui_wgpu::Renderer {
        &self.renderer
    }

    /// Free textures after frame is done.
    pub fn cleanup(&mut self, output: &EguiFrameOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Control panel over the mass registry.
pub struct ControlPanel {
    safe_bounds: f32,
    max_masses: usize,
}

impl ControlPanel {
    pub fn new(scene: &SceneConfig) -> Self {
        Self {
            safe_bounds: scene.grid.safe_bounds,
            max_masses: scene.warp.max_masses,
        }
    }

    /// Draw the panel and apply edits to the registry.
    pub fn ui(&mut self, ctx: &egui::Context, registry: &mut MassRegistry) {
        egui::SidePanel::right("control_panel")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Masses");
                ui.label(format!("{} / {}", registry.len(), self.max_masses));
                ui.separator();

                ui.horizontal(|ui| {
                    let at_capacity = registry.len() >= self.max_masses;
                    if ui
                        .add_enabled(!at_capacity, egui::Button::new("Add Mass"))
                        .clicked()
                    {
                        let position =
                            MassRegistry::spawn_position(self.safe_bounds, &mut thread_rng());
                        registry.add(position, MassCategory::Custom);
                    }
                    if ui.button("Reset").clicked() {
                        registry.reset();
                    }
                });
                ui.separator();

                let ids: Vec<_> = registry.masses().iter().map(|m| m.id).collect();
                for id in ids {
                    let Some(mass) = registry.get(id) else {
                        continue;
                    };
                    let mut category = mass.category;
                    let mut magnitude = mass.magnitude;
                    let selected = registry.selected() == Some(id);
                    let range = registry.config().min..=registry.config().max;
                    let step = registry.config().step;
                    let mut removed = false;

                    ui.push_id(id.raw(), |ui| {
                        ui.horizontal(|ui| {
                            let label = if selected {
                                format!("> {}", category.label())
                            } else {
                                category.label().to_owned()
                            };
                            ui.label(label);
                            if ui.small_button("x").clicked() {
                                removed = true;
                            }
                        });

                        egui::ComboBox::from_id_salt("category")
                            .selected_text(category.label())
                            .show_ui(ui, |ui| {
                                for option in MassCategory::ALL {
                                    ui.selectable_value(&mut category, option, option.label());
                                }
                            });

                        // Preset categories pin their magnitude.
                        let editable = category == MassCategory::Custom;
                        ui.add_enabled(
                            editable,
                            egui::Slider::new(&mut magnitude, range)
                                .step_by(step as f64)
                                .text("magnitude"),
                        );
                        ui.separator();
                    });

                    if removed {
                        registry.remove(id);
                        continue;
                    }
                    if category != mass_category(registry, id) {
                        registry.update_category(id, category);
                    } else if (magnitude - mass_magnitude(registry, id)).abs() > f32::EPSILON {
                        registry.update_magnitude(id, magnitude);
                    }
                }
            });
    }
}

fn mass_category(registry: &MassRegistry, id: crate::mass::MassId) -> MassCategory {
    registry
        .get(id)
        .map(|m| m.category)
        .unwrap_or(MassCategory::Custom)
}

fn mass_magnitude(registry: &MassRegistry, id: crate::mass::MassId) -> f32 {
    registry.get(id).map(|m| m.magnitude).unwrap_or(0.0)
}
