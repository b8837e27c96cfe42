//! wgpu rendering state for the grid surface and the mass handles.
//!
//! Owns the surface, device, queue, and two pipelines: the grid pipeline
//! built from the generated warp shader, and the instanced handle pipeline
//! drawing one skinned sphere per mass. The grid mesh is tessellated on
//! the CPU and deformed in the vertex shader; when the adaptive resolution
//! changes with the mass count, the vertex and index buffers are rebuilt.
//! Handle skins live in a fixed texture array with one layer per mass
//! slot, regenerated only when a slot's occupant changes.

use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::config::SceneConfig;
use crate::error::GpuError;
use crate::grid::{adaptive_resolution, GridMesh};
use crate::handles::{self, HandleInstance, HandleVertex, SphereMesh, SPHERE_SEGMENTS};
use crate::mass::{Mass, MassCategory, MassId};
use crate::shader::{generate_grid_shader, GridUniforms, HANDLE_SHADER, MAX_UNIFORM_MASSES};
use crate::textures::SkinCache;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Edge length of each handle skin texture layer.
const SKIN_SIZE: u32 = 64;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    uniforms: GridUniforms,
    scene: SceneConfig,
    resolution: u32,
    handle_pipeline: wgpu::RenderPipeline,
    handle_vertex_buffer: wgpu::Buffer,
    handle_index_buffer: wgpu::Buffer,
    handle_index_count: u32,
    handle_instance_buffer: wgpu::Buffer,
    handle_instance_count: u32,
    handle_bind_group: wgpu::BindGroup,
    skin_texture: wgpu::Texture,
    /// Occupant of each skin layer, so uploads happen only on change.
    skin_slots: Vec<Option<(MassId, MassCategory)>>,
    skin_cache: SkinCache,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, scene: SceneConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        // The registry seeds a single mass, so start at the lowest tier.
        let resolution =
            adaptive_resolution(1, scene.grid.base_resolution, &scene.grid.tiers);
        let mesh = GridMesh::plane(scene.grid.size, resolution);
        let (vertex_buffer, index_buffer) = create_mesh_buffers(&device, &mesh);
        let index_count = mesh.indices.len() as u32;

        let uniforms = GridUniforms::new();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Grid Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Grid Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader_source =
            generate_grid_shader(&scene.warp.formula, scene.warp.r_min, scene.warp.max_masses);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Grid Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Grid Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Grid Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The surface is viewed from both sides once it deforms.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sphere = SphereMesh::uv(scene.mass.sphere_radius, SPHERE_SEGMENTS);
        let handle_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Handle Vertex Buffer"),
            contents: bytemuck::cast_slice(&sphere.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let handle_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Handle Index Buffer"),
            contents: bytemuck::cast_slice(&sphere.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let handle_index_count = sphere.indices.len() as u32;

        let handle_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Handle Instance Buffer"),
            size: (MAX_UNIFORM_MASSES * std::mem::size_of::<HandleInstance>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let skin_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Handle Skin Texture"),
            size: wgpu::Extent3d {
                width: SKIN_SIZE,
                height: SKIN_SIZE,
                depth_or_array_layers: MAX_UNIFORM_MASSES as u32,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let skin_view = skin_texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let skin_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Handle Skin Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let handle_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Handle Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let handle_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Handle Bind Group"),
            layout: &handle_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&skin_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&skin_sampler),
                },
            ],
        });

        let handle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Handle Shader"),
            source: wgpu::ShaderSource::Wgsl(HANDLE_SHADER.into()),
        });

        let handle_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Handle Pipeline Layout"),
                bind_group_layouts: &[&handle_bind_group_layout],
                push_constant_ranges: &[],
            });

        let handle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Handle Pipeline"),
            layout: Some(&handle_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &handle_shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<HandleVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 0,
                                format: wgpu::VertexFormat::Float32x3,
                            },
                            wgpu::VertexAttribute {
                                offset: 12,
                                shader_location: 1,
                                format: wgpu::VertexFormat::Float32x2,
                            },
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<HandleInstance>()
                            as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 2,
                                format: wgpu::VertexFormat::Float32x4,
                            },
                            wgpu::VertexAttribute {
                                offset: 16,
                                shader_location: 3,
                                format: wgpu::VertexFormat::Float32x3,
                            },
                            wgpu::VertexAttribute {
                                offset: 28,
                                shader_location: 4,
                                format: wgpu::VertexFormat::Uint32,
                            },
                        ],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &handle_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            index_count,
            uniform_buffer,
            uniform_bind_group,
            depth_texture,
            uniforms,
            scene,
            resolution,
            handle_pipeline,
            handle_vertex_buffer,
            handle_index_buffer,
            handle_index_count,
            handle_instance_buffer,
            handle_instance_count: 0,
            handle_bind_group,
            skin_texture,
            skin_slots: vec![None; MAX_UNIFORM_MASSES],
            skin_cache: SkinCache::new(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Current grid subdivision count.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Upload the current mass list, rebuilding the grid mesh when the
    /// adaptive resolution tier changes.
    pub fn sync_masses(&mut self, masses: &[Mass]) {
        self.uniforms.write_masses(masses, self.scene.warp.max_masses);

        let resolution = adaptive_resolution(
            masses.len(),
            self.scene.grid.base_resolution,
            &self.scene.grid.tiers,
        );
        if resolution != self.resolution {
            let mesh = GridMesh::plane(self.scene.grid.size, resolution);
            let (vertex_buffer, index_buffer) = create_mesh_buffers(&self.device, &mesh);
            self.vertex_buffer = vertex_buffer;
            self.index_buffer = index_buffer;
            self.index_count = mesh.indices.len() as u32;
            self.resolution = resolution;
        }
    }

    /// Upload this frame's handle instances and refresh skin layers whose
    /// occupant changed.
    ///
    /// `live` is the controller's buffered drag position; the dragged
    /// sphere follows it instead of the registry, so visual feedback is
    /// not throttled with the commits.
    pub fn sync_handles(
        &mut self,
        masses: &[Mass],
        selected: Option<MassId>,
        hovered: Option<MassId>,
        live: Option<(MassId, Vec2)>,
    ) {
        let instances =
            handles::build_handle_instances(masses, &self.scene.mass, selected, hovered, live);
        if !instances.is_empty() {
            self.queue.write_buffer(
                &self.handle_instance_buffer,
                0,
                bytemuck::cast_slice(&instances),
            );
        }
        self.handle_instance_count = instances.len() as u32;

        for (slot, mass) in masses.iter().take(MAX_UNIFORM_MASSES).enumerate() {
            let category = handles::skin_category(mass);
            if self.skin_slots[slot] == Some((mass.id, category)) {
                continue;
            }
            let skin = self.skin_cache.get(category, SKIN_SIZE, mass.id.raw());
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.skin_texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: slot as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                &skin.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * SKIN_SIZE),
                    rows_per_image: Some(SKIN_SIZE),
                },
                wgpu::Extent3d {
                    width: SKIN_SIZE,
                    height: SKIN_SIZE,
                    depth_or_array_layers: 1,
                },
            );
            self.skin_slots[slot] = Some((mass.id, category));
        }
    }

    fn update_uniforms(&mut self, camera: &OrbitCamera) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        self.uniforms.set_view_proj(camera.view_proj(aspect));
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );
    }

    fn scene_pass(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.01,
                        g: 0.01,
                        b: 0.03,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);

        if self.handle_instance_count > 0 {
            render_pass.set_pipeline(&self.handle_pipeline);
            render_pass.set_bind_group(0, &self.handle_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.handle_vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.handle_instance_buffer.slice(..));
            render_pass
                .set_index_buffer(self.handle_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.handle_index_count, 0, 0..self.handle_instance_count);
        }
    }

    pub fn render(&mut self, camera: &OrbitCamera) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(camera);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.scene_pass(&mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Render the grid, then the control panel on top.
    #[cfg(feature = "egui")]
    pub fn render_with_panel(
        &mut self,
        camera: &OrbitCamera,
        egui: &mut crate::panel::EguiIntegration,
        frame: crate::panel::EguiFrameOutput,
    ) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(camera);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.scene_pass(&mut encoder, &view);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: frame.pixels_per_point,
        };
        egui.prepare(&self.device, &self.queue, &mut encoder, &frame, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            egui.renderer()
                .render(&mut render_pass, &frame.paint_jobs, &screen_descriptor);
        }

        egui.cleanup(&frame);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_mesh_buffers(device: &wgpu::Device, mesh: &GridMesh) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Grid Vertex Buffer"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Grid Index Buffer"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    (vertex_buffer, index_buffer)
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
