//! The main rendering engine.

use std::sync::Arc;

use glam::Vec3;
use neuroscope_core::{MeshGeometry, ViewerOptions};

use crate::buffer::{create_uniform_buffer, update_uniform_buffer};
use crate::camera::Camera;
use crate::color::clear_color;
use crate::error::{RenderError, RenderResult};
use crate::lights::LightUniforms;
use crate::materials::{Material, MaterialKind, MaterialRenderData};
use crate::mesh_render::{back_to_front, MeshInstance, MeshRenderData, MeshVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Camera uniforms for GPU.
/// Note: Layout must match WGSL `Camera` exactly (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniforms {
    /// Uniforms for the current state of `camera`.
    #[must_use]
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            _padding: 0.0,
        }
    }
}

/// Offscreen color target used by headless engines.
struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// The rendering engine backed by wgpu.
///
/// Owns every GPU resource of the scene; dropping the engine releases them.
pub struct RenderEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// The render surface (None for headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration (also describes the offscreen target).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Main camera.
    pub camera: Camera,
    /// Current viewport width.
    pub width: u32,
    /// Current viewport height.
    pub height: u32,
    /// Depth texture.
    pub depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    offscreen: Option<OffscreenTarget>,
    background: wgpu::Color,
    camera_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    /// Pipeline without back-face culling.
    double_sided_pipeline: wgpu::RenderPipeline,
    /// Pipeline with back-face culling.
    single_sided_pipeline: wgpu::RenderPipeline,
    neuron_material: MaterialRenderData,
    particle_material: MaterialRenderData,
    meshes: Vec<MeshRenderData>,
}

impl RenderEngine {
    /// Creates a render engine presenting to `window`.
    pub async fn new_windowed(
        window: Arc<winit::window::Window>,
        options: &ViewerOptions,
    ) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&device_descriptor("neuroscope device"))
            .await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "render engine ready: {} ({:?}), {width}x{height}, {surface_format:?}",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Self::from_parts(
            instance,
            adapter,
            device,
            queue,
            Some(surface),
            surface_config,
            options,
        ))
    }

    /// Creates a render engine drawing into an offscreen texture.
    pub async fn new_headless(width: u32, height: u32, options: &ViewerOptions) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&device_descriptor("neuroscope device (headless)"))
            .await?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: OFFSCREEN_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        log::info!(
            "headless render engine ready: {} ({:?}), {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_config.width,
            surface_config.height
        );

        Ok(Self::from_parts(
            instance,
            adapter,
            device,
            queue,
            None,
            surface_config,
            options,
        ))
    }

    fn from_parts(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
        options: &ViewerOptions,
    ) -> Self {
        let width = surface_config.width;
        let height = surface_config.height;

        let (depth_texture, depth_view) = Self::create_depth_texture(&device, width, height);
        let offscreen = surface
            .is_none()
            .then(|| Self::create_offscreen_target(&device, width, height));

        let mut camera = Camera::from_config(&options.camera, width as f32 / height as f32);
        camera.look_at(Vec3::ZERO);

        let camera_buffer = create_uniform_buffer(
            &device,
            &CameraUniforms::from_camera(&camera),
            Some("camera uniforms"),
        );
        let light_buffer = create_uniform_buffer(
            &device,
            &LightUniforms::new(&options.lights, &options.fog),
            Some("light uniforms"),
        );

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene bind group layout"),
                entries: &[
                    uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                    uniform_layout_entry(1, wgpu::ShaderStages::FRAGMENT),
                ],
            });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene bind group"),
            layout: &scene_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("material bind group layout"),
                entries: &[uniform_layout_entry(0, wgpu::ShaderStages::FRAGMENT)],
            });
        let neuron_material = MaterialRenderData::new(
            &device,
            &material_bind_group_layout,
            Material::from(&options.neuron_material),
        );
        let particle_material = MaterialRenderData::new(
            &device,
            &material_bind_group_layout,
            Material::from(&options.particle_material),
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &material_bind_group_layout],
            push_constant_ranges: &[],
        });
        let double_sided_pipeline = create_mesh_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_config.format,
            None,
            "mesh pipeline (double-sided)",
        );
        let single_sided_pipeline = create_mesh_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_config.format,
            Some(wgpu::Face::Back),
            "mesh pipeline (single-sided)",
        );

        Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            camera,
            width,
            height,
            depth_texture,
            depth_view,
            offscreen,
            background: clear_color(options.background_color),
            camera_buffer,
            scene_bind_group,
            double_sided_pipeline,
            single_sided_pipeline,
            neuron_material,
            particle_material,
            meshes: Vec::new(),
        }
    }

    /// Resizes the render targets. Zero-sized requests are ignored.
    ///
    /// The camera aspect ratio is left to the caller.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;

        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }
        if self.offscreen.is_some() {
            self.offscreen = Some(Self::create_offscreen_target(&self.device, width, height));
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(&self.device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_offscreen_target(device: &wgpu::Device, width: u32, height: u32) -> OffscreenTarget {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen color texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        OffscreenTarget { texture, view }
    }

    /// Uploads the current camera state.
    pub fn update_camera_uniforms(&self) {
        update_uniform_buffer(
            &self.queue,
            &self.camera_buffer,
            &CameraUniforms::from_camera(&self.camera),
        );
    }

    /// Uploads a mesh drawn once per entry of `offsets` (once in place when empty).
    pub fn add_mesh(&mut self, geometry: &MeshGeometry, material: MaterialKind, offsets: &[Vec3]) {
        self.meshes
            .push(MeshRenderData::new(&self.device, geometry, material, offsets));
    }

    /// Number of uploaded meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Drops every uploaded mesh and waits for the GPU to finish with them.
    pub fn release_scene(&mut self) {
        let released = self.meshes.len();
        self.meshes.clear();
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        log::info!("released {released} scene meshes");
    }

    /// Sets the emissive intensity of the neuron material.
    pub fn set_emissive_intensity(&mut self, intensity: f32) {
        self.neuron_material.material.emissive_intensity = intensity;
        self.neuron_material.sync(&self.queue);
    }

    fn material_data(&self, kind: MaterialKind) -> &MaterialRenderData {
        match kind {
            MaterialKind::Neuron => &self.neuron_material,
            MaterialKind::Particle => &self.particle_material,
        }
    }

    fn encode_scene(&self, view: &wgpu::TextureView) -> wgpu::CommandEncoder {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            let centers: Vec<Vec3> = self.meshes.iter().map(|mesh| mesh.center).collect();
            for index in back_to_front(&centers, self.camera.position) {
                let mesh = &self.meshes[index];
                let material = self.material_data(mesh.material);
                let pipeline = if material.material.double_sided {
                    &self.double_sided_pipeline
                } else {
                    &self.single_sided_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &material.bind_group, &[]);
                mesh.draw(&mut render_pass);
            }
        }

        encoder
    }

    /// Renders one frame to the window surface, or to the offscreen target
    /// of a headless engine.
    ///
    /// A lost or outdated surface is reconfigured and reported as
    /// [`RenderError::SurfaceLost`]; the caller may simply retry next frame.
    pub fn render_frame(&mut self) -> RenderResult<()> {
        self.update_camera_uniforms();

        let Some(surface) = self.surface.as_ref() else {
            let target = self.offscreen.as_ref().ok_or(RenderError::NoOffscreenTarget)?;
            let encoder = self.encode_scene(&target.view);
            self.queue.submit(std::iter::once(encoder.finish()));
            return Ok(());
        };

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&self.device, &self.surface_config);
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => return Err(RenderError::Timeout),
            Err(e) => return Err(RenderError::SurfaceError(e.to_string())),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.encode_scene(&view);
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Renders a frame offscreen and reads it back as tightly packed RGBA8
    /// rows (sRGB encoded, top row first).
    pub fn capture_frame(&mut self) -> RenderResult<Vec<u8>> {
        self.update_camera_uniforms();

        let target = self.offscreen.as_ref().ok_or(RenderError::NoOffscreenTarget)?;
        let bytes_per_row = aligned_bytes_per_row(self.width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.encode_scene(&target.view);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());
        rx.recv()
            .map_err(|_| RenderError::BufferMapFailed)?
            .map_err(|_| RenderError::BufferMapFailed)?;

        let data = buffer_slice.get_mapped_range();
        let pixels = unpad_rows(&data, self.width, self.height, bytes_per_row);
        drop(data);
        buffer.unmap();

        Ok(pixels)
    }
}

fn device_descriptor(label: &str) -> wgpu::DeviceDescriptor<'_> {
    wgpu::DeviceDescriptor {
        label: Some(label),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::default(),
        experimental_features: wgpu::ExperimentalFeatures::default(),
    }
}

fn uniform_layout_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    cull_mode: Option<wgpu::Face>,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout(), MeshInstance::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
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
    })
}

/// Row pitch of a texture-to-buffer copy of `width` RGBA8 texels.
#[must_use]
pub fn aligned_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strips copy padding from each row of a readback buffer.
#[must_use]
pub fn unpad_rows(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut result = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * bytes_per_row as usize;
        result.extend_from_slice(&data[start..start + row_bytes]);
    }
    result
}
