// renderer.rs — 核心渲染器 (wgpu 模型渲染 + egui 叠加层)

use crate::camera::PerspectiveCamera;
use crate::error::ViewerError;
use crate::model::{ModelData, Vertex};
use crate::scene::Scene;
use crate::surface::{ContainerSize, FrameInput, RenderSurface, SurfaceProvider};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    sky: [f32; 4],
    ground: [f32; 4],
    directional_dir: [f32; 4],
    directional_color: [f32; 4],
    point_position: [f32; 4],
    point_color: [f32; 4],
}

fn rgbw([r, g, b]: [f32; 3], w: f32) -> [f32; 4] {
    [r, g, b, w]
}

impl SceneUniform {
    fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let lights = &scene.lights;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.position.extend(1.0).to_array(),
            ambient: rgbw(lights.ambient.color.linear(), lights.ambient.intensity),
            sky: rgbw(lights.hemisphere.sky.linear(), lights.hemisphere.intensity),
            ground: rgbw(lights.hemisphere.ground.linear(), 0.0),
            // 平行光从 position 照向原点
            directional_dir: lights.directional.position.normalize_or_zero().extend(0.0).to_array(),
            directional_color: rgbw(lights.directional.color.linear(), lights.directional.intensity),
            point_position: lights.point.position.extend(1.0).to_array(),
            point_color: rgbw(lights.point.color.linear(), lights.point.intensity),
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

fn create_depth_view(device: &wgpu::Device, size: PhysicalSize<u32>) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
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

struct GpuModel {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pixels_per_point: f32,
    render_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,

    // Uniform 资源
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    model: Option<GpuModel>,

    // UI
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, container: ContainerSize) -> Result<Self, ViewerError> {
        let size = container.physical();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = unsafe { instance.create_surface(window.as_ref()) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default().using_resolution(adapter.limits())
                    },
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo, // VSync on
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, size);

        // --- Uniform Setup ---
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::new(
                &Scene::default(),
                &PerspectiveCamera::new(container.aspect().unwrap_or(1.0)),
            )]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("scene_bind_group_layout"),
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        // --- Pipeline Setup ---
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader_scene.wgsl"));
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // glTF 模型常有双面材质
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
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // --- Egui Setup ---
        let egui_ctx = egui::Context::default();
        let mut egui_state = egui_winit::State::new(window.as_ref());
        // 高分屏：按容器的像素密度缩放 UI
        let pixels_per_point = container.scale_factor as f32;
        egui_state.set_pixels_per_point(pixels_per_point);

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        log::debug!(
            "render surface {}x{} ({:?}, {:?})",
            config.width,
            config.height,
            config.format,
            adapter.get_info().backend
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pixels_per_point,
            render_pipeline,
            depth_view,
            scene_buffer,
            scene_bind_group,
            model: None,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }
}

impl RenderSurface for Renderer {
    fn resize(&mut self, container: ContainerSize) {
        let new_size = container.physical();
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_size);
            self.pixels_per_point = container.scale_factor as f32;
            self.egui_state.set_pixels_per_point(self.pixels_per_point);
        }
    }

    fn set_model(&mut self, model: &ModelData) {
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Vertex Buffer"),
            contents: bytemuck::cast_slice(&model.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Index Buffer"),
            contents: bytemuck::cast_slice(&model.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.model = Some(GpuModel {
            vertex_buffer,
            index_buffer,
            index_count: model.indices.len() as u32,
        });
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui_state.on_event(&self.egui_ctx, event).consumed
    }

    fn render(
        &mut self,
        frame: &FrameInput<'_>,
        ui: &mut dyn FnMut(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::new(frame.scene, frame.camera)]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 1. Render Scene
        {
            let [r, g, b] = frame.scene.background.linear();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            // 模型还在加载时只画背景
            if let (Some(_), Some(model)) = (&frame.scene.model, &self.model) {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
                render_pass.set_vertex_buffer(0, model.vertex_buffer.slice(..));
                render_pass.set_index_buffer(model.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..model.index_count, 0, 0..1);
            }
        }

        // 2. Render UI
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| ui(ctx));

        self.egui_state
            .handle_platform_output(&self.window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Creates GPU surfaces inside the application window.
pub struct WindowSurfaces {
    window: Arc<Window>,
}

impl WindowSurfaces {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl SurfaceProvider for WindowSurfaces {
    type Surface = Renderer;

    fn create_surface(&mut self, size: ContainerSize) -> Result<Renderer, ViewerError> {
        pollster::block_on(Renderer::new(self.window.clone(), size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Preset;

    #[test]
    fn uniform_layout_is_uniform_friendly() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 192);
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn uniform_carries_preset_intensities() {
        let mut scene = Scene::new();
        scene.apply_preset(Preset::Dramatic);
        let camera = PerspectiveCamera::new(1.0);
        let u = SceneUniform::new(&scene, &camera);

        assert_eq!(u.ambient[3], 0.1);
        assert_eq!(u.sky[3], 0.0);
        assert_eq!(u.directional_color[3], 2.0);
        assert_eq!(u.point_color[3], 0.2);
        assert_eq!(u.point_position, [0.0, 5.0, 5.0, 1.0]);
        assert_eq!(u.eye, [0.0, 1.0, 3.0, 1.0]);
        assert_eq!(&u.ambient[..3], &[1.0, 1.0, 1.0]);

        let dir = glam::Vec3::new(u.directional_dir[0], u.directional_dir[1], u.directional_dir[2]);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((dir - glam::Vec3::new(5.0, 10.0, 10.0).normalize()).length() < 1e-5);
    }
}
