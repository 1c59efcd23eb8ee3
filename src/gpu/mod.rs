//! Window surface, device and the two render stages.

mod camera;
mod foliage;
pub mod mesh;
mod ornament;
#[cfg(feature = "egui")]
mod overlay;
mod pipeline;

use std::sync::Arc;

use glam::Vec2;
use winit::window::Window;

pub use camera::Camera;
pub use foliage::FoliagePass;
pub use ornament::OrnamentPass;
#[cfg(feature = "egui")]
pub use overlay::EguiOverlay;

use crate::accent::Accents;
use crate::error::GpuError;
use crate::foliage::FoliageParticle;
use crate::ornament::{OrnamentField, OrnamentFrame};
use crate::shader::{FoliageUniforms, SceneUniforms};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Night sky behind the tree (linear).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0015,
    g: 0.004,
    b: 0.003,
    a: 1.0,
};

/// Everything that changes between frames.
pub struct FrameData<'a> {
    pub progress: f32,
    pub time: f32,
    pub ornaments: &'a OrnamentFrame,
    pub accents: &'a Accents,
}

/// Extra drawing on top of the finished scene, such as a UI overlay.
pub trait OverlayPass {
    fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size: [u32; 2],
    );
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    foliage: FoliagePass,
    ornaments: OrnamentPass,
    pub camera: Camera,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        particles: &[FoliageParticle],
        field: &OrnamentField,
        camera: Camera,
    ) -> Result<Self, GpuError> {
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

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    // Large needle counts need whatever single-buffer size the adapter offers
                    required_limits: wgpu::Limits {
                        max_buffer_size: adapter.limits().max_buffer_size,
                        ..wgpu::Limits::default().using_resolution(adapter.limits())
                    },
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let config = surface_config(&surface.get_capabilities(&adapter), size);
        surface.configure(&device, &config);

        let depth_view = depth_view_for(&device, &config);

        let foliage = FoliagePass::new(&device, config.format, particles)?;
        let ornaments = OrnamentPass::new(&device, config.format, field)?;
        log::info!(
            "GPU ready: {:?}, {}x{}, {} needles",
            config.format,
            config.width,
            config.height,
            foliage.num_particles()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            foliage,
            ornaments,
            camera,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = depth_view_for(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size after a lost or outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn update_uniforms(&mut self, frame: &FrameData<'_>) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = self.camera.view_matrix();
        let proj = self.camera.projection_matrix(aspect);
        let viewport = Vec2::new(self.config.width as f32, self.config.height as f32);

        self.foliage.update(
            &self.queue,
            &FoliageUniforms::new(view, proj, viewport, frame.progress, frame.time),
        );
        self.ornaments.update(
            &self.queue,
            &SceneUniforms::new(proj * view, self.camera.position()),
            frame.ornaments,
            frame.accents,
        );
    }

    pub fn render(
        &mut self,
        frame: &FrameData<'_>,
        overlay: Option<&mut dyn OverlayPass>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(frame);

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame") });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Opaque meshes first so needles blend over them
            self.ornaments.draw(&mut pass);
            self.foliage.draw(&mut pass);
        }

        if let Some(overlay) = overlay {
            overlay.encode(
                &self.device,
                &self.queue,
                &mut encoder,
                &view,
                [self.config.width, self.config.height],
            );
        }

        self.queue.submit([encoder.finish()]);
        surface_texture.present();

        Ok(())
    }
}

/// Prefer an sRGB format so the shaders can output linear colour.
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    size: winit::dpi::PhysicalSize<u32>,
) -> wgpu::SurfaceConfiguration {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| caps.formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps.alpha_modes.first().copied().unwrap_or_default(),
        view_formats: Vec::new(),
        desired_maximum_frame_latency: 2,
    }
}

fn depth_view_for(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Scene Depth"),
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
    depth.create_view(&Default::default())
}
