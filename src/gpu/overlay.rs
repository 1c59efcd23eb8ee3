//! Status overlay drawn with egui (feature `egui`).
//!
//! UI is built during the frame tick with [`EguiOverlay::run`]; the
//! tessellated result waits here until the renderer calls
//! [`OverlayPass::encode`] after the scene pass.

use std::sync::Arc;
use winit::window::Window;

use super::OverlayPass;

struct PendingPaint {
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    pixels_per_point: f32,
}

pub struct EguiOverlay {
    pub ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pending: Option<PendingPaint>,
}

impl EguiOverlay {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Arc<Window>) -> Self {
        let ctx = egui::Context::default();
        let mut visuals = egui::Visuals::dark();
        visuals.window_shadow = egui::Shadow::NONE;
        ctx.set_visuals(visuals);

        let winit_state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        // No depth attachment, single sample, no dithering
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            ctx,
            winit_state,
            renderer,
            pending: None,
        }
    }

    /// Feed a window event to egui. True when egui wants it for itself.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// Build this frame's UI.
    pub fn run(&mut self, window: &Window, ui: impl FnMut(&egui::Context)) {
        let input = self.winit_state.take_egui_input(window);
        let output = self.ctx.run(input, ui);
        self.winit_state
            .handle_platform_output(window, output.platform_output);

        self.pending = Some(PendingPaint {
            primitives: self.ctx.tessellate(output.shapes, output.pixels_per_point),
            textures: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        });
    }
}

impl OverlayPass for EguiOverlay {
    fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size: [u32; 2],
    ) {
        let Some(paint) = self.pending.take() else {
            return;
        };
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: size,
            pixels_per_point: paint.pixels_per_point,
        };

        for (id, delta) in &paint.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &paint.primitives, &screen);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &paint.primitives, &screen);
        }

        for id in &paint.textures.free {
            self.renderer.free_texture(id);
        }
    }
}
