//! Instanced needle sprites.

use wgpu::util::DeviceExt;

use super::pipeline::{checked_buffer_size, scene_pipeline, UniformBinding};
use crate::error::GpuError;
use crate::foliage::FoliageParticle;
use crate::shader::{FoliageUniforms, FOLIAGE_SOURCE};

const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3, // chaos
    1 => Float32x3, // tree
    2 => Float32x3, // color
    3 => Float32x3, // randoms
];

/// GPU state for the foliage stage. Each needle is one instance of a
/// six-vertex quad expanded in the vertex shader.
pub struct FoliagePass {
    pipeline: wgpu::RenderPipeline,
    /// `None` when there are no needles; wgpu rejects empty vertex buffers.
    needles: Option<wgpu::Buffer>,
    count: u32,
    uniforms: UniformBinding<FoliageUniforms>,
}

impl FoliagePass {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        particles: &[FoliageParticle],
    ) -> Result<Self, GpuError> {
        checked_buffer_size::<FoliageParticle>("Foliage", particles.len(), device.limits().max_buffer_size)?;

        let uniforms = UniformBinding::new(device, "Foliage", wgpu::ShaderStages::VERTEX);
        let pipeline = scene_pipeline(
            device,
            "Foliage",
            FOLIAGE_SOURCE,
            &uniforms.layout,
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<FoliageParticle>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &ATTRIBUTES,
            }],
            format,
            wgpu::BlendState::ALPHA_BLENDING,
        );

        let needles = (!particles.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Foliage Needles"),
                contents: bytemuck::cast_slice(particles),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        Ok(Self {
            pipeline,
            needles,
            count: particles.len() as u32,
            uniforms,
        })
    }

    pub fn num_particles(&self) -> u32 {
        self.count
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &FoliageUniforms) {
        self.uniforms.write(queue, uniforms);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(needles) = &self.needles else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniforms.bind_group, &[]);
        pass.set_vertex_buffer(0, needles.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}
