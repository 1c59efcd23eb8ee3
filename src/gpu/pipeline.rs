//! Setup shared by the foliage and ornament stages.
//!
//! Both stages draw into the same depth-tested scene pass with a single
//! uniform block at group 0, so they differ only in shader, vertex layout
//! and blending.

use std::marker::PhantomData;

use super::DEPTH_FORMAT;
use crate::error::GpuError;

/// Byte size of `count` elements of `T`, or an error if one buffer cannot hold them.
pub(crate) fn checked_buffer_size<T>(label: &'static str, count: usize, limit: u64) -> Result<u64, GpuError> {
    let size = (count as u64).saturating_mul(std::mem::size_of::<T>() as u64);
    if size > limit {
        return Err(GpuError::BufferTooLarge { label, size, limit });
    }
    Ok(size)
}

/// A uniform buffer of `T` plus the bind group exposing it at binding 0.
pub(crate) struct UniformBinding<T> {
    buffer: wgpu::Buffer,
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformBinding<T> {
    pub fn new(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Uniforms")),
            size: std::mem::size_of::<T>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} Uniform Layout")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Uniform Group")),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

/// Depth-writing triangle pipeline with `vs_main` and `fs_main` entry points.
pub(crate) fn scene_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    uniforms: &wgpu::BindGroupLayout,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[uniforms],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Triangle list, no culling: sprites and flat star faces are seen from both sides
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}
