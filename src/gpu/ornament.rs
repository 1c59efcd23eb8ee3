//! Instanced ornament layers and the accents (trunk, star, pedestal).
//!
//! One pipeline, one mesh per layer. Instance buffers are sized once to the
//! layer's capacity and overwritten every frame with `queue.write_buffer`.

use wgpu::util::DeviceExt;

use super::mesh::{self, MeshData, MeshVertex};
use super::pipeline::{checked_buffer_size, scene_pipeline, UniformBinding};
use crate::error::GpuError;
use crate::accent::{self, Accents};
use crate::ornament::{OrnamentField, OrnamentFrame, OrnamentInstance, OrnamentKind};
use crate::shader::{SceneUniforms, ORNAMENT_SOURCE};

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
];

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4, // model col 0
    3 => Float32x4, // model col 1
    4 => Float32x4, // model col 2
    5 => Float32x4, // model col 3
    6 => Float32x4, // color + emissive
];

/// Ball, gift and light layers, then the accents.
const TRUNK_LAYER: usize = 3;
const STAR_LAYER: usize = 4;
const PEDESTAL_LAYER: usize = 5;

/// A mesh drawn `count` times from a fixed-capacity instance buffer.
struct InstancedMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: Option<wgpu::Buffer>,
    capacity: u32,
    count: u32,
}

impl InstancedMesh {
    fn new(device: &wgpu::Device, label: &'static str, mesh: &MeshData, capacity: u32) -> Result<Self, GpuError> {
        let instance_bytes =
            checked_buffer_size::<OrnamentInstance>(label, capacity as usize, device.limits().max_buffer_size)?;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = (capacity > 0).then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} Instance Buffer")),
                size: instance_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            instance_buffer,
            capacity,
            count: 0,
        })
    }

    /// Upload up to `capacity` instances; anything beyond is dropped.
    fn write(&mut self, queue: &wgpu::Queue, instances: &[OrnamentInstance]) {
        let Some(buffer) = &self.instance_buffer else {
            return;
        };
        let n = instances.len().min(self.capacity as usize);
        if n > 0 {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&instances[..n]));
        }
        self.count = n as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        match &self.instance_buffer {
            Some(instances) if self.count > 0 => {
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, instances.slice(..));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.index_count, 0, 0..self.count);
            }
            _ => {}
        }
    }
}

/// GPU state for ornaments and accents.
pub struct OrnamentPass {
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBinding<SceneUniforms>,
    layers: Vec<InstancedMesh>,
}

impl OrnamentPass {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, field: &OrnamentField) -> Result<Self, GpuError> {
        let uniforms = UniformBinding::new(device, "Ornament", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let pipeline = scene_pipeline(
            device,
            "Ornament",
            ORNAMENT_SOURCE,
            &uniforms.layout,
            &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &MESH_ATTRIBUTES,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<OrnamentInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                },
            ],
            format,
            wgpu::BlendState::REPLACE,
        );

        let layers = vec![
            InstancedMesh::new(device, "Ball", &mesh::sphere(1.0, 24, 12), field.count(OrnamentKind::Ball))?,
            InstancedMesh::new(device, "Gift", &mesh::cube(0.5), field.count(OrnamentKind::Gift))?,
            InstancedMesh::new(device, "Light", &mesh::sphere(1.0, 12, 6), field.count(OrnamentKind::Light))?,
            InstancedMesh::new(
                device,
                "Trunk",
                &mesh::cylinder(accent::TRUNK_BOTTOM_RADIUS, accent::TRUNK_TOP_RADIUS, 1.0, 16),
                1,
            )?,
            InstancedMesh::new(
                device,
                "Star",
                &mesh::star(
                    accent::STAR_POINTS,
                    accent::STAR_OUTER_RADIUS,
                    accent::STAR_INNER_RADIUS,
                    accent::STAR_DEPTH,
                ),
                1,
            )?,
            InstancedMesh::new(
                device,
                "Pedestal",
                &mesh::cylinder(
                    accent::PEDESTAL_BOTTOM_RADIUS,
                    accent::PEDESTAL_TOP_RADIUS,
                    accent::PEDESTAL_HEIGHT,
                    32,
                ),
                1,
            )?,
        ];

        log::debug!(
            "Ornament layers allocated: {:?}",
            layers.iter().map(|l| l.capacity).collect::<Vec<_>>()
        );

        Ok(Self {
            pipeline,
            uniforms,
            layers,
        })
    }

    /// Upload this frame's camera, ornament instances and accents.
    pub fn update(&mut self, queue: &wgpu::Queue, uniforms: &SceneUniforms, frame: &OrnamentFrame, accents: &Accents) {
        self.uniforms.write(queue, uniforms);

        for kind in OrnamentKind::ALL {
            self.layers[kind.layer()].write(queue, frame.layer(kind));
        }
        self.layers[TRUNK_LAYER].write(queue, accents.trunk.as_slice());
        self.layers[STAR_LAYER].write(queue, accents.star.as_slice());
        self.layers[PEDESTAL_LAYER].write(queue, std::slice::from_ref(&accents.pedestal));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniforms.bind_group, &[]);
        for layer in &self.layers {
            layer.draw(pass);
        }
    }
}
