//! WGSL sources and the uniform blocks they read.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

pub const FOLIAGE_SOURCE: &str = include_str!("shaders/foliage.wgsl");
pub const ORNAMENT_SOURCE: &str = include_str!("shaders/ornament.wgsl");

/// `FoliageUniforms` in `foliage.wgsl` (144 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FoliageUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// Surface size in physical pixels.
    pub viewport: [f32; 2],
    pub progress: f32,
    pub time: f32,
}

impl FoliageUniforms {
    pub fn new(view: Mat4, proj: Mat4, viewport: Vec2, progress: f32, time: f32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            viewport: viewport.to_array(),
            progress,
            time,
        }
    }
}

/// `SceneUniforms` in `ornament.wgsl` (96 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Direction towards the key light, w unused.
    pub light_dir: [f32; 4],
}

impl SceneUniforms {
    /// Key light from the upper front right.
    pub const LIGHT_DIR: Vec3 = Vec3::new(0.4, 0.8, 0.5);

    pub fn new(view_proj: Mat4, camera_pos: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            light_dir: Self::LIGHT_DIR.normalize().extend(0.0).to_array(),
        }
    }
}

/// World-space normal for an ornament vertex, as `ornament.wgsl` computes it.
///
/// Instance matrices are always scale, rotation, translation, so the inverse
/// transpose of the upper 3x3 reduces to dividing by the squared column lengths.
pub fn world_normal(model: &Mat4, normal: Vec3) -> Vec3 {
    let cols = [model.x_axis.truncate(), model.y_axis.truncate(), model.z_axis.truncate()];
    let scale_sq = Vec3::new(cols[0].length_squared(), cols[1].length_squared(), cols[2].length_squared());
    let n = normal / scale_sq.max(Vec3::splat(1e-8));
    (cols[0] * n.x + cols[1] * n.y + cols[2] * n.z).normalize_or_zero()
}
