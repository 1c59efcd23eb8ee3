//! Foliage shading functions on the CPU.
//!
//! These mirror `shaders/foliage.wgsl` line for line. The GPU never calls
//! them; they exist so the needle stage has a testable reference and so host
//! code (tests, benches) can reason about where a needle is and
//! what it looks like without reading back GPU memory.
//!
//! Inputs are the narrow uniform set the shader sees: progress, time and the
//! camera's view transform.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::color;

pub use crate::color::saturate;

/// Pixel size of a needle sprite one unit in front of the camera.
pub const BASE_POINT_SIZE: f32 = 52.0;
/// View depth at which needles are fully transparent.
pub const FADE_DEPTH: f32 = 75.0;
/// Lobes in the needle cluster.
pub const NEEDLE_COUNT: u32 = 6;
/// Needle intensity below which a fragment is discarded.
pub const NEEDLE_CUTOFF: f32 = 0.05;
/// Scale from the unit rotation random to an angle. Kept at the shader's 6.28.
pub const ROTATION_SCALE: f32 = 6.28;

/// Shader-style `smoothstep`, including reversed edges (`e0 > e1`).
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Position between the chaos and tree layouts.
#[inline]
pub fn blend_position(chaos: Vec3, target: Vec3, progress: f32) -> Vec3 {
    chaos.lerp(target, progress)
}

/// Branch sway added to x and z. Two sine layers, silent while dispersed.
#[inline]
pub fn sway_offset(position: Vec3, time: f32, progress: f32) -> f32 {
    let slow = (time * 0.5 + position.y * 0.2).sin() * 0.1;
    let fast = (time * 1.2 + position.x * 0.5).sin() * 0.05;
    (slow + fast) * progress
}

/// World position of a needle this frame.
pub fn needle_world_position(chaos: Vec3, target: Vec3, progress: f32, time: f32) -> Vec3 {
    let mut p = blend_position(chaos, target, progress);
    let sway = sway_offset(p, time, progress);
    p.x += sway;
    p.z += sway;
    p
}

/// Sprite size in pixels for a view-space depth (negative in front of the camera).
#[inline]
pub fn point_size(view_z: f32, size_jitter: f32) -> f32 {
    (BASE_POINT_SIZE / -view_z) * (0.8 + size_jitter * 0.4)
}

/// Distance fade multiplied by progress. Zero in the chaos state.
#[inline]
pub fn depth_alpha(view_z: f32, progress: f32) -> f32 {
    smoothstep(-FADE_DEPTH, 0.0, view_z) * progress
}

/// Everything the vertex stage hands to the fragment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedleVertex {
    pub world: Vec3,
    pub view_z: f32,
    pub size: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub saturation: f32,
}

/// Vertex stage for one needle.
pub fn shade_vertex(
    chaos: Vec3,
    target: Vec3,
    randoms: Vec3,
    progress: f32,
    time: f32,
    view: &Mat4,
) -> NeedleVertex {
    let world = needle_world_position(chaos, target, progress, time);
    let view_pos: Vec4 = *view * world.extend(1.0);
    NeedleVertex {
        world,
        view_z: view_pos.z,
        size: point_size(view_pos.z, randoms.y),
        alpha: depth_alpha(view_pos.z, progress),
        rotation: randoms.x * ROTATION_SCALE,
        saturation: randoms.z,
    }
}

#[inline]
fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Brightness of the needle cluster at sprite coordinate `uv` in `[-0.5, 0.5]²`.
///
/// The sprite is rotated by `rotation`, then six thin lobes fan out from the
/// centre, each slightly curved and tapered towards its tip. The result is the
/// brightest lobe at that pixel.
pub fn needle_intensity(uv: Vec2, rotation: f32) -> f32 {
    let r_uv = rotate(uv, rotation);
    let mut intensity: f32 = 0.0;

    for i in 0..NEEDLE_COUNT {
        let angle = i as f32 * (ROTATION_SCALE / NEEDLE_COUNT as f32) + rotation * 0.2;
        let n_uv = rotate(r_uv, angle);

        let curvature = n_uv.y * n_uv.y * 0.8 * (rotation - 0.5);
        let dx = (n_uv.x - curvature).abs();

        let mut needle = smoothstep(0.1, 0.0, dx * 15.0 + n_uv.y.abs() * 0.8);
        needle *= smoothstep(0.5, 0.3, n_uv.y.abs());

        intensity = intensity.max(needle);
    }

    intensity
}

/// Fragment stage for one sprite pixel. `None` means the pixel is discarded.
pub fn shade_fragment(uv: Vec2, base_color: Vec3, vertex: &NeedleVertex) -> Option<Vec4> {
    let intensity = needle_intensity(uv, vertex.rotation);
    if intensity < NEEDLE_CUTOFF {
        return None;
    }

    // Fully transparent needles must not write depth
    let alpha = vertex.alpha * intensity;
    if alpha <= 0.0 {
        return None;
    }

    let shifted = saturate(base_color, 0.8 + vertex.saturation * 0.5);
    let rgb = shifted * (0.7 + intensity * 0.3);
    Some(rgb.extend(alpha))
}
