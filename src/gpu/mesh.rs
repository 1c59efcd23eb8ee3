//! Procedural meshes for the ornament layers and accents.
//!
//! Everything is centred on the origin at unit-ish size and placed by the
//! instance model matrix. Normals are per vertex, indices are `u32` triangle
//! lists. Winding is counter-clockwise from outside, though the pipeline
//! draws both faces.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// The normal is normalized; a zero normal stays zero.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        self.vertices.push(MeshVertex::new(position, normal));
        (self.vertices.len() - 1) as u32
    }

    /// Append a triangle by vertex index, counter-clockwise when seen from the front.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Flat quad `v0 v1 v2 v3` (counter-clockwise) with one normal.
    fn add_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let i0 = self.add_vertex(corners[0], normal);
        let i1 = self.add_vertex(corners[1], normal);
        let i2 = self.add_vertex(corners[2], normal);
        let i3 = self.add_vertex(corners[3], normal);
        self.add_triangle(i0, i1, i2);
        self.add_triangle(i0, i2, i3);
    }

    /// Indices to pass to `draw_indexed`.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// UV sphere with smooth normals.
///
/// `segments` around the equator (min 3), `rings` from pole to pole (min 2).
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let radius = radius.max(1e-3);
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = MeshData::new();

    for ring in 0..=rings {
        let phi = ring as f32 / rings as f32 * PI;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let dir = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            mesh.add_vertex(dir * radius, dir);
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let next = (seg + 1) % segments;
            let i0 = ring * segments + seg;
            let i1 = ring * segments + next;
            let i2 = (ring + 1) * segments + seg;
            let i3 = (ring + 1) * segments + next;
            mesh.add_triangle(i0, i1, i3);
            mesh.add_triangle(i0, i3, i2);
        }
    }

    mesh
}

/// Axis-aligned cube with flat normals, 24 vertices and 36 indices.
pub fn cube(half_extent: f32) -> MeshData {
    let s = half_extent.max(1e-3);
    let mut mesh = MeshData::new();

    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    ];

    for (normal, right, up) in faces {
        let centre = normal * s;
        let (r, u) = (right * s, up * s);
        mesh.add_quad([centre - r - u, centre + r - u, centre + r + u, centre - r + u], normal);
    }

    mesh
}

/// Capped cylinder or truncated cone along y, `height` tall and centred on the origin.
pub fn cylinder(radius_bottom: f32, radius_top: f32, height: f32, segments: u32) -> MeshData {
    let rb = radius_bottom.max(0.0);
    let rt = radius_top.max(0.0);
    let height = height.max(1e-3);
    let half = height * 0.5;
    let segments = segments.max(3);
    let mut mesh = MeshData::new();

    for i in 0..segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        // Side normal tilts up by the slope of the taper
        let normal = Vec3::new(cos * height, rb - rt, sin * height);
        mesh.add_vertex(Vec3::new(rb * cos, -half, rb * sin), normal);
        mesh.add_vertex(Vec3::new(rt * cos, half, rt * sin), normal);
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        let (b0, t0) = (i * 2, i * 2 + 1);
        let (b1, t1) = (next * 2, next * 2 + 1);
        mesh.add_triangle(b0, t0, t1);
        mesh.add_triangle(b0, t1, b1);
    }

    for (y, r, normal) in [(half, rt, Vec3::Y), (-half, rb, Vec3::NEG_Y)] {
        if r <= 0.0 {
            continue;
        }
        let centre = mesh.add_vertex(Vec3::new(0.0, y, 0.0), normal);
        let first = centre + 1;
        for i in 0..segments {
            let theta = i as f32 / segments as f32 * TAU;
            mesh.add_vertex(Vec3::new(r * theta.cos(), y, r * theta.sin()), normal);
        }
        for i in 0..segments {
            let a = first + i;
            let b = first + (i + 1) % segments;
            if normal.y > 0.0 {
                mesh.add_triangle(centre, b, a);
            } else {
                mesh.add_triangle(centre, a, b);
            }
        }
    }

    mesh
}

/// Outline of a star in the xy plane, starting at the top spike.
pub fn star_outline(points: u32, outer: f32, inner: f32) -> Vec<Vec2> {
    let points = points.max(2);
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = PI * 0.5 + i as f32 * PI / points as f32;
            Vec2::new(angle.cos(), angle.sin()) * r
        })
        .collect()
}

/// Extruded star, flat along z with `depth` thickness.
pub fn star(points: u32, outer: f32, inner: f32, depth: f32) -> MeshData {
    let outline = star_outline(points, outer.max(1e-3), inner.max(1e-3));
    let half = depth.max(0.0) * 0.5;
    let n = outline.len() as u32;
    let mut mesh = MeshData::new();

    // Front and back caps, fanned from the centre
    for (z, normal) in [(half, Vec3::Z), (-half, Vec3::NEG_Z)] {
        let centre = mesh.add_vertex(Vec3::new(0.0, 0.0, z), normal);
        for p in &outline {
            mesh.add_vertex(p.extend(z), normal);
        }
        for i in 0..n {
            let a = centre + 1 + i;
            let b = centre + 1 + (i + 1) % n;
            if z > 0.0 {
                mesh.add_triangle(centre, a, b);
            } else {
                mesh.add_triangle(centre, b, a);
            }
        }
    }

    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        let edge = b - a;
        let normal = Vec3::new(edge.y, -edge.x, 0.0);
        mesh.add_quad([a.extend(half), a.extend(-half), b.extend(-half), b.extend(half)], normal);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
        }
    }

    #[test]
    fn test_cube_counts() {
        let mesh = cube(0.5);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_well_formed(&mesh);
        for v in &mesh.vertices {
            assert!(Vec3::from(v.position).abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_sphere_points_on_radius() {
        let mesh = sphere(1.0, 24, 12);
        assert_eq!(mesh.vertices.len(), 13 * 24);
        assert_eq!(mesh.indices.len(), (12 * 24 * 6) as usize);
        assert_well_formed(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_taper() {
        let mesh = cylinder(0.8, 0.05, 1.0, 16);
        assert_well_formed(&mesh);
        let (mut top, mut bottom) = (0.0f32, 0.0f32);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let r = p.x.hypot(p.z);
            if p.y > 0.0 {
                top = top.max(r);
            } else {
                bottom = bottom.max(r);
            }
        }
        assert!((top - 0.05).abs() < 1e-5);
        assert!((bottom - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_star_outline_alternates() {
        let outline = star_outline(5, 0.8, 0.35);
        assert_eq!(outline.len(), 10);
        assert!((outline[0] - Vec2::new(0.0, 0.8)).length() < 1e-5);
        for (i, p) in outline.iter().enumerate() {
            let expected = if i % 2 == 0 { 0.8 } else { 0.35 };
            assert!((p.length() - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_star_mesh() {
        let mesh = star(5, 0.8, 0.35, 0.2);
        assert_well_formed(&mesh);
        for v in &mesh.vertices {
            assert!(v.position[2].abs() <= 0.1 + 1e-6);
        }
    }
}
