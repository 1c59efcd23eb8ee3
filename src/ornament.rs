//! Ornament items and their per-frame instance update.
//!
//! Ornaments are generated once: each gets a kind, a colour from that kind's
//! palette, its own chaos and cone positions, a scale and a rotation. Every
//! frame [`OrnamentField::update`] blends each item between its two positions
//! and writes a model matrix and colour into a fixed slot of its kind's layer.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::PI;

use crate::choice::WeightedTable;
use crate::color::{self, hex};
use crate::config::TreeConfig;
use crate::distribution::{sample_chaos_point, sample_ornament_target};

/// Vertical bob amplitude of balls once the tree is formed.
pub const BALL_BOB_AMPLITUDE: f32 = 0.05;
/// Angular speed of the light twinkle (radians per second).
pub const LIGHT_FLICKER_SPEED: f32 = 6.0;
/// Light colour swings between `1 - depth` and `1 + depth` of its base.
pub const LIGHT_FLICKER_DEPTH: f32 = 0.5;

/// The three ornament layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    /// Metallic bauble.
    Ball,
    /// Rotated gift box.
    Gift,
    /// Small emissive fairy light.
    Light,
}

impl OrnamentKind {
    pub const ALL: [OrnamentKind; 3] = [OrnamentKind::Ball, OrnamentKind::Gift, OrnamentKind::Light];

    /// Position of this kind's layer in [`OrnamentFrame`].
    #[inline]
    pub fn layer(self) -> usize {
        match self {
            OrnamentKind::Ball => 0,
            OrnamentKind::Gift => 1,
            OrnamentKind::Light => 2,
        }
    }

    /// Range the uniform scale is drawn from.
    pub fn scale_range(self) -> (f32, f32) {
        match self {
            OrnamentKind::Light => (0.06, 0.10),
            OrnamentKind::Gift => (0.15, 0.30),
            OrnamentKind::Ball => (0.18, 0.30),
        }
    }

    /// How much of the base colour ignores lighting. Lights glow, the rest are lit.
    pub fn emissive(self) -> f32 {
        match self {
            OrnamentKind::Light => 1.0,
            OrnamentKind::Ball | OrnamentKind::Gift => 0.0,
        }
    }

    /// Palette this kind draws its colour from.
    pub fn palette(self) -> &'static [&'static str; 4] {
        match self {
            OrnamentKind::Light => &color::LIGHT_PALETTE,
            OrnamentKind::Ball | OrnamentKind::Gift => &color::ORNAMENT_PALETTE,
        }
    }
}

/// 45% lights, 40% balls, 15% gifts.
pub fn ornament_kinds() -> WeightedTable<OrnamentKind> {
    WeightedTable::new([
        (0.45, OrnamentKind::Light),
        (0.40, OrnamentKind::Ball),
        (0.15, OrnamentKind::Gift),
    ])
    .expect("ornament kind weights are positive constants")
}

/// A single ornament. Never mutated after generation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentItem {
    pub kind: OrnamentKind,
    /// Linear RGB.
    pub color: Vec3,
    pub chaos_position: Vec3,
    pub target_position: Vec3,
    pub scale: f32,
    /// Euler XYZ angles in `[0, π)`. Only gifts apply them.
    pub rotation: Vec3,
    /// Position in the full item list; phases the bob and twinkle.
    pub index: u32,
    /// Position within this kind's layer.
    pub slot: u32,
}

impl OrnamentItem {
    /// Blended position before any per-kind motion.
    #[inline]
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.chaos_position.lerp(self.target_position, progress)
    }

    /// Model matrix and colour for this frame.
    pub fn instance_at(&self, progress: f32, time: f32) -> OrnamentInstance {
        let phase = self.index as f32;
        let mut position = self.position_at(progress);
        let mut rotation = Quat::IDENTITY;
        let mut tint = self.color;

        match self.kind {
            OrnamentKind::Ball => {
                position.y += (time + phase).sin() * BALL_BOB_AMPLITUDE * progress;
            }
            OrnamentKind::Gift => {
                rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
            }
            OrnamentKind::Light => {
                tint *= light_intensity(time, phase);
            }
        }

        let model = Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, position);
        OrnamentInstance::new(model, tint, self.kind.emissive())
    }
}

/// Twinkle multiplier for a light.
#[inline]
pub fn light_intensity(time: f32, phase: f32) -> f32 {
    1.0 + (time * LIGHT_FLICKER_SPEED + phase).sin() * LIGHT_FLICKER_DEPTH
}

/// Per-instance GPU data: model matrix columns and a colour.
///
/// The colour's alpha is not opacity: it is the emissive factor, 0 for fully
/// lit surfaces and 1 for surfaces drawn at their base colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct OrnamentInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl OrnamentInstance {
    pub fn new(model: Mat4, color: Vec3, emissive: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(emissive.clamp(0.0, 1.0)).to_array(),
        }
    }

    /// World-space translation of this instance.
    pub fn translation(&self) -> Vec3 {
        Vec3::from_slice(&self.model[3][..3])
    }
}

/// Instance data for one frame, one fixed-length vector per kind.
#[derive(Debug, Clone, Default)]
pub struct OrnamentFrame {
    layers: [Vec<OrnamentInstance>; 3],
}

impl OrnamentFrame {
    /// Instances of `kind`, indexed by slot.
    pub fn layer(&self, kind: OrnamentKind) -> &[OrnamentInstance] {
        &self.layers[kind.layer()]
    }
}

/// All ornaments plus the per-kind capacities.
#[derive(Debug, Clone, Default)]
pub struct OrnamentField {
    items: Vec<OrnamentItem>,
    counts: [u32; 3],
}

impl OrnamentField {
    /// Generate `config.ornament_count` ornaments.
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Self {
        let kinds = ornament_kinds();
        let palettes = [
            palette_table(OrnamentKind::Ball),
            palette_table(OrnamentKind::Gift),
            palette_table(OrnamentKind::Light),
        ];

        let items = (0..config.ornament_count)
            .map(|index| {
                let kind = *kinds.sample(rng);
                let color = *palettes[kind.layer()].sample(rng);
                let (lo, hi) = kind.scale_range();
                OrnamentItem {
                    kind,
                    color,
                    chaos_position: sample_chaos_point(rng, config.chaos_radius),
                    target_position: sample_ornament_target(rng, config.height, config.radius),
                    scale: lo + rng.gen::<f32>() * (hi - lo),
                    rotation: Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, rng.gen::<f32>() * PI),
                    index,
                    slot: 0,
                }
            })
            .collect();

        Self::from_items(items)
    }

    /// Assign slots and count capacities for an existing item list.
    ///
    /// Items keep their order; each kind's slots are numbered in the order
    /// its items appear.
    pub fn from_items(mut items: Vec<OrnamentItem>) -> Self {
        let mut counts = [0u32; 3];
        for item in &mut items {
            let layer = item.kind.layer();
            item.slot = counts[layer];
            counts[layer] += 1;
        }

        log::debug!(
            "Ornament layers: {} balls, {} gifts, {} lights",
            counts[0],
            counts[1],
            counts[2]
        );
        Self { items, counts }
    }

    pub fn items(&self) -> &[OrnamentItem] {
        &self.items
    }

    /// Number of items of `kind`, which is also its layer's instance capacity.
    pub fn count(&self, kind: OrnamentKind) -> u32 {
        self.counts[kind.layer()]
    }

    /// A frame with every layer sized to its capacity.
    pub fn new_frame(&self) -> OrnamentFrame {
        OrnamentFrame {
            layers: self.counts.map(|n| vec![OrnamentInstance::default(); n as usize]),
        }
    }

    /// Write this frame's transforms and colours into `frame`.
    pub fn update(&self, progress: f32, time: f32, frame: &mut OrnamentFrame) {
        for (layer, &n) in frame.layers.iter_mut().zip(self.counts.iter()) {
            layer.resize(n as usize, OrnamentInstance::default());
        }
        for item in &self.items {
            frame.layers[item.kind.layer()][item.slot as usize] = item.instance_at(progress, time);
        }
    }
}

fn palette_table(kind: OrnamentKind) -> WeightedTable<Vec3> {
    WeightedTable::uniform(kind.palette().iter().map(|code| hex(code)))
        .expect("ornament palettes are non-empty constants")
}
