//! Foliage particle buffers.
//!
//! Built once at startup: for every needle point a chaos position, a position
//! inside the cone, a base colour and three random attributes. The arrays are
//! parallel and never change length afterwards.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::choice::WeightedTable;
use crate::color::{self, blend, hex};
use crate::config::TreeConfig;
use crate::distribution::{sample_chaos_point, sample_foliage_target};

/// Needles closer to the trunk than this share of the envelope turn slightly brown.
pub const DRYNESS_BAND: f32 = 0.3;
/// Needles further out than this share of the envelope get a bright tip.
pub const NEW_GROWTH_BAND: f32 = 0.85;
pub const DRYNESS_STRENGTH: f32 = 0.15;
pub const NEW_GROWTH_STRENGTH: f32 = 0.1;

/// Per-instance vertex data for the foliage stage.
///
/// Four `vec3<f32>` attributes, tightly packed (48 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FoliageParticle {
    pub chaos: [f32; 3],
    pub target: [f32; 3],
    pub color: [f32; 3],
    /// x: rotation phase, y: size jitter, z: saturation jitter.
    pub randoms: [f32; 3],
}

/// Which of the three needle greens a point starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedleHue {
    Base,
    Mid,
    Tip,
}

impl NeedleHue {
    /// Linear colour of this hue. Decodes the hex constant on every call; bulk
    /// generation goes through [`NeedlePalette`] instead.
    pub fn color(self) -> Vec3 {
        match self {
            NeedleHue::Base => hex(color::FOLIAGE_BASE),
            NeedleHue::Mid => hex(color::FOLIAGE_MID),
            NeedleHue::Tip => hex(color::FOLIAGE_TIP),
        }
    }
}

/// 20% tip, 40% mid, 40% base.
pub fn needle_hues() -> WeightedTable<NeedleHue> {
    WeightedTable::new([
        (0.2, NeedleHue::Tip),
        (0.4, NeedleHue::Mid),
        (0.4, NeedleHue::Base),
    ])
    .expect("needle hue weights are positive constants")
}

/// The three needle greens and both tints in linear RGB, decoded once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedlePalette {
    pub base: Vec3,
    pub mid: Vec3,
    pub tip: Vec3,
    /// Brown mixed into needles close to the trunk.
    pub dryness: Vec3,
    /// Light green mixed into needles at the outer edge.
    pub new_growth: Vec3,
}

impl NeedlePalette {
    pub fn new() -> Self {
        Self {
            base: NeedleHue::Base.color(),
            mid: NeedleHue::Mid.color(),
            tip: NeedleHue::Tip.color(),
            dryness: hex(color::DRYNESS_TINT),
            new_growth: hex(color::NEW_GROWTH_TINT),
        }
    }

    pub fn hue(&self, hue: NeedleHue) -> Vec3 {
        match hue {
            NeedleHue::Base => self.base,
            NeedleHue::Mid => self.mid,
            NeedleHue::Tip => self.tip,
        }
    }

    /// Base colour of a needle from its hue and where it sits inside the envelope.
    pub fn needle_color(&self, hue: NeedleHue, radial: f32, envelope: f32) -> Vec3 {
        let mut c = self.hue(hue);
        if radial < envelope * DRYNESS_BAND {
            c = blend(c, self.dryness, DRYNESS_STRENGTH);
        }
        if radial > envelope * NEW_GROWTH_BAND {
            c = blend(c, self.new_growth, NEW_GROWTH_STRENGTH);
        }
        c
    }
}

impl Default for NeedlePalette {
    fn default() -> Self {
        Self::new()
    }
}

/// Parallel per-needle arrays, all of the same length.
#[derive(Debug, Clone, Default)]
pub struct FoliageBuffers {
    /// Position in the dispersed cloud.
    pub chaos: Vec<Vec3>,
    /// Position inside the cone.
    pub target: Vec<Vec3>,
    /// Linear base colour, tints already applied.
    pub color: Vec<Vec3>,
    /// Rotation phase, size jitter and saturation jitter, each in `[0, 1)`.
    pub randoms: Vec<Vec3>,
}

impl FoliageBuffers {
    /// Generate `config.foliage_count` needles.
    pub fn generate<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Self {
        let n = config.foliage_count as usize;
        let hues = needle_hues();
        let palette = NeedlePalette::new();
        let mut buffers = Self {
            chaos: Vec::with_capacity(n),
            target: Vec::with_capacity(n),
            color: Vec::with_capacity(n),
            randoms: Vec::with_capacity(n),
        };

        for _ in 0..n {
            let chaos = sample_chaos_point(rng, config.chaos_radius);
            let cone = sample_foliage_target(rng, config.height, config.radius);
            let hue = *hues.sample(rng);

            buffers.chaos.push(chaos);
            buffers.target.push(cone.position);
            buffers.color.push(palette.needle_color(hue, cone.radial, cone.envelope));
            buffers.randoms.push(Vec3::new(rng.gen(), rng.gen(), rng.gen()));
        }

        log::info!(
            "Generated {} foliage particles ({:.1} MiB)",
            n,
            (n * std::mem::size_of::<FoliageParticle>()) as f32 / (1024.0 * 1024.0)
        );
        buffers
    }

    /// Number of needles.
    pub fn len(&self) -> usize {
        self.chaos.len()
    }

    /// True for a zero-needle tree.
    pub fn is_empty(&self) -> bool {
        self.chaos.is_empty()
    }

    /// Interleave into the vertex layout consumed by the foliage shader.
    pub fn to_gpu(&self) -> Vec<FoliageParticle> {
        self.chaos
            .iter()
            .zip(&self.target)
            .zip(&self.color)
            .zip(&self.randoms)
            .map(|(((chaos, target), color), randoms)| FoliageParticle {
                chaos: chaos.to_array(),
                target: target.to_array(),
                color: color.to_array(),
                randoms: randoms.to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn small_config(count: u32) -> TreeConfig {
        TreeConfig::default().with_foliage_count(count)
    }

    #[test]
    fn test_every_array_has_exact_length() {
        let mut rng = SmallRng::seed_from_u64(1);
        let buffers = FoliageBuffers::generate(&small_config(777), &mut rng);
        assert_eq!(buffers.len(), 777);
        assert_eq!(buffers.target.len(), 777);
        assert_eq!(buffers.color.len(), 777);
        assert_eq!(buffers.randoms.len(), 777);
        assert_eq!(buffers.to_gpu().len(), 777);
    }

    #[test]
    fn test_zero_count_is_empty_not_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        let buffers = FoliageBuffers::generate(&small_config(0), &mut rng);
        assert!(buffers.is_empty());
        assert!(buffers.to_gpu().is_empty());
    }

    #[test]
    fn test_randoms_in_unit_range() {
        let mut rng = SmallRng::seed_from_u64(2);
        let buffers = FoliageBuffers::generate(&small_config(2000), &mut rng);
        for r in &buffers.randoms {
            assert!(r.min_element() >= 0.0 && r.max_element() < 1.0);
        }
    }

    #[test]
    fn test_gpu_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<FoliageParticle>(), 48);
    }

    #[test]
    fn test_interleave_preserves_order() {
        let mut rng = SmallRng::seed_from_u64(5);
        let buffers = FoliageBuffers::generate(&small_config(10), &mut rng);
        let gpu = buffers.to_gpu();
        assert_eq!(gpu[3].chaos, buffers.chaos[3].to_array());
        assert_eq!(gpu[7].target, buffers.target[7].to_array());
        assert_eq!(gpu[9].randoms, buffers.randoms[9].to_array());
    }

    #[test]
    fn test_dryness_and_growth_tints() {
        let palette = NeedlePalette::new();
        let mid = NeedleHue::Mid.color();
        let inner = palette.needle_color(NeedleHue::Mid, 0.1, 1.0);
        let middle = palette.needle_color(NeedleHue::Mid, 0.5, 1.0);
        let outer = palette.needle_color(NeedleHue::Mid, 0.95, 1.0);

        assert_eq!(middle, mid);
        assert_eq!(inner, blend(mid, hex(color::DRYNESS_TINT), DRYNESS_STRENGTH));
        assert_eq!(outer, blend(mid, hex(color::NEW_GROWTH_TINT), NEW_GROWTH_STRENGTH));
    }

    #[test]
    fn test_palette_matches_hex_constants() {
        let palette = NeedlePalette::new();
        for hue in [NeedleHue::Base, NeedleHue::Mid, NeedleHue::Tip] {
            assert_eq!(palette.hue(hue), hue.color());
        }
        assert_eq!(palette.dryness, hex(color::DRYNESS_TINT));
        assert_eq!(palette.new_growth, hex(color::NEW_GROWTH_TINT));
    }

    #[test]
    fn test_generated_colours_come_from_palette() {
        let palette = NeedlePalette::new();
        let mut allowed = Vec::new();
        for hue in [NeedleHue::Base, NeedleHue::Mid, NeedleHue::Tip] {
            for radial in [0.1, 0.5, 0.95] {
                allowed.push(palette.needle_color(hue, radial, 1.0));
            }
        }

        let config = TreeConfig::default().with_foliage_count(300);
        let buffers = FoliageBuffers::generate(&config, &mut SmallRng::seed_from_u64(3));
        for c in &buffers.color {
            assert!(allowed.contains(c), "unexpected colour {c}");
        }
    }

    #[test]
    fn test_hue_mix() {
        let hues = needle_hues();
        let probs: Vec<(f32, NeedleHue)> = hues.probabilities().map(|(p, h)| (p, *h)).collect();
        assert_eq!(probs.len(), 3);
        assert!((probs[0].0 - 0.2).abs() < 1e-6 && probs[0].1 == NeedleHue::Tip);
        assert!((probs[2].0 - 0.4).abs() < 1e-6 && probs[2].1 == NeedleHue::Base);
    }
}
