//! Point distributions for the two states.
//!
//! Each sampler comes in two forms: a deterministic core taking the uniform
//! draws explicitly, and a `sample_*` wrapper pulling them from an RNG. The
//! cores exist so the shape of a distribution can be pinned down in tests
//! (`u = 1` must land exactly on the chaos shell, and so on).
//!
//! All functions are total. Degenerate parameters collapse to a point instead
//! of producing NaN.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Exponent on the radius draw of the chaos cloud. Below 1/3 pushes points
/// towards the shell, giving a hollow cloud instead of a dense core.
pub const CHAOS_RADIUS_EXPONENT: f32 = 0.3;

/// Exponent applied to the uniform height draw of the foliage cone.
pub const FOLIAGE_HEIGHT_EXPONENT: f32 = 0.85;

/// Smallest jitter factor applied to the foliage radius.
pub const FOLIAGE_MIN_SPREAD: f32 = 0.5;

/// A foliage target together with its distance from the trunk axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConePoint {
    pub position: Vec3,
    /// Horizontal distance from the y axis.
    pub radial: f32,
    /// Cone radius at this height (`radius * (1 - y / height)`).
    pub envelope: f32,
}

/// Point in the chaos cloud for explicit uniform draws in `[0, 1]`.
///
/// * `u` - radius draw, mapped through `u^0.3`
/// * `theta_u` - azimuth draw, mapped to `[0, 2π)`
/// * `phi_u` - polar draw, mapped through `acos(2u - 1)` for a uniform direction
pub fn chaos_point(chaos_radius: f32, u: f32, theta_u: f32, phi_u: f32) -> Vec3 {
    let r = chaos_radius.max(0.0) * u.clamp(0.0, 1.0).powf(CHAOS_RADIUS_EXPONENT);
    let theta = theta_u * TAU;
    let phi = (2.0 * phi_u.clamp(0.0, 1.0) - 1.0).acos();

    finite_or_origin(Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ))
}

/// Random point in the chaos cloud.
pub fn sample_chaos_point<R: Rng + ?Sized>(rng: &mut R, chaos_radius: f32) -> Vec3 {
    chaos_point(chaos_radius, rng.gen(), rng.gen(), rng.gen())
}

/// Needle position inside the foliage cone for explicit draws.
///
/// * `height_u` - mapped through `u^0.85`
/// * `spread_u` - radius jitter, mapped to `[0.5, 1.0]` of the envelope
/// * `angle_u` - mapped to `[0, 2π)`
pub fn foliage_target(height: f32, radius: f32, height_u: f32, spread_u: f32, angle_u: f32) -> ConePoint {
    let height = height.max(0.0);
    let y = height * height_u.clamp(0.0, 1.0).powf(FOLIAGE_HEIGHT_EXPONENT);
    let envelope = radius.max(0.0) * taper(y, height);
    let spread = FOLIAGE_MIN_SPREAD + (1.0 - FOLIAGE_MIN_SPREAD) * spread_u.clamp(0.0, 1.0);
    let r = envelope * spread;
    let angle = angle_u * TAU;

    cone_point(r, y, angle, envelope)
}

/// Random needle position inside the foliage cone.
pub fn sample_foliage_target<R: Rng + ?Sized>(rng: &mut R, height: f32, radius: f32) -> ConePoint {
    foliage_target(height, radius, rng.gen(), rng.gen(), rng.gen())
}

/// Ornament position on the cone surface for explicit draws.
///
/// Height is uniform and the radius sits exactly on the envelope, so
/// ornaments hang on the outside of the foliage.
pub fn ornament_target(height: f32, radius: f32, height_u: f32, angle_u: f32) -> Vec3 {
    let height = height.max(0.0);
    let y = height * height_u.clamp(0.0, 1.0);
    let envelope = radius.max(0.0) * taper(y, height);

    cone_point(envelope, y, angle_u * TAU, envelope).position
}

/// Random ornament position.
pub fn sample_ornament_target<R: Rng + ?Sized>(rng: &mut R, height: f32, radius: f32) -> Vec3 {
    ornament_target(height, radius, rng.gen(), rng.gen())
}

/// `1 - y / height`, or zero for a flat cone.
#[inline]
fn taper(y: f32, height: f32) -> f32 {
    if height > 0.0 {
        (1.0 - y / height).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn cone_point(r: f32, y: f32, angle: f32, envelope: f32) -> ConePoint {
    let position = finite_or_origin(Vec3::new(angle.cos() * r, y, angle.sin() * r));
    ConePoint {
        position,
        radial: if position == Vec3::ZERO { 0.0 } else { r },
        envelope: if envelope.is_finite() { envelope } else { 0.0 },
    }
}

#[inline]
fn finite_or_origin(p: Vec3) -> Vec3 {
    if p.is_finite() {
        p
    } else {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_chaos_full_draw_lands_on_shell() {
        for (t, p) in [(0.0, 0.5), (0.3, 0.1), (0.77, 0.9), (0.5, 1.0)] {
            let point = chaos_point(25.0, 1.0, t, p);
            assert!((point.length() - 25.0).abs() < 1e-4, "{point:?}");
        }
    }

    #[test]
    fn test_chaos_small_draw_approaches_origin() {
        let near = chaos_point(25.0, 1e-12, 0.2, 0.4).length();
        let nearer = chaos_point(25.0, 1e-18, 0.2, 0.4).length();
        assert!(near < 0.01);
        assert!(nearer < near);
        assert_eq!(chaos_point(25.0, 0.0, 0.2, 0.4), Vec3::ZERO);
    }

    #[test]
    fn test_chaos_radius_bias() {
        // u = 0.5 should already be ~81% of the way out
        let r = chaos_point(10.0, 0.5, 0.0, 0.5).length();
        assert!((r - 10.0 * 0.5f32.powf(0.3)).abs() < 1e-4);
    }

    #[test]
    fn test_foliage_target_stays_in_envelope() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..5000 {
            let p = sample_foliage_target(&mut rng, 12.0, 5.0);
            let y = p.position.y;
            assert!((0.0..=12.0).contains(&y));
            let radial = p.position.x.hypot(p.position.z);
            assert!(radial <= 5.0 * (1.0 - y / 12.0) + 1e-4);
            assert!(radial >= 0.5 * p.envelope - 1e-4);
        }
    }

    #[test]
    fn test_foliage_height_follows_power_law() {
        let mut rng = SmallRng::seed_from_u64(3);
        let n = 20_000;
        let below_half = (0..n)
            .filter(|_| sample_foliage_target(&mut rng, 12.0, 5.0).position.y < 6.0)
            .count();
        // P(u^0.85 < 0.5) = 0.5^(1/0.85) ≈ 0.443
        let share = below_half as f32 / n as f32;
        assert!((share - 0.5f32.powf(1.0 / 0.85)).abs() < 0.02, "share {share}");
    }

    #[test]
    fn test_ornament_target_on_envelope() {
        let p = ornament_target(12.0, 5.0, 0.25, 0.125);
        assert!((p.y - 3.0).abs() < 1e-5);
        assert!((p.x.hypot(p.z) - 5.0 * 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_shapes_stay_finite() {
        assert_eq!(foliage_target(0.0, 5.0, 0.5, 0.5, 0.5).position, Vec3::ZERO);
        assert_eq!(ornament_target(-3.0, 5.0, 0.5, 0.5), Vec3::ZERO);
        assert_eq!(chaos_point(-1.0, 0.7, 0.1, 0.9), Vec3::ZERO);
        let flat = foliage_target(12.0, 0.0, 0.5, 0.5, 0.5).position;
        assert!(flat.is_finite());
        assert_eq!(flat.x, 0.0);
        assert!(ornament_target(f32::NAN, 5.0, 0.5, 0.5).is_finite());
        assert!(chaos_point(f32::INFINITY, 1.0, 0.5, 0.5).is_finite());
    }
}
