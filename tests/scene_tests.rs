//! End-to-end checks of the CPU pipeline: buffers, ornaments and the shared transition.

use evergreen::prelude::*;
use evergreen::shading;
use glam::Mat4;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_small_tree_end_to_end() {
    let config = TreeConfig::default()
        .with_height(12.0)
        .with_radius(5.0)
        .with_chaos_radius(25.0)
        .with_foliage_count(1_000)
        .with_ornament_count(100);
    let mut rng = SmallRng::seed_from_u64(2024);

    let foliage = FoliageBuffers::generate(&config, &mut rng);
    assert_eq!(foliage.len(), 1_000);
    for (chaos, target) in foliage.chaos.iter().zip(&foliage.target) {
        assert!((0.0..=12.0).contains(&target.y));
        let radial = target.x.hypot(target.z);
        assert!(radial <= 5.0 * (1.0 - target.y / 12.0) + 1e-4);
        assert!(chaos.length() <= 25.0 + 1e-4);
    }

    let mut state = SceneState::generate(config, &mut rng);
    state.set_state(TreeState::Formed);
    let mut progress = 0.0;
    for frame in 0..500 {
        progress = state.step(frame as f32 / 60.0);
    }
    assert!(progress > 0.99, "progress {progress}");
    assert!(progress <= 1.0);
}

#[test]
fn test_ornament_mix() {
    let config = TreeConfig::default().with_ornament_count(10_000);
    let mut rng = SmallRng::seed_from_u64(99);
    let field = OrnamentField::generate(&config, &mut rng);

    let share = |kind| field.count(kind) as f32 / 10_000.0;
    assert!((share(OrnamentKind::Light) - 0.45).abs() < 0.02);
    assert!((share(OrnamentKind::Ball) - 0.40).abs() < 0.02);
    assert!((share(OrnamentKind::Gift) - 0.15).abs() < 0.02);

    let total: u32 = [OrnamentKind::Ball, OrnamentKind::Gift, OrnamentKind::Light]
        .into_iter()
        .map(|k| field.count(k))
        .sum();
    assert_eq!(total, 10_000);
}

#[test]
fn test_reversal_is_continuous() {
    let config = TreeConfig::default().with_ornament_count(20);
    let mut rng = SmallRng::seed_from_u64(5);
    let mut state = SceneState::generate(config, &mut rng);

    state.toggle();
    let mut last = 0.0;
    for frame in 0..150 {
        last = state.step(frame as f32 * 0.016);
    }
    state.toggle();
    let next = state.step(2.4);
    assert!(next < last);
    assert!(last - next < 0.011);
}

#[test]
fn test_dispersed_needles_are_invisible() {
    let config = TreeConfig::default().with_foliage_count(200);
    let mut rng = SmallRng::seed_from_u64(8);
    let foliage = FoliageBuffers::generate(&config, &mut rng);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 11.0, 28.0), Vec3::new(0.0, 6.0, 0.0), Vec3::Y);

    for i in 0..foliage.len() {
        let v = shading::shade_vertex(foliage.chaos[i], foliage.target[i], foliage.randoms[i], 0.0, 1.0, &view);
        assert!(shading::shade_fragment(Vec2::ZERO, foliage.color[i], &v).is_none());
    }
}

#[test]
fn test_zero_counts_are_valid() {
    let config = TreeConfig::default().with_foliage_count(0).with_ornament_count(0);
    let mut rng = SmallRng::seed_from_u64(1);
    assert!(FoliageBuffers::generate(&config, &mut rng).is_empty());

    let mut state = SceneState::generate(config, &mut rng);
    state.toggle();
    state.step(0.0);
    assert!(state.ornaments().items().is_empty());
    assert!(state.accents().trunk.is_some());
}
