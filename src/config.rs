//! Construction-time scene parameters.
//!
//! Everything here is read once when the particle buffers are built. Changing
//! a value means rebuilding every buffer, so the config is consumed by
//! [`Scene::run`](crate::Scene::run) and never touched again.

/// Shape and population of the tree.
///
/// ```ignore
/// let config = TreeConfig::default()
///     .with_foliage_count(200_000)
///     .with_smoothing_rate(0.02);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    /// Height of the foliage cone, base at y = 0.
    pub height: f32,
    /// Radius of the cone at its base.
    pub radius: f32,
    /// Outer radius of the dispersed cloud.
    pub chaos_radius: f32,
    /// Number of needle points.
    pub foliage_count: u32,
    /// Number of ornaments (balls, gifts and lights together).
    pub ornament_count: u32,
    /// Per-frame interpolation factor used by the transition controller.
    pub smoothing_rate: f32,
}

impl TreeConfig {
    pub const DEFAULT_HEIGHT: f32 = 12.0;
    pub const DEFAULT_RADIUS: f32 = 5.0;
    pub const DEFAULT_CHAOS_RADIUS: f32 = 25.0;
    pub const DEFAULT_FOLIAGE_COUNT: u32 = 850_000;
    pub const DEFAULT_ORNAMENT_COUNT: u32 = 4_500;
    pub const DEFAULT_SMOOTHING_RATE: f32 = 0.01;

    /// Create a config with the default tree.
    pub fn new() -> Self {
        Self {
            height: Self::DEFAULT_HEIGHT,
            radius: Self::DEFAULT_RADIUS,
            chaos_radius: Self::DEFAULT_CHAOS_RADIUS,
            foliage_count: Self::DEFAULT_FOLIAGE_COUNT,
            ornament_count: Self::DEFAULT_ORNAMENT_COUNT,
            smoothing_rate: Self::DEFAULT_SMOOTHING_RATE,
        }
    }

    /// Set the cone height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the cone base radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the radius of the dispersed cloud.
    pub fn with_chaos_radius(mut self, chaos_radius: f32) -> Self {
        self.chaos_radius = chaos_radius;
        self
    }

    /// Set the number of needle points.
    pub fn with_foliage_count(mut self, count: u32) -> Self {
        self.foliage_count = count;
        self
    }

    /// Set the number of ornaments.
    pub fn with_ornament_count(mut self, count: u32) -> Self {
        self.ornament_count = count;
        self
    }

    /// Set the per-frame smoothing factor (clamped to [0, 1]).
    pub fn with_smoothing_rate(mut self, rate: f32) -> Self {
        self.smoothing_rate = rate.clamp(0.0, 1.0);
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
