//! Single-instance decorations: the trunk and star that grow with the tree,
//! and the pedestal it stands on.

use glam::{Mat4, Quat, Vec3};

use crate::color::{self, hex};
use crate::config::TreeConfig;
use crate::ornament::OrnamentInstance;

pub const TRUNK_TOP_RADIUS: f32 = 0.05;
pub const TRUNK_BOTTOM_RADIUS: f32 = 0.8;

pub const STAR_POINTS: u32 = 5;
pub const STAR_OUTER_RADIUS: f32 = 0.8;
pub const STAR_INNER_RADIUS: f32 = 0.35;
pub const STAR_DEPTH: f32 = 0.2;
/// Gap between the cone's apex and the star centre.
pub const STAR_LIFT: f32 = 0.5;

pub const PEDESTAL_TOP_RADIUS: f32 = 1.6;
pub const PEDESTAL_BOTTOM_RADIUS: f32 = 2.0;
pub const PEDESTAL_HEIGHT: f32 = 0.7;
/// Pedestal centre height; it sinks slightly below the ground plane.
pub const PEDESTAL_CENTER_Y: f32 = 0.3;

/// Below this progress the accents are not drawn at all.
pub const MIN_VISIBLE_PROGRESS: f32 = 1e-3;

/// Accent instances for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accents {
    pub trunk: Option<OrnamentInstance>,
    pub star: Option<OrnamentInstance>,
    /// Always present, in both states.
    pub pedestal: OrnamentInstance,
}

impl Accents {
    pub fn at(config: &TreeConfig, progress: f32, time: f32) -> Self {
        Self {
            trunk: trunk_instance(config, progress),
            star: star_instance(config, progress, time),
            pedestal: pedestal_instance(),
        }
    }
}

impl Default for Accents {
    fn default() -> Self {
        Self::at(&TreeConfig::default(), 0.0, 0.0)
    }
}

/// Trunk grows from the ground: the unit-height mesh is stretched to
/// `height * progress` and centred at half that.
pub fn trunk_instance(config: &TreeConfig, progress: f32) -> Option<OrnamentInstance> {
    if progress < MIN_VISIBLE_PROGRESS {
        return None;
    }
    let h = config.height.max(0.0) * progress.min(1.0);
    let model = Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, h.max(1e-3), 1.0),
        Quat::IDENTITY,
        Vec3::new(0.0, h * 0.5, 0.0),
    );
    Some(OrnamentInstance::new(model, hex(color::TRUNK), 0.0))
}

/// Star above the apex, scaled by progress, with a slow float and sway.
pub fn star_instance(config: &TreeConfig, progress: f32, time: f32) -> Option<OrnamentInstance> {
    if progress < MIN_VISIBLE_PROGRESS {
        return None;
    }
    let float = (time * 0.5).sin() * 0.15 * progress;
    let sway = (time * 0.5).cos() * 0.1;
    let model = Mat4::from_scale_rotation_translation(
        Vec3::splat(progress.min(1.0)),
        Quat::from_rotation_y(sway),
        Vec3::new(0.0, config.height + STAR_LIFT + float, 0.0),
    );
    Some(OrnamentInstance::new(model, hex(color::GOLD), 1.0))
}

/// The unit pedestal mesh is built at its final size, so only a lift is applied.
pub fn pedestal_instance() -> OrnamentInstance {
    let model = Mat4::from_translation(Vec3::new(0.0, PEDESTAL_CENTER_Y, 0.0));
    OrnamentInstance::new(model, hex(color::PEDESTAL), 0.0)
}
