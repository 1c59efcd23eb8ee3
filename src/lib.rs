//! # Evergreen
//!
//! A particle tree that assembles itself on the GPU.
//!
//! Hundreds of thousands of needle points and a few thousand ornaments each
//! get two homes: a spot in a hollow spherical cloud and a spot in a cone.
//! A single progress value eases between the two, so toggling the state
//! makes the cloud condense into a tree (or burst apart again) with the
//! foliage, ornaments, trunk and star all moving in lockstep.
//!
//! ## Quick Start
//!
//! ```ignore
//! use evergreen::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     env_logger::init();
//!     Scene::new()
//!         .with_foliage_count(300_000)
//!         .with_ornament_count(2_000)
//!         .run()
//! }
//! ```
//!
//! `Space` or `Enter` toggles between the dispersed cloud and the formed
//! tree, left-drag orbits, the wheel zooms, `P` pauses the animation clock.
//!
//! ## Layout
//!
//! The CPU side is plain data and pure functions:
//!
//! - [`distribution`] samples chaos and cone positions
//! - [`foliage`] builds the static needle buffers
//! - [`ornament`] builds ornaments and rewrites their instances per frame
//! - [`transition`] owns the shared progress scalar
//! - [`shading`] mirrors the needle shader for testing
//!
//! The GPU side ([`gpu`]) uploads those buffers once and draws two stages:
//! instanced needle sprites and instanced ornament meshes.
//!
//! ## Feature Flags
//!
//! - `egui`: status overlay with a toggle button

pub mod accent;
pub mod choice;
pub mod color;
pub mod config;
pub mod distribution;
mod error;
pub mod foliage;
pub mod gpu;
pub mod input;
pub mod ornament;
mod scene;
pub mod shader;
pub mod shading;
pub mod time;
pub mod transition;

pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};

pub use accent::Accents;
pub use choice::WeightedTable;
pub use config::TreeConfig;
pub use error::{ChoiceError, GpuError, SceneError};
pub use foliage::{FoliageBuffers, FoliageParticle};
pub use ornament::{OrnamentField, OrnamentFrame, OrnamentInstance, OrnamentItem, OrnamentKind};
pub use scene::{Scene, SceneState};
pub use transition::{TransitionController, TreeState};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use evergreen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::TreeConfig;
    pub use crate::error::{GpuError, SceneError};
    pub use crate::foliage::FoliageBuffers;
    pub use crate::ornament::{OrnamentField, OrnamentKind};
    pub use crate::scene::{Scene, SceneState};
    pub use crate::transition::{TransitionController, TreeState};
    pub use crate::{Vec2, Vec3, Vec4};
    #[cfg(feature = "egui")]
    pub use egui;
}
