//! Orbit camera around the tree.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

/// Orbit camera looking at the middle of the trunk.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Camera {
    pub const MIN_DISTANCE: f32 = 8.0;
    pub const MAX_DISTANCE: f32 = 40.0;
    pub const MIN_PITCH: f32 = -0.277;
    pub const MAX_PITCH: f32 = 1.5;
    /// One revolution every four minutes.
    pub const AUTO_ROTATE_SPEED: f32 = TAU / 240.0;
    /// Radians per pixel of mouse drag.
    pub const ORBIT_SENSITIVITY: f32 = 0.005;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 200.0;

    /// Camera framing a tree of the given height: 5 units above and 28 units
    /// in front of its midpoint.
    pub fn new(tree_height: f32) -> Self {
        let offset = Vec2::new(28.0, 5.0);
        Self {
            yaw: 0.0,
            pitch: offset.y.atan2(offset.x),
            distance: offset.length(),
            target: Vec3::new(0.0, tree_height * 0.5, 0.0),
            fov_y: 40.0_f32.to_radians(),
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), Self::NEAR, Self::FAR)
    }

    /// Rotate by a mouse drag in pixels.
    pub fn orbit(&mut self, drag: Vec2) {
        self.yaw -= drag.x * Self::ORBIT_SENSITIVITY;
        self.pitch = (self.pitch + drag.y * Self::ORBIT_SENSITIVITY).clamp(Self::MIN_PITCH, Self::MAX_PITCH);
    }

    /// Zoom by wheel lines. Positive scrolls in.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * 0.1)).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// Advance the idle spin by `dt` seconds.
    pub fn auto_rotate(&mut self, dt: f32) {
        self.yaw = (self.yaw + dt * Self::AUTO_ROTATE_SPEED) % TAU;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(crate::config::TreeConfig::DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_framing() {
        let cam = Camera::default();
        let pos = cam.position();
        assert!((pos - Vec3::new(0.0, 11.0, 28.0)).length() < 1e-3, "{pos:?}");
        assert_eq!(cam.target, Vec3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn test_zoom_and_pitch_are_clamped() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.zoom(5.0);
        }
        assert_eq!(cam.distance, Camera::MIN_DISTANCE);
        for _ in 0..100 {
            cam.zoom(-5.0);
        }
        assert_eq!(cam.distance, Camera::MAX_DISTANCE);

        cam.orbit(Vec2::new(0.0, 10_000.0));
        assert_eq!(cam.pitch, Camera::MAX_PITCH);
        cam.orbit(Vec2::new(0.0, -10_000.0));
        assert_eq!(cam.pitch, Camera::MIN_PITCH);
    }

    #[test]
    fn test_auto_rotate_period() {
        let mut cam = Camera::default();
        cam.auto_rotate(60.0);
        assert!((cam.yaw - TAU / 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_target_is_in_front() {
        let cam = Camera::default();
        let view_target = cam.view_matrix().transform_point3(cam.target);
        assert!(view_target.z < 0.0);
    }
}
