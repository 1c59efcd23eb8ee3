//! Keyboard and mouse tracking.
//!
//! [`Input`] folds raw window events into per-frame state: keys that went down
//! this frame, whether the left button is held, how far the cursor dragged and
//! how much the wheel turned. [`Input::actions`] maps that state onto the
//! scene's controls.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flip between dispersed and formed.
    ToggleState,
    /// Freeze or resume the animation clock.
    TogglePause,
    Exit,
}

impl Action {
    /// Keyboard binding, if any.
    pub fn for_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => Some(Action::ToggleState),
            KeyCode::KeyP => Some(Action::TogglePause),
            KeyCode::Escape => Some(Action::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: Vec<KeyCode>,

    dragging: bool,
    mouse_position: Option<Vec2>,
    /// Cursor travel while the left button was held, this frame.
    drag_delta: Vec2,

    /// Wheel lines this frame, positive away from the user.
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Actions triggered this frame, in key-press order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.keys_pressed.iter().filter_map(|&key| Action::for_key(key))
    }

    /// Clear per-frame state. Held keys and the drag flag persist.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub(crate) fn press_key(&mut self, key: KeyCode) {
        // Auto-repeat does not count as a new press
        if self.keys_held.insert(key) {
            self.keys_pressed.push(key);
        }
    }

    pub(crate) fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub(crate) fn move_cursor(&mut self, position: Vec2) {
        if let Some(last) = self.mouse_position {
            if self.dragging {
                self.drag_delta += position - last;
            }
        }
        self.mouse_position = Some(position);
    }

    pub(crate) fn scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.set_dragging(*state == ElementState::Pressed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll(match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                });
            }

            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.dragging = false;
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_fires_once() {
        let mut input = Input::new();
        input.press_key(KeyCode::Space);
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
        assert_eq!(input.actions().collect::<Vec<_>>(), vec![Action::ToggleState]);

        // Held across frames, pressed only once
        input.begin_frame();
        input.press_key(KeyCode::Space);
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        input.release_key(KeyCode::Space);
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_bindings() {
        assert_eq!(Action::for_key(KeyCode::Enter), Some(Action::ToggleState));
        assert_eq!(Action::for_key(KeyCode::KeyP), Some(Action::TogglePause));
        assert_eq!(Action::for_key(KeyCode::Escape), Some(Action::Exit));
        assert_eq!(Action::for_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_drag_only_while_held() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(10.0, 10.0));
        input.move_cursor(Vec2::new(20.0, 10.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.set_dragging(true);
        input.move_cursor(Vec2::new(25.0, 13.0));
        input.move_cursor(Vec2::new(30.0, 16.0));
        assert_eq!(input.drag_delta(), Vec2::new(10.0, 6.0));

        input.begin_frame();
        assert_eq!(input.drag_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_accumulates_per_frame() {
        let mut input = Input::new();
        input.scroll(1.0);
        input.scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.begin_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
