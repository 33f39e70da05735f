use glam::Vec2;
use std::collections::HashSet;

/// Keys the camera polls every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    /// Refocus on the home target.
    F,
    Up,
    Down,
    LeftAlt,
    LeftShift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Which mouse buttons are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
}

impl MouseButtons {
    pub fn any(self) -> bool {
        self.left || self.right
    }
}

/// Snapshot of keyboard and mouse state for one frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_held: HashSet<Key>,
    buttons: MouseButtons,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.buttons.left = pressed,
            MouseButton::Right => self.buttons.right = pressed,
        }
    }

    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }

    /// Add raw relative mouse motion (pixels).
    pub fn accumulate_mouse(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
    }

    /// Relative mouse motion since the last [`end_frame`](Self::end_frame).
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Clear per-frame deltas. Held keys and buttons persist.
    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys_held.clear();
        self.buttons = MouseButtons::default();
        self.mouse_delta = Vec2::ZERO;
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.set_key(key, true);
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.set_button(button, true);
        self
    }

    pub fn with_mouse_delta(mut self, dx: f32, dy: f32) -> Self {
        self.accumulate_mouse(dx, dy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut input = InputState::new();
        input.set_key(Key::W, true);
        assert!(input.is_held(Key::W));
        input.set_key(Key::W, false);
        assert!(!input.is_held(Key::W));
    }

    #[test]
    fn mouse_motion_accumulates_until_end_of_frame() {
        let mut input = InputState::new();
        input.accumulate_mouse(3.0, -1.0);
        input.accumulate_mouse(2.0, 4.0);
        assert_eq!(input.mouse_delta(), Vec2::new(5.0, 3.0));

        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn end_frame_keeps_held_state() {
        let mut input = InputState::new()
            .with_key(Key::LeftAlt)
            .with_button(MouseButton::Right);
        input.end_frame();
        assert!(input.is_held(Key::LeftAlt));
        assert!(input.buttons().right);
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState::new()
            .with_key(Key::S)
            .with_button(MouseButton::Left)
            .with_mouse_delta(1.0, 1.0);
        input.clear();
        assert!(!input.is_held(Key::S));
        assert!(!input.buttons().any());
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }
}
