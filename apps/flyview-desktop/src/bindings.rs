use flyview_input::{Action, Key, MouseButton};
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Pixel scroll per wheel notch, for touchpads reporting pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

pub const CONTROLS: &str = "\
RENDERING
  F4            cycle sampling state
  F5            toggle rotation
  F6            toggle normal map
  F7            toggle fire fx
  I             print controls

KEYBOARD
  W / S         move camera forward / backward
  A / D         move camera left / right
  E / Q         move camera up / down
  LSHIFT        camera speed boost
  UP / DOWN     narrow / widen field of view
  F             recenter camera

MOUSE
  RMB           look around
  LMB           move forward / backward, turn
  LMB + RMB     move up / down
  LALT + LMB    orbit around target
  LALT + RMB    move forward / backward
  SCROLL        zoom in / out";

/// Held key the camera polls, if `code` is one.
pub fn held_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::ShiftLeft => Key::LeftShift,
        _ => return None,
    })
}

/// One-shot action fired when `code` is released.
pub fn release_action(code: KeyCode) -> Option<Action> {
    Some(match code {
        KeyCode::KeyI => Action::PrintControls,
        KeyCode::F4 => Action::CycleSampler,
        KeyCode::F5 => Action::ToggleRotation,
        KeyCode::F6 => Action::ToggleNormalMap,
        KeyCode::F7 => Action::ToggleFireFx,
        _ => return None,
    })
}

pub fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

/// Vertical scroll in wheel notches, positive away from the user.
pub fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn movement_keys_are_held() {
        assert_eq!(held_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(held_key(KeyCode::ShiftLeft), Some(Key::LeftShift));
        assert_eq!(held_key(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(held_key(KeyCode::F4), None);
    }

    #[test]
    fn function_keys_fire_actions() {
        assert_eq!(release_action(KeyCode::F4), Some(Action::CycleSampler));
        assert_eq!(release_action(KeyCode::F5), Some(Action::ToggleRotation));
        assert_eq!(release_action(KeyCode::F6), Some(Action::ToggleNormalMap));
        assert_eq!(release_action(KeyCode::F7), Some(Action::ToggleFireFx));
        assert_eq!(release_action(KeyCode::KeyI), Some(Action::PrintControls));
        assert_eq!(release_action(KeyCode::KeyW), None);
    }

    #[test]
    fn held_and_action_keys_do_not_overlap() {
        for code in [KeyCode::KeyI, KeyCode::F4, KeyCode::F5, KeyCode::F6, KeyCode::F7] {
            assert!(held_key(code).is_none());
        }
    }

    #[test]
    fn only_left_and_right_buttons_map() {
        assert_eq!(mouse_button(winit::event::MouseButton::Right), Some(MouseButton::Right));
        assert_eq!(mouse_button(winit::event::MouseButton::Middle), None);
    }

    #[test]
    fn wheel_deltas_become_notches() {
        assert_eq!(wheel_notches(MouseScrollDelta::LineDelta(0.0, 1.0)), 1.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0));
        assert_eq!(wheel_notches(pixels), -2.0);
        assert_eq!(Action::from_wheel(wheel_notches(pixels)), Some(Action::ZoomOut));
    }

    #[test]
    fn controls_list_every_action_key() {
        for key in ["F4", "F5", "F6", "F7", "SCROLL"] {
            assert!(CONTROLS.contains(key));
        }
    }
}
