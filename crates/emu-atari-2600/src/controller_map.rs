//! Host keyboard → joystick and console switch mapping.
//!
//! Default mapping:
//! - IJKL or arrows, M or Space → player 0 stick and fire
//! - WASD, X → player 1 stick and fire
//! - 0 → Reset, 1 → Select
//! - 2 / 3 → toggle player 0 / player 1 difficulty

use winit::keyboard::KeyCode;

use crate::input::Control;

/// Map a host key to a control. Returns `None` for unmapped keys.
#[must_use]
pub fn map_keycode(key: KeyCode) -> Option<Control> {
    match key {
        KeyCode::KeyI | KeyCode::ArrowUp => Some(Control::P0Up),
        KeyCode::KeyK | KeyCode::ArrowDown => Some(Control::P0Down),
        KeyCode::KeyJ | KeyCode::ArrowLeft => Some(Control::P0Left),
        KeyCode::KeyL | KeyCode::ArrowRight => Some(Control::P0Right),
        KeyCode::KeyM | KeyCode::Space => Some(Control::P0Fire),
        KeyCode::KeyW => Some(Control::P1Up),
        KeyCode::KeyS => Some(Control::P1Down),
        KeyCode::KeyA => Some(Control::P1Left),
        KeyCode::KeyD => Some(Control::P1Right),
        KeyCode::KeyX => Some(Control::P1Fire),
        KeyCode::Digit0 => Some(Control::Reset),
        KeyCode::Digit1 => Some(Control::Select),
        KeyCode::Digit2 => Some(Control::P0Difficulty),
        KeyCode::Digit3 => Some(Control::P1Difficulty),
        _ => None,
    }
}
