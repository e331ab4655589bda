use winit::keyboard::KeyCode;

use crate::engine::components::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    ToggleCamera,
    Exit,
}

pub fn action_for(key: KeyCode) -> Option<KeyAction> {
    let action = match key {
        KeyCode::KeyW => KeyAction::Move(Direction::Front),
        KeyCode::KeyS => KeyAction::Move(Direction::Back),
        KeyCode::KeyA => KeyAction::Move(Direction::Left),
        KeyCode::KeyD => KeyAction::Move(Direction::Right),
        KeyCode::Space => KeyAction::Move(Direction::Up),
        KeyCode::ShiftLeft => KeyAction::Move(Direction::Down),
        KeyCode::KeyC => KeyAction::ToggleCamera,
        KeyCode::Escape => KeyAction::Exit,
        _ => {
            return None;
        }
    };
    Some(action)
}
