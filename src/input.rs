use crate::movement::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Solve,
}

/// Maps a `KeyboardEvent.key` value. Unmapped keys return `None` and keep their
/// browser default.
pub fn map_key(key: &str) -> Option<KeyAction> {
    let action = match key {
        "ArrowUp" | "w" | "W" => KeyAction::Move(Direction::Up),
        "ArrowDown" | "s" | "S" => KeyAction::Move(Direction::Down),
        "ArrowLeft" | "a" | "A" => KeyAction::Move(Direction::Left),
        "ArrowRight" | "d" | "D" => KeyAction::Move(Direction::Right),
        "e" | "E" => KeyAction::Solve,
        _ => return None,
    };
    Some(action)
}
