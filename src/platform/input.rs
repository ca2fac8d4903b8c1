//! Keyboard input capture
//!
//! Press/release events arrive asynchronously from the browser; the
//! simulation only ever sees a [`HeldKeys`] snapshot taken once per tick.

use serde::{Deserialize, Serialize};

/// A logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Map a `KeyboardEvent.key` value to a direction.
    ///
    /// Arrow keys and WASD are recognised; anything else is ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Left => 1 << 0,
            Direction::Right => 1 << 1,
            Direction::Up => 1 << 2,
            Direction::Down => 1 << 3,
        }
    }
}

/// Set of directions currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn press(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn release(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Drop everything (focus loss can swallow keyup events)
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Held directions in a fixed order: Left, Right, Up, Down
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.contains(*d))
    }

    /// Apply a raw key event. Returns false for keys that are not directions.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        match Direction::from_key(key) {
            Some(dir) if pressed => {
                self.press(dir);
                true
            }
            Some(dir) => {
                self.release(dir);
                true
            }
            None => false,
        }
    }
}

impl FromIterator<Direction> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut keys = HeldKeys::new();
        for dir in iter {
            keys.press(dir);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("w"), Some(Direction::Up));
        assert_eq!(Direction::from_key("Enter"), None);
        assert_eq!(Direction::from_key(" "), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut keys = HeldKeys::new();
        assert!(keys.is_empty());

        keys.press(Direction::Left);
        keys.press(Direction::Up);
        assert!(keys.contains(Direction::Left));
        assert!(keys.contains(Direction::Up));
        assert!(!keys.contains(Direction::Right));

        keys.release(Direction::Left);
        assert!(!keys.contains(Direction::Left));
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec![Direction::Up]);

        keys.clear();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_handle_key_ignores_unknown_keys() {
        let mut keys = HeldKeys::new();
        assert!(!keys.handle_key("q", true));
        assert!(keys.is_empty());

        assert!(keys.handle_key("ArrowDown", true));
        assert!(keys.contains(Direction::Down));
        assert!(keys.handle_key("ArrowDown", false));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_collect_from_directions() {
        let keys: HeldKeys = [Direction::Right, Direction::Down, Direction::Right]
            .into_iter()
            .collect();
        assert_eq!(
            keys.iter().collect::<Vec<_>>(),
            vec![Direction::Right, Direction::Down]
        );
    }
}
