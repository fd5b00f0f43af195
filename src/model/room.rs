//! Room model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::RoomId;

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Display code (e.g. `"322"`).
    pub code: String,
    /// Whether the room is air-conditioned.
    pub has_ac: bool,
    /// Seating capacity.
    pub capacity: u32,
}

impl Room {
    /// Creates a room with the default capacity of 40.
    pub fn new(id: RoomId, code: impl Into<String>, has_ac: bool) -> Self {
        Self {
            id,
            code: code.into(),
            has_ac,
            capacity: 40,
        }
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let room = Room::new(322, "322", true).with_capacity(35);
        assert_eq!(room.id, 322);
        assert_eq!(room.code, "322");
        assert!(room.has_ac);
        assert_eq!(room.capacity, 35);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(Room::new(1, "101", false).capacity, 40);
    }
}
