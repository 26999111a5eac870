//! Memory layout constants for the game's data structures
//!
//! Struct-relative field offsets shared by every supported build. Base
//! offsets and pointer chains differ per build and live in
//! `offset::builtin`.

/// Player character object (one per partner slot)
pub mod player {
    /// Current health (i16)
    pub const CURRENT_HP: u64 = 0x1364;
    /// Maximum health (i16)
    pub const MAX_HP: u64 = 0x1366;
}

/// Enemy object referenced from the enemy slot array
pub mod enemy {
    /// Current health (i32)
    pub const CURRENT_HP: u64 = 0x1364;
    /// Maximum health (i32)
    pub const MAX_HP: u64 = 0x1368;

    /// Number of slots in the enemy pointer array
    pub const SLOT_COUNT: usize = 32;
}

/// Difficulty adjustment block inside the game manager
pub mod difficulty {
    /// Current rank, 0..=10 (i32)
    pub const RANK: u64 = 0x2C;
    /// Points accumulated towards the next rank change (i32)
    pub const POINTS: u64 = 0x30;
}
