use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{Field, FieldValue};
use crate::version::GameVersion;

/// Health of a playable character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub current_hp: i32,
    pub max_hp: i32,
}

impl PlayerStatus {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Health as a fraction of max, 0.0 when max is unknown
    pub fn percentage(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.current_hp.max(0) as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }
}

/// Dynamic difficulty state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStatus {
    pub rank: i32,
    pub points: i32,
}

/// One occupied enemy slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStatus {
    pub slot: usize,
    pub current_hp: i32,
    pub max_hp: i32,
}

impl EnemyStatus {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Damaged but not dead; what an overlay usually wants to show
    pub fn is_damaged(&self) -> bool {
        self.is_alive() && self.current_hp < self.max_hp
    }
}

/// Game state read from memory in a single poll.
///
/// Fields the attached build does not define are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub version: GameVersion,
    pub captured_at: DateTime<Utc>,
    pub chris: PlayerStatus,
    pub sheva: PlayerStatus,
    pub money: Option<i32>,
    pub difficulty: Option<DifficultyStatus>,
    pub igt_seconds: Option<f32>,
    pub enemies: Vec<EnemyStatus>,
}

impl GameStateSnapshot {
    /// Assemble a snapshot from decoded field values
    pub fn from_values(
        version: GameVersion,
        values: &BTreeMap<Field, FieldValue>,
        enemies: Vec<EnemyStatus>,
    ) -> Self {
        let int = |field: Field| values.get(&field).map(FieldValue::as_i32);

        let difficulty = match (int(Field::DifficultyRank), int(Field::DifficultyPoints)) {
            (Some(rank), points) => Some(DifficultyStatus {
                rank,
                points: points.unwrap_or(0),
            }),
            (None, _) => None,
        };

        Self {
            version,
            captured_at: Utc::now(),
            chris: PlayerStatus {
                current_hp: int(Field::ChrisCurrentHp).unwrap_or(0),
                max_hp: int(Field::ChrisMaxHp).unwrap_or(0),
            },
            sheva: PlayerStatus {
                current_hp: int(Field::ShevaCurrentHp).unwrap_or(0),
                max_hp: int(Field::ShevaMaxHp).unwrap_or(0),
            },
            money: int(Field::Money),
            difficulty,
            igt_seconds: values.get(&Field::IgtSeconds).map(FieldValue::as_f32),
            enemies,
        }
    }

    /// Enemies that are still alive
    pub fn living_enemies(&self) -> impl Iterator<Item = &EnemyStatus> {
        self.enemies.iter().filter(|e| e.is_alive())
    }
}
