use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A quantity tracked through a pointer chain.
///
/// Not every build defines every field; a table only carries the chains
/// that are known for its build.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ChrisCurrentHp,
    ChrisMaxHp,
    ShevaCurrentHp,
    ShevaMaxHp,
    Money,
    DifficultyRank,
    DifficultyPoints,
    IgtSeconds,
    /// Start of the enemy slot array
    EnemyTable,
}

/// How the bytes at a resolved address are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    I16,
    I32,
    U32,
    F32,
}

impl ValueKind {
    pub fn size(self) -> usize {
        match self {
            Self::I16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
        }
    }
}

/// A decoded field value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f32),
}

impl FieldValue {
    pub fn decode(kind: ValueKind, bytes: &[u8]) -> Option<Self> {
        if bytes.len() < kind.size() {
            return None;
        }
        let value = match kind {
            ValueKind::I16 => Self::Int(i16::from_le_bytes([bytes[0], bytes[1]]).into()),
            ValueKind::I32 => {
                Self::Int(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).into())
            }
            ValueKind::U32 => {
                Self::Int(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).into())
            }
            ValueKind::F32 => {
                Self::Float(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        };
        Some(value)
    }

    pub fn as_i32(&self) -> i32 {
        match *self {
            Self::Int(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            Self::Float(v) => v as i32,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            Self::Int(v) => v as f32,
            Self::Float(v) => v,
        }
    }
}
