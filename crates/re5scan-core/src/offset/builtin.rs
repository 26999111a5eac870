//! Pointer tables for the shipped Steam builds.
//!
//! Both builds are 32-bit. Field offsets inside the player, enemy and
//! difficulty structures are shared (see `memory::layout`); only the static
//! roots moved between builds.

use super::{EnemyTableLayout, PointerChain, PointerTable};
use crate::game::{Field, ValueKind};
use crate::memory::PointerWidth;
use crate::memory::layout::{difficulty, enemy, player};
use crate::version::GameVersion;

/// Static roots inside the executable image, relative to the module base.
///
/// Not yet confirmed against retail 1.1.0 and 1.2.0 images; hosts with
/// verified values can supply their own `PointerTableSet`.
struct Roots {
    player_manager: u64,
    enemy_manager: u64,
    game_manager: u64,
    money: u64,
    igt: Option<u64>,
}

const STEAM_1_1_0_ROOTS: Roots = Roots {
    player_manager: 0x00DA_383C,
    enemy_manager: 0x00DA_23D8,
    game_manager: 0x00DA_3830,
    money: 0x00DA_3D50,
    igt: None,
};

const STEAM_1_2_0_ROOTS: Roots = Roots {
    player_manager: 0x00DA_5A5C,
    enemy_manager: 0x00DA_45F8,
    game_manager: 0x00DA_5A50,
    money: 0x00DA_5F70,
    igt: Some(0x00DA_5A84),
};

/// Partner slots inside the player manager
const CHRIS_SLOT: u64 = 0x24;
const SHEVA_SLOT: u64 = 0x28;

/// Offset of the enemy pointer array inside the enemy manager
const ENEMY_ARRAY: u64 = 0xA0;

/// Offset of the difficulty block pointer inside the game manager
const DIFFICULTY_BLOCK: u64 = 0x3C;

fn table(version: GameVersion, roots: &Roots) -> PointerTable {
    let hp = |root: u64, slot: u64, field: u64| PointerChain::new(root, &[slot, field]);

    let mut table = PointerTable::new(version, PointerWidth::U32)
        .with_field(
            Field::ChrisCurrentHp,
            hp(roots.player_manager, CHRIS_SLOT, player::CURRENT_HP),
            ValueKind::I16,
        )
        .with_field(
            Field::ChrisMaxHp,
            hp(roots.player_manager, CHRIS_SLOT, player::MAX_HP),
            ValueKind::I16,
        )
        .with_field(
            Field::ShevaCurrentHp,
            hp(roots.player_manager, SHEVA_SLOT, player::CURRENT_HP),
            ValueKind::I16,
        )
        .with_field(
            Field::ShevaMaxHp,
            hp(roots.player_manager, SHEVA_SLOT, player::MAX_HP),
            ValueKind::I16,
        )
        .with_field(Field::Money, PointerChain::fixed(roots.money), ValueKind::I32)
        .with_field(
            Field::DifficultyRank,
            PointerChain::new(roots.game_manager, &[DIFFICULTY_BLOCK, difficulty::RANK]),
            ValueKind::I32,
        )
        .with_field(
            Field::DifficultyPoints,
            PointerChain::new(roots.game_manager, &[DIFFICULTY_BLOCK, difficulty::POINTS]),
            ValueKind::I32,
        )
        .with_enemies(EnemyTableLayout {
            array: PointerChain::new(roots.enemy_manager, &[ENEMY_ARRAY]),
            capacity: enemy::SLOT_COUNT,
            current_hp_offset: enemy::CURRENT_HP,
            max_hp_offset: enemy::MAX_HP,
            hp_kind: ValueKind::I32,
        });

    if let Some(igt) = roots.igt {
        table = table.with_field(Field::IgtSeconds, PointerChain::fixed(igt), ValueKind::F32);
    }

    table
}

pub(super) fn steam_1_1_0() -> PointerTable {
    table(GameVersion::Steam110, &STEAM_1_1_0_ROOTS)
}

pub(super) fn steam_1_2_0() -> PointerTable {
    table(GameVersion::Steam120, &STEAM_1_2_0_ROOTS)
}
