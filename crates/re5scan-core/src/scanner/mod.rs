//! Memory scanner: owns the attached process and its resolved addresses.
//!
//! The scanner is driven from outside. The host (see `monitor`) decides when
//! to re-resolve pointers and when to poll; the scanner only guarantees that
//! it never reads through addresses resolved for a different process.

mod timer;

pub use timer::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use strum::Display;
use tracing::{debug, info};

use crate::error::{Error, ReadErrorKind, Result};
use crate::game::{EnemyStatus, FieldValue, GameStateSnapshot, ValueKind};
use crate::offset::{PointerTable, PointerTableSet, ResolvedAddressSet};
use crate::process::GameProcess;
use crate::version::GameVersion;

/// Lifecycle state of a scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScannerState {
    Unattached,
    /// Holding a process, nothing resolved yet
    Attached,
    /// Holding a process and a resolved address set
    Resolved,
    /// Torn down by `dispose`
    Detached,
}

struct Session<P> {
    process: P,
    version: GameVersion,
    table: PointerTable,
    resolved: Option<ResolvedAddressSet>,
}

pub struct MemoryScanner<P: GameProcess> {
    tables: Arc<PointerTableSet>,
    session: Option<Session<P>>,
    detached: bool,
}

impl<P: GameProcess> MemoryScanner<P> {
    pub fn new(tables: Arc<PointerTableSet>) -> Self {
        Self {
            tables,
            session: None,
            detached: false,
        }
    }

    /// Scanner over the built-in tables
    pub fn builtin() -> Self {
        Self::new(Arc::new(PointerTableSet::builtin()))
    }

    pub fn state(&self) -> ScannerState {
        match &self.session {
            Some(s) if s.resolved.is_some() => ScannerState::Resolved,
            Some(_) => ScannerState::Attached,
            None if self.detached => ScannerState::Detached,
            None => ScannerState::Unattached,
        }
    }

    /// Attach to `process`, replacing any previous process and discarding
    /// its resolved addresses.
    ///
    /// Fails with `UnsupportedVersion` when no table exists for `version`;
    /// the process is dropped (and its handle closed) in that case.
    pub fn initialize(&mut self, process: P, version: GameVersion) -> Result<()> {
        self.session = None;

        let table = self
            .tables
            .get(version)
            .cloned()
            .ok_or(Error::UnsupportedVersion(version))?;

        info!(
            "Attached to pid {} ({}, base: {:#x})",
            process.pid(),
            version,
            process.base_address()
        );

        self.session = Some(Session {
            process,
            version,
            table,
            resolved: None,
        });
        self.detached = false;
        Ok(())
    }

    pub fn is_process_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.process.is_running())
    }

    /// Re-walk every pointer chain.
    ///
    /// The previous set is dropped before walking, so a failure leaves the
    /// scanner with nothing resolved rather than with stale addresses.
    pub fn update_pointers(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(Error::NotAttached)?;
        session.resolved = None;

        let process = &session.process;
        let resolved = session
            .table
            .resolve_all(process, process.base_address(), process.pid())?;
        debug!(
            "Resolved {} fields and {} enemy slots for pid {}",
            resolved.fields().count(),
            resolved.enemies().len(),
            process.pid()
        );
        session.resolved = Some(resolved);
        Ok(())
    }

    /// Read the resolved addresses into a snapshot
    pub fn refresh(&self, version: GameVersion) -> Result<GameStateSnapshot> {
        let session = self.session.as_ref().ok_or(Error::NotAttached)?;
        if session.version != version {
            return Err(Error::VersionMismatch {
                attached: session.version,
                requested: version,
            });
        }

        let process = &session.process;
        let resolved = session
            .resolved
            .as_ref()
            .filter(|r| r.is_valid_for(process.pid()))
            .ok_or(Error::PointersNotResolved)?;

        let mut values = BTreeMap::new();
        for (field, layout) in &session.table.fields {
            let Some(address) = resolved.address(*field) else {
                return Err(Error::PointersNotResolved);
            };
            values.insert(*field, read_value(process, address, layout.kind)?);
        }

        let mut enemies = Vec::new();
        if let Some(layout) = &session.table.enemies {
            for &(slot, base) in resolved.enemies() {
                // Slot pointers come from the game and may be garbage mid-update
                let max_hp_address = base.wrapping_add(layout.max_hp_offset);
                let current_hp_address = base.wrapping_add(layout.current_hp_offset);
                let max_hp = read_value(process, max_hp_address, layout.hp_kind)?;
                let current_hp = read_value(process, current_hp_address, layout.hp_kind)?;
                let status = EnemyStatus {
                    slot,
                    current_hp: current_hp.as_i32(),
                    max_hp: max_hp.as_i32(),
                };
                // Freed slots keep their pointer with zeroed health
                if status.max_hp > 0 {
                    enemies.push(status);
                }
            }
        }

        Ok(GameStateSnapshot::from_values(version, &values, enemies))
    }

    /// Release the process and everything resolved for it. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Detached from pid {}", session.process.pid());
        }
        self.detached = true;
    }

    pub fn version(&self) -> Option<GameVersion> {
        self.session.as_ref().map(|s| s.version)
    }

    pub fn process(&self) -> Option<&P> {
        self.session.as_ref().map(|s| &s.process)
    }

    pub fn resolved(&self) -> Option<&ResolvedAddressSet> {
        self.session.as_ref().and_then(|s| s.resolved.as_ref())
    }
}

fn read_value<P: GameProcess>(process: &P, address: u64, kind: ValueKind) -> Result<FieldValue> {
    let bytes = process.read_bytes(address, kind.size())?;
    FieldValue::decode(kind, &bytes)
        .ok_or_else(|| Error::read_failed(address, ReadErrorKind::PartialCopy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Field;
    use crate::memory::{MockMemoryBuilder, MockProcess, PointerWidth};
    use crate::offset::{EnemyTableLayout, PointerChain};

    const BASE: u64 = 0x0040_0000;
    const PLAYER: u64 = 0x0100_0000;
    const ENEMY_ARRAY: u64 = 0x0200_0000;
    const ENEMY_A: u64 = 0x0300_0000;
    const ENEMY_B: u64 = 0x0310_0000;

    fn tables() -> Arc<PointerTableSet> {
        let table = PointerTable::new(GameVersion::Steam120, PointerWidth::U32)
            .with_field(
                Field::ChrisCurrentHp,
                PointerChain::new(0x10, &[0x4]),
                ValueKind::I16,
            )
            .with_field(
                Field::ChrisMaxHp,
                PointerChain::new(0x10, &[0x6]),
                ValueKind::I16,
            )
            .with_field(Field::Money, PointerChain::fixed(0x40), ValueKind::I32)
            .with_enemies(EnemyTableLayout {
                array: PointerChain::new(0x20, &[0]),
                capacity: 3,
                current_hp_offset: 0x8,
                max_hp_offset: 0xC,
                hp_kind: ValueKind::I32,
            });
        Arc::new(PointerTableSet::new().with_table(table))
    }

    fn game(pid: u32, player: u64) -> MockProcess {
        MockMemoryBuilder::new()
            .pid(pid)
            .base_address(BASE)
            .with_u32(BASE + 0x10, player as u32)
            .with_i16(player + 0x4, 850)
            .with_i16(player + 0x6, 1000)
            .with_i32(BASE + 0x40, 12_345)
            .with_u32(BASE + 0x20, ENEMY_ARRAY as u32)
            .with_u32(ENEMY_ARRAY, ENEMY_A as u32)
            .with_u32(ENEMY_ARRAY + 4, 0)
            .with_u32(ENEMY_ARRAY + 8, ENEMY_B as u32)
            .with_i32(ENEMY_A + 0x8, 300)
            .with_i32(ENEMY_A + 0xC, 400)
            .with_i32(ENEMY_B + 0x8, 0)
            .with_i32(ENEMY_B + 0xC, 0)
            .build()
    }

    fn attached() -> (MemoryScanner<MockProcess>, MockProcess) {
        let process = game(1, PLAYER);
        let mut scanner = MemoryScanner::new(tables());
        scanner
            .initialize(process.clone(), GameVersion::Steam120)
            .unwrap();
        (scanner, process)
    }

    #[test]
    fn test_refresh_reads_snapshot() {
        let (mut scanner, _process) = attached();
        scanner.update_pointers().unwrap();
        assert_eq!(scanner.state(), ScannerState::Resolved);

        let snapshot = scanner.refresh(GameVersion::Steam120).unwrap();
        assert_eq!(snapshot.version, GameVersion::Steam120);
        assert_eq!(snapshot.chris.current_hp, 850);
        assert_eq!(snapshot.chris.max_hp, 1000);
        assert_eq!(snapshot.money, Some(12_345));
        // Slot 2 has zero max health and is skipped
        assert_eq!(
            snapshot.enemies,
            vec![EnemyStatus {
                slot: 0,
                current_hp: 300,
                max_hp: 400
            }]
        );
    }

    #[test]
    fn test_refresh_before_update_pointers() {
        let (scanner, _process) = attached();
        assert_eq!(scanner.state(), ScannerState::Attached);
        assert!(matches!(
            scanner.refresh(GameVersion::Steam120),
            Err(Error::PointersNotResolved)
        ));
    }

    #[test]
    fn test_refresh_unattached() {
        let mut scanner = MemoryScanner::<MockProcess>::new(tables());
        assert_eq!(scanner.state(), ScannerState::Unattached);
        assert!(matches!(
            scanner.refresh(GameVersion::Steam120),
            Err(Error::NotAttached)
        ));
        assert!(matches!(scanner.update_pointers(), Err(Error::NotAttached)));
        assert!(!scanner.is_process_running());
    }

    #[test]
    fn test_refresh_version_mismatch() {
        let (mut scanner, _process) = attached();
        scanner.update_pointers().unwrap();
        assert!(matches!(
            scanner.refresh(GameVersion::Steam110),
            Err(Error::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_update_pointers_reflects_latest_memory() {
        let (mut scanner, process) = attached();
        scanner.update_pointers().unwrap();
        assert_eq!(
            scanner.resolved().unwrap().address(Field::ChrisCurrentHp),
            Some(PLAYER + 0x4)
        );

        // Area transition: the player object moves
        let moved = 0x0180_0000u64;
        process.write_u32(BASE + 0x10, moved as u32);
        process.write_i16(moved + 0x4, 120);
        process.write_i16(moved + 0x6, 1000);

        scanner.update_pointers().unwrap();
        assert_eq!(
            scanner.resolved().unwrap().address(Field::ChrisCurrentHp),
            Some(moved + 0x4)
        );
        let snapshot = scanner.refresh(GameVersion::Steam120).unwrap();
        assert_eq!(snapshot.chris.current_hp, 120);
    }

    #[test]
    fn test_failed_update_clears_resolved_set() {
        let (mut scanner, process) = attached();
        scanner.update_pointers().unwrap();

        process.write_u32(BASE + 0x10, 0);
        let err = scanner.update_pointers().unwrap_err();
        assert!(err.is_transient());
        assert_eq!(scanner.state(), ScannerState::Attached);
        assert!(matches!(
            scanner.refresh(GameVersion::Steam120),
            Err(Error::PointersNotResolved)
        ));
    }

    #[test]
    fn test_refresh_uses_cached_addresses() {
        let (mut scanner, process) = attached();
        scanner.update_pointers().unwrap();

        // Value changes are visible without re-resolving
        process.write_i16(PLAYER + 0x4, 10);
        let snapshot = scanner.refresh(GameVersion::Steam120).unwrap();
        assert_eq!(snapshot.chris.current_hp, 10);
    }

    #[test]
    fn test_process_exit_and_reattach() {
        let (mut scanner, process) = attached();
        scanner.update_pointers().unwrap();
        assert!(scanner.is_process_running());

        process.kill();
        assert!(!scanner.is_process_running());
        assert!(
            scanner
                .refresh(GameVersion::Steam120)
                .unwrap_err()
                .is_partial_copy()
        );

        let restarted = game(2, 0x0110_0000);
        scanner
            .initialize(restarted, GameVersion::Steam120)
            .unwrap();
        assert!(scanner.is_process_running());
        assert_eq!(scanner.state(), ScannerState::Attached);
        assert_eq!(scanner.process().unwrap().pid(), 2);

        scanner.update_pointers().unwrap();
        assert_eq!(scanner.resolved().unwrap().pid(), 2);
        assert!(scanner.refresh(GameVersion::Steam120).is_ok());
    }

    #[test]
    fn test_garbage_enemy_slot_pointer_is_a_read_failure() {
        let garbage = 0xFFFF_FFFF_FFFF_F000u64;
        let table = PointerTable::new(GameVersion::Steam120, PointerWidth::U64).with_enemies(
            EnemyTableLayout {
                array: PointerChain::new(0x20, &[0]),
                capacity: 1,
                current_hp_offset: 0x1364,
                max_hp_offset: 0x1368,
                hp_kind: ValueKind::I32,
            },
        );
        let process = MockMemoryBuilder::new()
            .base_address(BASE)
            .with_bytes(BASE + 0x20, &ENEMY_ARRAY.to_le_bytes())
            .with_bytes(ENEMY_ARRAY, &garbage.to_le_bytes())
            .build();

        let mut scanner = MemoryScanner::new(Arc::new(PointerTableSet::new().with_table(table)));
        scanner.initialize(process, GameVersion::Steam120).unwrap();
        scanner.update_pointers().unwrap();
        assert_eq!(scanner.resolved().unwrap().enemies(), &[(0, garbage)]);

        let err = scanner.refresh(GameVersion::Steam120).unwrap_err();
        assert!(err.is_partial_copy());
    }

    #[test]
    fn test_initialize_unknown_version() {
        let mut scanner = MemoryScanner::new(tables());
        let err = scanner
            .initialize(game(1, PLAYER), GameVersion::Unknown)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(GameVersion::Unknown)));
        assert_eq!(scanner.state(), ScannerState::Unattached);
    }

    #[test]
    fn test_initialize_without_table_drops_previous_session() {
        let (mut scanner, _process) = attached();
        assert!(
            scanner
                .initialize(game(2, PLAYER), GameVersion::Steam110)
                .is_err()
        );
        assert!(scanner.process().is_none());
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut never_attached = MemoryScanner::<MockProcess>::new(tables());
        never_attached.dispose();
        never_attached.dispose();
        assert_eq!(never_attached.state(), ScannerState::Detached);

        let (mut scanner, _process) = attached();
        scanner.update_pointers().unwrap();
        scanner.dispose();
        scanner.dispose();
        assert_eq!(scanner.state(), ScannerState::Detached);
        assert!(scanner.resolved().is_none());
        assert!(!scanner.is_process_running());
    }
}
