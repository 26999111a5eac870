use std::collections::BTreeMap;

use crate::game::Field;

/// Absolute addresses produced by one walk of a pointer table.
///
/// Bound to the process it was built against; a set built for one pid must
/// never be used to read another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAddressSet {
    pid: u32,
    fields: BTreeMap<Field, u64>,
    enemies: Vec<(usize, u64)>,
}

impl ResolvedAddressSet {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            ..Default::default()
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn is_valid_for(&self, pid: u32) -> bool {
        self.pid == pid
    }

    pub fn insert(&mut self, field: Field, address: u64) {
        self.fields.insert(field, address);
    }

    pub fn address(&self, field: Field) -> Option<u64> {
        self.fields.get(&field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, u64)> + '_ {
        self.fields.iter().map(|(f, a)| (*f, *a))
    }

    pub(crate) fn push_enemy(&mut self, slot: usize, address: u64) {
        self.enemies.push((slot, address));
    }

    /// Occupied enemy slots as (slot index, object address)
    pub fn enemies(&self) -> &[(usize, u64)] {
        &self.enemies
    }
}
