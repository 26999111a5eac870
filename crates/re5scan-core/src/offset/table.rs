use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PointerChain, ResolvedAddressSet, builtin};
use crate::error::Result;
use crate::game::{Field, ValueKind};
use crate::memory::{PointerWidth, ReadMemory, decode_pointers};
use crate::version::GameVersion;

/// Where a field lives and how to decode it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub chain: PointerChain,
    pub kind: ValueKind,
}

/// Fixed-capacity array of enemy object pointers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTableLayout {
    /// Chain to the first slot of the array
    pub array: PointerChain,
    pub capacity: usize,
    pub current_hp_offset: u64,
    pub max_hp_offset: u64,
    pub hp_kind: ValueKind,
}

/// All pointer chains for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerTable {
    pub version: GameVersion,
    pub width: PointerWidth,
    pub fields: BTreeMap<Field, FieldLayout>,
    pub enemies: Option<EnemyTableLayout>,
}

impl PointerTable {
    pub fn new(version: GameVersion, width: PointerWidth) -> Self {
        Self {
            version,
            width,
            fields: BTreeMap::new(),
            enemies: None,
        }
    }

    pub fn with_field(mut self, field: Field, chain: PointerChain, kind: ValueKind) -> Self {
        self.fields.insert(field, FieldLayout { chain, kind });
        self
    }

    pub fn with_enemies(mut self, layout: EnemyTableLayout) -> Self {
        self.enemies = Some(layout);
        self
    }

    pub fn field(&self, field: Field) -> Option<&FieldLayout> {
        self.fields.get(&field)
    }

    /// Walk every chain in the table.
    ///
    /// All-or-nothing: the first failing chain fails the whole set.
    pub fn resolve_all<R: ReadMemory + ?Sized>(
        &self,
        reader: &R,
        module_base: u64,
        pid: u32,
    ) -> Result<ResolvedAddressSet> {
        let mut set = ResolvedAddressSet::new(pid);

        for (field, layout) in &self.fields {
            let address = layout
                .chain
                .resolve(reader, module_base, self.width)
                .inspect_err(|e| debug!("Failed to resolve {} {}: {}", field, layout.chain, e))?;
            set.insert(*field, address);
        }

        if let Some(enemies) = &self.enemies {
            let array = enemies
                .array
                .resolve(reader, module_base, self.width)
                .inspect_err(|e| debug!("Failed to resolve enemy table {}: {}", enemies.array, e))?;
            set.insert(Field::EnemyTable, array);

            let bytes = reader.read_bytes(array, enemies.capacity * self.width.size())?;
            for (slot, pointer) in decode_pointers(&bytes, self.width).into_iter().enumerate() {
                if pointer != 0 {
                    set.push_enemy(slot, pointer);
                }
            }
        }

        Ok(set)
    }
}

/// Immutable mapping from build to pointer table.
///
/// `Unknown` never has a table.
#[derive(Debug, Clone, Default)]
pub struct PointerTableSet {
    tables: HashMap<GameVersion, PointerTable>,
}

impl PointerTableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables for every build in `version::KNOWN_BUILDS`
    pub fn builtin() -> Self {
        Self::new()
            .with_table(builtin::steam_1_1_0())
            .with_table(builtin::steam_1_2_0())
    }

    /// Add a table, keyed by its version. Tables for `Unknown` are ignored.
    pub fn with_table(mut self, table: PointerTable) -> Self {
        if table.version.is_known() {
            self.tables.insert(table.version, table);
        }
        self
    }

    pub fn get(&self, version: GameVersion) -> Option<&PointerTable> {
        self.tables.get(&version)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
