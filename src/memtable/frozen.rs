//! Frozen memtable generations
//!
//! A frozen generation is a skip list retired from writes. It is shared
//! behind an `Arc` and never mutated again, so a flush job can iterate it
//! without holding any memtable lock.

use std::fmt;
use std::sync::Arc;

use crate::memtable::MemTableEntry;
use crate::skiplist::{Cursor, Iter, SkipList};

/// Read-only handle to one frozen generation
#[derive(Clone)]
pub struct FrozenMemTable {
    id: u64,
    table: Arc<SkipList>,
}

impl FrozenMemTable {
    pub(crate) fn new(id: u64, table: SkipList) -> Self {
        Self {
            id,
            table: Arc::new(table),
        }
    }

    /// Generation id, increasing with every freeze
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn get(&self, key: &[u8]) -> Option<&MemTableEntry> {
        self.table.get(key)
    }

    /// Entries in ascending key order (tombstones included)
    pub fn iter(&self) -> Iter<'_> {
        self.table.iter()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        self.table.cursor()
    }

    /// The underlying index, for range and prefix queries
    pub fn skiplist(&self) -> &SkipList {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.table.size_bytes()
    }
}

impl fmt::Debug for FrozenMemTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenMemTable")
            .field("id", &self.id)
            .field("len", &self.table.len())
            .field("size_bytes", &self.table.size_bytes())
            .finish()
    }
}

/// Frozen generations ordered oldest → newest, plus their byte total
#[derive(Default)]
pub(crate) struct FrozenTables {
    tables: Vec<FrozenMemTable>,
    bytes: usize,
}

impl FrozenTables {
    pub(crate) fn push(&mut self, table: FrozenMemTable) {
        self.bytes += table.size_bytes();
        self.tables.push(table);
    }

    pub(crate) fn remove(&mut self, id: u64) -> Option<FrozenMemTable> {
        let index = self.tables.iter().position(|t| t.id == id)?;
        let table = self.tables.remove(index);
        self.bytes -= table.size_bytes();
        Some(table)
    }

    /// Newest generation holding `key` wins
    pub(crate) fn get(&self, key: &[u8]) -> Option<&MemTableEntry> {
        self.tables.iter().rev().find_map(|t| t.get(key))
    }

    pub(crate) fn clear(&mut self) {
        self.tables.clear();
        self.bytes = 0;
    }

    pub(crate) fn oldest(&self) -> Option<&FrozenMemTable> {
        self.tables.first()
    }

    pub(crate) fn tables(&self) -> &[FrozenMemTable] {
        &self.tables
    }

    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }

    pub(crate) fn len(&self) -> usize {
        self.tables.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
