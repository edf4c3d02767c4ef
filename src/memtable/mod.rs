//! MemTable Module
//!
//! In-memory write buffer for recent writes.
//!
//! ## Responsibilities
//! - Absorb writes into one mutable (active) skip list
//! - Retire the active skip list into an immutable (frozen) generation on demand
//! - Read across active + frozen generations, freshest value wins
//! - Track byte sizes for flush triggers
//!
//! ## Layout
//! ```text
//!   writes ──► ┌──────────────┐
//!              │    active    │  RwLock (taken first)
//!              └──────┬───────┘
//!                     │ freeze()
//!                     ▼
//!   ┌──────────┬──────────┬──────────┐
//!   │ frozen 1 │ frozen 2 │ frozen 3 │  RwLock (taken second)
//!   └──────────┴──────────┴──────────┘
//!     oldest                 newest
//! ```
//!
//! Reads go active → frozen newest → frozen oldest.

mod frozen;
mod layers;
mod table;

use bytes::Bytes;

pub use frozen::FrozenMemTable;
pub use table::MemTable;

/// Entry stored in the MemTable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemTableEntry {
    /// A live value (may be empty)
    Value(Bytes),

    /// A tombstone (deleted key)
    Tombstone,
}

impl MemTableEntry {
    /// The live value, or `None` for a tombstone
    pub fn value(&self) -> Option<&Bytes> {
        match self {
            MemTableEntry::Value(value) => Some(value),
            MemTableEntry::Tombstone => None,
        }
    }

    /// Consume the entry, keeping only a live value
    pub fn into_value(self) -> Option<Bytes> {
        match self {
            MemTableEntry::Value(value) => Some(value),
            MemTableEntry::Tombstone => None,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, MemTableEntry::Tombstone)
    }

    /// Bytes charged for the value part of an entry.
    /// A tombstone is charged for its key only.
    pub fn value_len(&self) -> usize {
        match self {
            MemTableEntry::Value(value) => value.len(),
            MemTableEntry::Tombstone => 0,
        }
    }
}

impl From<Bytes> for MemTableEntry {
    fn from(value: Bytes) -> Self {
        MemTableEntry::Value(value)
    }
}

impl From<Vec<u8>> for MemTableEntry {
    fn from(value: Vec<u8>) -> Self {
        MemTableEntry::Value(Bytes::from(value))
    }
}

impl From<&'static [u8]> for MemTableEntry {
    fn from(value: &'static [u8]) -> Self {
        MemTableEntry::Value(Bytes::from_static(value))
    }
}

impl From<&'static str> for MemTableEntry {
    fn from(value: &'static str) -> Self {
        MemTableEntry::Value(Bytes::from_static(value.as_bytes()))
    }
}

impl From<String> for MemTableEntry {
    fn from(value: String) -> Self {
        MemTableEntry::Value(Bytes::from(value))
    }
}
