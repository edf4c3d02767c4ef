//! MemTable implementation
//!
//! One active skip list plus frozen generations, each layer behind its own
//! RwLock.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{Result, TierError};
use crate::skiplist::SkipList;

use super::frozen::{FrozenMemTable, FrozenTables};
use super::layers::Layers;
use super::MemTableEntry;

/// Layered write buffer
///
/// ## Concurrency Model
///
/// - **Writes** (put/remove and batches): exclusive lock on the active layer only
/// - **Reads** (get/get_batch): shared active lock, then shared frozen lock
/// - **freeze / clear**: exclusive on both, active first
/// - **drop_frozen**: exclusive on the frozen layer only
///
/// The skip lists themselves are unsynchronized; every access goes through
/// the layer locks.
pub struct MemTable {
    /// Memtable configuration
    config: Config,

    /// Active skip list and frozen generations
    layers: Layers<SkipList, FrozenTables>,

    /// Id the current active layer will carry once frozen
    active_id: AtomicU64,
}

impl MemTable {
    /// Create an empty memtable with default config
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// Create an empty memtable with the given config
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        let first_id = 1;
        let active = Self::new_active(&config, first_id);
        Self {
            config,
            layers: Layers::new(active, FrozenTables::default()),
            active_id: AtomicU64::new(first_id),
        }
    }

    /// Fresh skip list for generation `id`
    fn new_active(config: &Config, id: u64) -> SkipList {
        match config.rng_seed {
            Some(seed) => SkipList::with_seed(config.max_level, seed.wrapping_add(id)),
            None => SkipList::with_max_level(config.max_level),
        }
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Put a key-value pair (write lock on the active layer)
    ///
    /// Returns the active layer's size in bytes after the write.
    pub fn put(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> usize {
        let mut active = self.layers.write_active();
        active.put(key, MemTableEntry::Value(value.into()));
        active.size_bytes()
    }

    /// Delete a key (write lock, inserts tombstone)
    ///
    /// Frozen generations are never touched; the tombstone shadows them.
    pub fn remove(&self, key: impl Into<Bytes>) -> usize {
        let mut active = self.layers.write_active();
        active.put(key, MemTableEntry::Tombstone);
        active.size_bytes()
    }

    /// Put every pair under one write lock; readers see all or none of it.
    ///
    /// Fails with `InvalidArgument` before locking if the lengths differ.
    pub fn put_batch<K, V>(&self, keys: Vec<K>, values: Vec<V>) -> Result<usize>
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        if keys.len() != values.len() {
            warn!(
                keys = keys.len(),
                values = values.len(),
                "rejecting put batch with mismatched lengths"
            );
            return Err(TierError::InvalidArgument(format!(
                "put_batch got {} keys and {} values",
                keys.len(),
                values.len()
            )));
        }

        let count = keys.len();
        let mut active = self.layers.write_active();
        for (key, value) in keys.into_iter().zip(values) {
            active.put(key, MemTableEntry::Value(value.into()));
        }
        trace!(count, size = active.size_bytes(), "applied put batch");

        Ok(active.size_bytes())
    }

    /// Tombstone every key under one write lock
    pub fn remove_batch<K>(&self, keys: Vec<K>) -> usize
    where
        K: Into<Bytes>,
    {
        let count = keys.len();
        let mut active = self.layers.write_active();
        for key in keys {
            active.put(key, MemTableEntry::Tombstone);
        }
        trace!(count, size = active.size_bytes(), "applied remove batch");

        active.size_bytes()
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Get the freshest entry for a key
    ///
    /// Search order:
    /// 1. Active layer
    /// 2. Frozen layers (newest to oldest)
    ///
    /// Returns:
    /// - `Some(MemTableEntry::Value(v))`: live value
    /// - `Some(MemTableEntry::Tombstone)`: key was deleted
    /// - `None`: key never written to any buffered generation
    pub fn get(&self, key: &[u8]) -> Option<MemTableEntry> {
        let active = self.layers.read_active();
        if let Some(entry) = active.get(key) {
            return Some(entry.clone());
        }

        let layers = active.with_frozen();
        layers.frozen.get(key).cloned()
    }

    /// Look up many keys against one consistent view of both layers.
    ///
    /// The result has one slot per requested key, in request order.
    pub fn get_batch<K>(&self, keys: &[K]) -> Vec<Option<MemTableEntry>>
    where
        K: AsRef<[u8]>,
    {
        let layers = self.layers.read_both();
        keys.iter()
            .map(|key| {
                let key = key.as_ref();
                layers
                    .active
                    .get(key)
                    .or_else(|| layers.frozen.get(key))
                    .cloned()
            })
            .collect()
    }

    // =========================================================================
    // Flush Hooks
    // =========================================================================

    /// Retire the active layer into the frozen list and start a new one.
    ///
    /// Readers see the same data before and after. Returns the new frozen
    /// generation, or `None` (and does nothing) if the active layer is empty.
    pub fn freeze(&self) -> Option<FrozenMemTable> {
        let mut layers = self.layers.write_both();
        let (active, frozen) = layers.split();

        if active.is_empty() {
            return None;
        }

        let id = self.active_id.fetch_add(1, Ordering::SeqCst);
        let retired = std::mem::replace(active, Self::new_active(&self.config, id + 1));
        let table = FrozenMemTable::new(id, retired);
        frozen.push(table.clone());

        debug!(
            id,
            entries = table.len(),
            size = table.size_bytes(),
            frozen_count = frozen.len(),
            frozen_bytes = frozen.bytes(),
            "froze active memtable"
        );

        Some(table)
    }

    /// Forget a frozen generation once it has been persisted.
    ///
    /// Returns the removed generation, or `None` for an unknown id.
    pub fn drop_frozen(&self, id: u64) -> Option<FrozenMemTable> {
        let mut frozen = self.layers.write_frozen();
        let table = frozen.remove(id)?;

        debug!(
            id,
            size = table.size_bytes(),
            frozen_count = frozen.len(),
            frozen_bytes = frozen.bytes(),
            "dropped frozen memtable"
        );

        Some(table)
    }

    /// Oldest frozen generation (the next one to flush)
    pub fn oldest_frozen(&self) -> Option<FrozenMemTable> {
        self.layers.read_frozen().oldest().cloned()
    }

    /// Snapshot of the frozen generations, oldest first
    pub fn frozen_tables(&self) -> Vec<FrozenMemTable> {
        self.layers.read_frozen().tables().to_vec()
    }

    /// Check if the active layer has reached the configured size limit
    pub fn should_freeze(&self) -> bool {
        self.active_size() >= self.config.memtable_size_limit
    }

    /// Discard all buffered state, frozen generations included
    pub fn clear(&self) {
        let mut layers = self.layers.write_both();
        let dropped = layers.frozen.len();
        let bytes = layers.active.size_bytes() + layers.frozen.bytes();

        layers.frozen.clear();
        layers.active.clear();

        debug!(dropped_frozen = dropped, bytes, "cleared memtable");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Byte size of the active layer
    pub fn active_size(&self) -> usize {
        self.layers.read_active().size_bytes()
    }

    /// Entry count of the active layer (tombstones included)
    pub fn active_len(&self) -> usize {
        self.layers.read_active().len()
    }

    /// Byte size across all frozen generations
    pub fn frozen_bytes(&self) -> usize {
        self.layers.read_frozen().bytes()
    }

    pub fn frozen_count(&self) -> usize {
        self.layers.read_frozen().len()
    }

    /// Active + frozen byte size
    pub fn total_size(&self) -> usize {
        let layers = self.layers.read_both();
        layers.active.size_bytes() + layers.frozen.bytes()
    }

    pub fn is_empty(&self) -> bool {
        let layers = self.layers.read_both();
        layers.active.is_empty() && layers.frozen.is_empty()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}
