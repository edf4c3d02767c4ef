//! Skip List Module
//!
//! Ordered index backing every memtable generation.
//!
//! ## Responsibilities
//! - O(log n) expected point lookup, insert, update and remove
//! - Ordered forward iteration over the bottom level
//! - Range location from a monotonic key predicate
//! - Running byte total (`key.len() + value.len()` per entry)
//!
//! ## Structure
//! ```text
//! Level 3:  HEAD ──────────────────────────────► 50 ──────────► NIL
//! Level 2:  HEAD ──────────► 20 ────────────────► 50 ──────────► NIL
//! Level 1:  HEAD ──► 10 ──► 20 ────► 35 ────────► 50 ──► 60 ──► NIL
//! Level 0:  HEAD ──► 10 ──► 20 ──► 25 ──► 35 ──► 50 ──► 60 ──► NIL
//! ```
//!
//! Nodes live in an arena (`Vec<Node>`) and link to each other by index.
//! Forward links define the structure; backward links are plain indices
//! kept in sync for reverse walks and never decide a node's lifetime.
//! Slots of removed nodes go on a free list and are reused by later inserts.
//!
//! Not thread-safe on its own: `MemTable` provides the locking.

mod cursor;

use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, DEFAULT_MAX_LEVEL, MAX_LEVEL_LIMIT};
use crate::error::Result;
use crate::memtable::MemTableEntry;

pub use cursor::{Cursor, CursorRange, Iter};

/// Arena index of a node
pub(crate) type NodeId = usize;

/// Arena slot of the sentinel head
pub(crate) const HEAD: NodeId = 0;

/// Predecessors recorded during a descent, one per level
type UpdateSet = [NodeId; MAX_LEVEL_LIMIT];

/// A single entry plus its per-level links.
///
/// `forward` and `backward` both have exactly `level` slots, fixed at creation.
pub(crate) struct Node {
    pub(crate) key: Bytes,
    pub(crate) entry: MemTableEntry,
    pub(crate) forward: Vec<Option<NodeId>>,
    pub(crate) backward: Vec<Option<NodeId>>,
}

impl Node {
    fn new(key: Bytes, entry: MemTableEntry, level: usize) -> Self {
        Self {
            key,
            entry,
            forward: vec![None; level],
            backward: vec![None; level],
        }
    }

    /// Placeholder left in a released arena slot
    fn vacant() -> Self {
        Self::new(Bytes::new(), MemTableEntry::Tombstone, 0)
    }

    pub(crate) fn level(&self) -> usize {
        self.forward.len()
    }

    fn footprint(&self) -> usize {
        self.key.len() + self.entry.value_len()
    }
}

/// Probabilistically balanced ordered index over byte-string keys
pub struct SkipList {
    /// Node arena; slot 0 is the head sentinel with `max_level` links
    nodes: Vec<Node>,

    /// Released arena slots available for reuse
    free: Vec<NodeId>,

    /// Level capacity, fixed at construction
    max_level: usize,

    /// Highest level populated by a real node (1 when empty)
    current_level: usize,

    /// Number of live entries (tombstones included)
    len: usize,

    /// Sum of `key.len() + value.len()` over live entries
    size_bytes: usize,

    /// Coin for the leveling policy
    rng: StdRng,
}

impl SkipList {
    /// Create an empty skip list with the default level capacity (16)
    pub fn new() -> Self {
        Self::with_max_level(DEFAULT_MAX_LEVEL)
    }

    /// Create an empty skip list with the given level capacity.
    ///
    /// The capacity is clamped into `1..=32`.
    pub fn with_max_level(max_level: usize) -> Self {
        Self::build(max_level, StdRng::from_entropy())
    }

    /// Create an empty skip list whose level assignment is reproducible
    pub fn with_seed(max_level: usize, seed: u64) -> Self {
        Self::build(max_level, StdRng::seed_from_u64(seed))
    }

    /// Create an empty skip list from a validated config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(match config.rng_seed {
            Some(seed) => Self::with_seed(config.max_level, seed),
            None => Self::with_max_level(config.max_level),
        })
    }

    fn build(max_level: usize, rng: StdRng) -> Self {
        let max_level = max_level.clamp(1, MAX_LEVEL_LIMIT);
        Self {
            nodes: vec![Node::new(Bytes::new(), MemTableEntry::Tombstone, max_level)],
            free: Vec::new(),
            max_level,
            current_level: 1,
            len: 0,
            size_bytes: 0,
            rng,
        }
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Insert or overwrite `key`.
    ///
    /// An existing key is updated in place and `size_bytes` moves by the
    /// difference in value length; no links change.
    pub fn put(&mut self, key: impl Into<Bytes>, entry: impl Into<MemTableEntry>) {
        let key = key.into();
        let entry = entry.into();
        let update = self.find_predecessors(&key);

        if let Some(next) = self.nodes[update[0]].forward[0] {
            let node = &mut self.nodes[next];
            if node.key == key {
                self.size_bytes = self.size_bytes - node.entry.value_len() + entry.value_len();
                node.entry = entry;
                return;
            }
        }

        // Levels above current_level already carry HEAD in the update set
        let level = self.random_level();
        if level > self.current_level {
            self.current_level = level;
        }

        let footprint = key.len() + entry.value_len();
        let id = self.alloc(Node::new(key, entry, level));

        for (i, &pred) in update.iter().enumerate().take(level) {
            let next = self.nodes[pred].forward[i];
            self.nodes[id].forward[i] = next;
            self.nodes[id].backward[i] = Some(pred);
            if let Some(next) = next {
                self.nodes[next].backward[i] = Some(id);
            }
            self.nodes[pred].forward[i] = Some(id);
        }

        self.size_bytes += footprint;
        self.len += 1;
    }

    /// Physically unlink `key`, returning its entry. Absent keys are a no-op.
    pub fn remove(&mut self, key: &[u8]) -> Option<MemTableEntry> {
        let update = self.find_predecessors(key);

        let target = self.nodes[update[0]].forward[0]?;
        if self.nodes[target].key[..] != *key {
            return None;
        }

        for (i, &pred) in update.iter().enumerate().take(self.nodes[target].level()) {
            let next = self.nodes[target].forward[i];
            self.nodes[pred].forward[i] = next;
            if let Some(next) = next {
                self.nodes[next].backward[i] = Some(pred);
            }
        }

        let node = self.release(target);
        self.size_bytes -= node.footprint();
        self.len -= 1;

        while self.current_level > 1 && self.nodes[HEAD].forward[self.current_level - 1].is_none() {
            self.current_level -= 1;
        }

        Some(node.entry)
    }

    /// Look up `key`. A missing key is `None`, never an error.
    pub fn get(&self, key: &[u8]) -> Option<&MemTableEntry> {
        let pred = self.descend(|k| k < key);
        let candidate = self.nodes[pred].forward[0]?;
        let node = &self.nodes[candidate];
        (node.key[..] == *key).then_some(&node.entry)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Drop every node and reset the counters
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes
            .push(Node::new(Bytes::new(), MemTableEntry::Tombstone, self.max_level));
        self.free.clear();
        self.current_level = 1;
        self.len = 0;
        self.size_bytes = 0;
    }

    // =========================================================================
    // Cursors and Ranges
    // =========================================================================

    /// Cursor at the smallest key (at the end when empty)
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self, self.nodes[HEAD].forward[0])
    }

    /// Cursor at the first key `>= key`
    pub fn seek(&self, key: &[u8]) -> Cursor<'_> {
        let pred = self.descend(|k| k < key);
        Cursor::new(self, self.nodes[pred].forward[0])
    }

    /// Locate the contiguous run of keys for which `predicate` is `Equal`.
    ///
    /// `predicate` must be monotonic in key order: `Less` for keys below the
    /// run, `Equal` inside it, `Greater` above it. Returns the half-open
    /// cursor pair `[first match, first key after the run)`, or `None` if no
    /// key matches.
    pub fn predicate_range<P>(&self, predicate: P) -> Option<(Cursor<'_>, Cursor<'_>)>
    where
        P: Fn(&[u8]) -> Ordering,
    {
        let before = self.descend(|k| predicate(k) == Ordering::Less);
        let first = self.nodes[before].forward[0]?;
        if predicate(&self.nodes[first].key[..]) != Ordering::Equal {
            return None;
        }

        let last = self.descend(|k| predicate(k) != Ordering::Greater);
        let end = self.nodes[last].forward[0];

        Some((Cursor::new(self, Some(first)), Cursor::new(self, end)))
    }

    /// All keys starting with `prefix`, as a half-open cursor pair
    pub fn prefix_range(&self, prefix: &[u8]) -> Option<(Cursor<'_>, Cursor<'_>)> {
        self.predicate_range(|key| {
            if key.starts_with(prefix) {
                Ordering::Equal
            } else {
                key.cmp(prefix)
            }
        })
    }

    /// Double-ended iterator over all entries in key order
    pub fn iter(&self) -> Iter<'_> {
        let last = self.descend(|_| true);
        let back = (last != HEAD).then_some(last);
        Iter::new(self, self.nodes[HEAD].forward[0], back, self.len)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of entries (tombstones included)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tracked size: `key.len() + value.len()` summed over all entries
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Highest populated level (1 when empty)
    pub fn current_level(&self) -> usize {
        self.current_level
    }

    /// `histogram[i]` is the number of nodes linked at level `i`.
    ///
    /// With the coin-flip policy this is close to `len / 2^i`.
    pub fn level_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.max_level];
        let mut current = self.nodes[HEAD].forward[0];
        while let Some(id) = current {
            let node = &self.nodes[id];
            for slot in histogram.iter_mut().take(node.level()) {
                *slot += 1;
            }
            current = node.forward[0];
        }
        histogram
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Walk from the head, top level down, moving right while `go_right`
    /// holds for the next key. Returns the last node visited on level 0
    /// (HEAD if none qualified).
    fn descend(&self, mut go_right: impl FnMut(&[u8]) -> bool) -> NodeId {
        let mut current = HEAD;
        for level in (0..self.current_level).rev() {
            while let Some(next) = self.nodes[current].forward[level] {
                if !go_right(&self.nodes[next].key[..]) {
                    break;
                }
                current = next;
            }
        }
        current
    }

    /// Same walk as `descend(|k| k < key)`, recording the last node per level
    fn find_predecessors(&self, key: &[u8]) -> UpdateSet {
        let mut update = [HEAD; MAX_LEVEL_LIMIT];
        let mut current = HEAD;
        for level in (0..self.current_level).rev() {
            while let Some(next) = self.nodes[current].forward[level] {
                if self.nodes[next].key[..] >= *key {
                    break;
                }
                current = next;
            }
            update[level] = current;
        }
        update
    }

    /// Coin-flip level: 1, then +1 per consecutive heads, capped at `max_level`
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node {
        self.free.push(id);
        std::mem::replace(&mut self.nodes[id], Node::vacant())
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SkipList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.len)
            .field("size_bytes", &self.size_bytes)
            .field("current_level", &self.current_level)
            .field("max_level", &self.max_level)
            .finish()
    }
}

impl<'a> IntoIterator for &'a SkipList {
    type Item = (&'a Bytes, &'a MemTableEntry);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
