//! # TierKV
//!
//! The in-memory write buffer of a log-structured storage engine:
//! - Skip list index with O(log n) expected point operations
//! - Ordered cursors and predicate/prefix range location
//! - Layered memtable: one active generation + frozen generations
//! - Reader/writer locking with a fixed active → frozen lock order
//!
//! ## Architecture Overview
//!
//! ```text
//!   put / remove / batches          get / get_batch
//!            │                             │
//! ┌──────────▼─────────────────────────────▼────────────────────┐
//! │                         MemTable                             │
//! │              (RwLock active → RwLock frozen)                 │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐  freeze()  ┌─────────────────────────┐
//!   │ Active SkipList │ ─────────► │ Frozen SkipLists (Arc)  │
//!   │   (mutable)     │            │  oldest ... newest      │
//!   └─────────────────┘            └────────────┬────────────┘
//!                                               │ iter() / drop_frozen()
//!                                               ▼
//!                                      flush side (external)
//! ```
//!
//! Persistence, WAL, compaction and the decision of *when* to freeze live
//! outside this crate; `MemTable::should_freeze`, `freeze` and `drop_frozen`
//! are the hooks they use.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod skiplist;
pub mod memtable;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TierError};
pub use config::Config;
pub use memtable::{FrozenMemTable, MemTable, MemTableEntry};
pub use skiplist::{Cursor, SkipList};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TierKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
