//! Skip List Cursors
//!
//! Forward-only positions and iterators over the bottom level.

use std::fmt;

use bytes::Bytes;

use crate::memtable::MemTableEntry;

use super::{NodeId, SkipList, HEAD};

/// Forward-only position in a skip list.
///
/// The end of the sequence is an absent node, not a sentinel.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    list: &'a SkipList,
    node: Option<NodeId>,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(list: &'a SkipList, node: Option<NodeId>) -> Self {
        Self { list, node }
    }

    /// Past the last entry
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// On an entry holding a live value (false at the end and on tombstones)
    pub fn is_valid(&self) -> bool {
        matches!(self.entry(), Some(MemTableEntry::Value(_)))
    }

    pub fn key(&self) -> Option<&'a Bytes> {
        let list = self.list;
        self.node.map(move |id| &list.node(id).key)
    }

    pub fn entry(&self) -> Option<&'a MemTableEntry> {
        let list = self.list;
        self.node.map(move |id| &list.node(id).entry)
    }

    /// Live value under the cursor; `None` at the end or on a tombstone
    pub fn value(&self) -> Option<&'a Bytes> {
        self.entry().and_then(MemTableEntry::value)
    }

    /// Step to the next key. Stays put at the end.
    pub fn advance(&mut self) {
        if let Some(id) = self.node {
            self.node = self.list.node(id).forward[0];
        }
    }

    /// Iterate from this cursor up to (not including) `end`
    pub fn until(self, end: Cursor<'a>) -> CursorRange<'a> {
        CursorRange { current: self, end }
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list) && self.node == other.node
    }
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => f.debug_tuple("Cursor").field(key).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

/// Entries in `[start, end)` of a cursor pair
pub struct CursorRange<'a> {
    current: Cursor<'a>,
    end: Cursor<'a>,
}

impl<'a> Iterator for CursorRange<'a> {
    type Item = (&'a Bytes, &'a MemTableEntry);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.end {
            return None;
        }
        let item = (self.current.key()?, self.current.entry()?);
        self.current.advance();
        Some(item)
    }
}

/// Iterator over all entries in key order, from either end.
///
/// Reverse steps follow the backward links.
pub struct Iter<'a> {
    list: &'a SkipList,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(
        list: &'a SkipList,
        front: Option<NodeId>,
        back: Option<NodeId>,
        remaining: usize,
    ) -> Self {
        Self {
            list,
            front,
            back,
            remaining,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Bytes, &'a MemTableEntry);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.front?);
        self.front = node.forward[0];
        self.remaining -= 1;
        Some((&node.key, &node.entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.back?);
        self.back = node.backward[0].filter(|&prev| prev != HEAD);
        self.remaining -= 1;
        Some((&node.key, &node.entry))
    }
}

impl ExactSizeIterator for Iter<'_> {}
