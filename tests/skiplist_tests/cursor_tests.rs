//! Cursor and Range Tests
//!
//! Tests verify:
//! - Forward scans in ascending key order
//! - Tombstone validity on cursors
//! - Double-ended iteration
//! - Seek, predicate ranges and prefix ranges

use std::cmp::Ordering;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tierkv::{MemTableEntry, SkipList};

// =============================================================================
// Helper Functions
// =============================================================================

fn fruit_list() -> SkipList {
    let mut list = SkipList::with_seed(8, 31);
    // Insert in random order
    for key in ["cherry", "apple", "fig", "banana", "date", "elderberry"] {
        list.put(key, key.to_uppercase());
    }
    list
}

fn keys_of<'a>(items: impl Iterator<Item = (&'a Bytes, &'a MemTableEntry)>) -> Vec<String> {
    items
        .map(|(k, _)| String::from_utf8(k.to_vec()).unwrap())
        .collect()
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[test]
fn test_cursor_on_empty_list_is_end() {
    let list = SkipList::new();
    let cursor = list.cursor();

    assert!(cursor.is_end());
    assert!(!cursor.is_valid());
    assert_eq!(cursor.key(), None);
    assert_eq!(cursor.entry(), None);
}

#[test]
fn test_cursor_walks_in_sorted_order() {
    let list = fruit_list();
    let mut cursor = list.cursor();
    let mut seen = Vec::new();

    while !cursor.is_end() {
        seen.push(cursor.key().unwrap().clone());
        cursor.advance();
    }

    assert_eq!(
        seen,
        vec!["apple", "banana", "cherry", "date", "elderberry", "fig"]
    );

    // Advancing at the end stays at the end
    cursor.advance();
    assert!(cursor.is_end());
}

#[test]
fn test_cursor_validity_tracks_tombstones() {
    let mut list = SkipList::new();
    list.put("a", "1");
    list.put("b", MemTableEntry::Tombstone);
    list.put("c", Vec::<u8>::new());

    let mut cursor = list.cursor();
    assert!(cursor.is_valid());
    assert_eq!(cursor.value().map(|v| &v[..]), Some(&b"1"[..]));

    cursor.advance();
    assert!(!cursor.is_valid());
    assert!(!cursor.is_end());
    assert_eq!(cursor.value(), None);
    assert_eq!(cursor.entry(), Some(&MemTableEntry::Tombstone));

    // Empty value is still a live value
    cursor.advance();
    assert!(cursor.is_valid());
    assert_eq!(cursor.value(), Some(&Bytes::new()));
}

#[test]
fn test_cursor_equality() {
    let list = fruit_list();
    let mut a = list.cursor();
    let b = list.seek(b"banana");

    assert_ne!(a, b);
    a.advance();
    assert_eq!(a, b);

    let other = fruit_list();
    assert_ne!(list.cursor(), other.cursor());
}

#[test]
fn test_seek() {
    let list = fruit_list();

    assert_eq!(list.seek(b"cherry").key().unwrap(), "cherry");
    assert_eq!(list.seek(b"c").key().unwrap(), "cherry");
    assert_eq!(list.seek(b"").key().unwrap(), "apple");
    assert!(list.seek(b"zebra").is_end());
}

// =============================================================================
// Iterator Tests
// =============================================================================

#[test]
fn test_iter_strictly_increasing_without_duplicates() {
    let mut list = SkipList::with_seed(16, 8);
    let mut rng = StdRng::seed_from_u64(1234);

    for _ in 0..10_000 {
        let key: Vec<u8> = (0..rng.gen_range(1..6)).map(|_| rng.gen()).collect();
        list.put(key, "v");
    }

    let keys: Vec<&Bytes> = list.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.len(), list.len());
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_iter_reverse_uses_back_links() {
    let list = fruit_list();

    let forward = keys_of(list.iter());
    let mut backward = keys_of(list.iter().rev());
    backward.reverse();

    assert_eq!(forward, backward);
    assert_eq!(list.iter().len(), 6);
}

#[test]
fn test_iter_from_both_ends_meets_once() {
    let list = fruit_list();
    let mut iter = list.iter();

    assert_eq!(iter.next().unwrap().0, "apple");
    assert_eq!(iter.next_back().unwrap().0, "fig");
    assert_eq!(iter.next().unwrap().0, "banana");
    assert_eq!(iter.next_back().unwrap().0, "elderberry");
    assert_eq!(iter.next().unwrap().0, "cherry");
    assert_eq!(iter.next_back().unwrap().0, "date");
    assert!(iter.next().is_none());
    assert!(iter.next_back().is_none());
}

#[test]
fn test_iter_after_removals() {
    let mut list = fruit_list();
    list.remove(b"apple");
    list.remove(b"fig");
    list.remove(b"date");

    assert_eq!(keys_of(list.iter()), vec!["banana", "cherry", "elderberry"]);
    assert_eq!(keys_of(list.iter().rev()), vec!["elderberry", "cherry", "banana"]);
}

#[test]
fn test_iter_includes_tombstones() {
    let mut list = SkipList::new();
    list.put("key1", "value1");
    list.put("key2", MemTableEntry::Tombstone);
    list.put("key3", "value3");

    let entries: Vec<_> = list.iter().collect();

    assert_eq!(entries.len(), 3);
    assert!(matches!(entries[0].1, MemTableEntry::Value(_)));
    assert!(matches!(entries[1].1, MemTableEntry::Tombstone));
    assert!(matches!(entries[2].1, MemTableEntry::Value(_)));
}

// =============================================================================
// Predicate Range Tests
// =============================================================================

#[test]
fn test_predicate_range_bounded() {
    let list = fruit_list();

    // [banana, date]
    let (start, end) = list
        .predicate_range(|key| {
            if key < b"banana".as_slice() {
                Ordering::Less
            } else if key > b"date".as_slice() {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .unwrap();

    assert_eq!(keys_of(start.until(end)), vec!["banana", "cherry", "date"]);
    assert_eq!(end.key().unwrap(), "elderberry");
}

#[test]
fn test_predicate_range_to_end_of_list() {
    let list = fruit_list();

    let (start, end) = list
        .predicate_range(|key| {
            if key < b"e".as_slice() {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .unwrap();

    assert!(end.is_end());
    assert_eq!(keys_of(start.until(end)), vec!["elderberry", "fig"]);
}

#[test]
fn test_predicate_range_no_match() {
    let list = fruit_list();

    // Gap between "cherry" and "date"
    let gap = list.predicate_range(|key| {
        if key <= b"cherry".as_slice() {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    });
    assert!(gap.is_none());

    let empty = SkipList::new();
    assert!(empty.predicate_range(|_| Ordering::Equal).is_none());
}

#[test]
fn test_predicate_range_matches_linear_filter() {
    let mut list = SkipList::with_seed(16, 4);
    for i in 0..5_000u32 {
        list.put(format!("{:05}", i * 3), "v");
    }

    for (lo, hi) in [(0u32, 10u32), (1_000, 1_001), (7_777, 9_999), (14_990, 20_000)] {
        let lo_key = format!("{:05}", lo);
        let hi_key = format!("{:05}", hi);

        let expected: Vec<Bytes> = list
            .iter()
            .filter(|(k, _)| &k[..] >= lo_key.as_bytes() && &k[..] <= hi_key.as_bytes())
            .map(|(k, _)| k.clone())
            .collect();

        let found: Vec<Bytes> = match list.predicate_range(|key| {
            if key < lo_key.as_bytes() {
                Ordering::Less
            } else if key > hi_key.as_bytes() {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }) {
            Some((start, end)) => start.until(end).map(|(k, _)| k.clone()).collect(),
            None => Vec::new(),
        };

        assert_eq!(found, expected, "range {}..={}", lo, hi);
    }
}

// =============================================================================
// Prefix Range Tests
// =============================================================================

#[test]
fn test_prefix_range() {
    let mut list = SkipList::new();
    for key in ["user:1", "user:2", "user:10", "users", "order:1", "user", "v"] {
        list.put(key, "x");
    }

    let (start, end) = list.prefix_range(b"user:").unwrap();
    assert_eq!(keys_of(start.until(end)), vec!["user:1", "user:10", "user:2"]);

    let (start, end) = list.prefix_range(b"user").unwrap();
    assert_eq!(
        keys_of(start.until(end)),
        vec!["user", "user:1", "user:10", "user:2", "users"]
    );

    assert!(list.prefix_range(b"product").is_none());
}

#[test]
fn test_empty_prefix_covers_everything() {
    let list = fruit_list();

    let (start, end) = list.prefix_range(b"").unwrap();

    assert_eq!(start, list.cursor());
    assert!(end.is_end());
    assert_eq!(start.until(end).count(), list.len());
}
