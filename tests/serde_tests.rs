#![cfg(feature = "serde")]

//! Integration tests for serde support.
//!
//! Maps serialize as maps in key order; entries serialize as two-element
//! sequences.

use ordmap::persistent::{Comparator, Entry, PersistentTreeMap};
use rstest::rstest;

// =============================================================================
// PersistentTreeMap Integration Tests
// =============================================================================

#[rstest]
fn test_treemap_json_roundtrip() {
    let map: PersistentTreeMap<String, i32> = (1..=10)
        .map(|index| (format!("key{index:02}"), index))
        .collect();
    let json = serde_json::to_string(&map).unwrap();
    let restored: PersistentTreeMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(map, restored);
    assert_eq!(restored.check_invariants(), Ok(()));
}

#[rstest]
fn test_treemap_serializes_in_key_order() {
    let map = PersistentTreeMap::new()
        .insert("c".to_string(), 3)
        .insert("a".to_string(), 1)
        .insert("b".to_string(), 2);
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);
}

#[rstest]
fn test_treemap_empty_roundtrip() {
    let map: PersistentTreeMap<String, i32> = PersistentTreeMap::new();
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, "{}");
    let restored: PersistentTreeMap<String, i32> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}

#[rstest]
fn test_treemap_duplicate_keys_last_wins() {
    let restored: PersistentTreeMap<String, i32> =
        serde_json::from_str(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.get("a"), Some(&2));
}

#[rstest]
fn test_treemap_deserializes_with_custom_comparator() {
    #[derive(Default)]
    struct ByLength;

    impl Comparator<String> for ByLength {
        fn less(&self, left: &String, right: &String) -> bool {
            (left.len(), left) < (right.len(), right)
        }
    }

    let restored: PersistentTreeMap<String, i32, ByLength> =
        serde_json::from_str(r#"{"ccc":3,"a":1,"bb":2}"#).unwrap();
    let keys: Vec<&String> = restored.keys().collect();
    assert_eq!(keys, vec!["a", "bb", "ccc"]);
}

#[rstest]
fn test_treemap_invalid_json_is_error() {
    let result: Result<PersistentTreeMap<String, i32>, _> = serde_json::from_str("[1, 2]");
    assert!(result.is_err());
}

// =============================================================================
// Entry Integration Tests
// =============================================================================

#[rstest]
fn test_entry_serializes_as_pair() {
    let entry = Entry::new(1, "one".to_string());
    let json = serde_json::to_string(&entry).unwrap();
    assert_eq!(json, r#"[1,"one"]"#);

    let restored: Entry<i32, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, entry);
}

#[rstest]
fn test_entries_serialize_in_key_order() {
    let map: PersistentTreeMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    let json = serde_json::to_string(&map.entries()).unwrap();
    assert_eq!(json, r#"[[1,"a"],[2,"b"]]"#);
}
