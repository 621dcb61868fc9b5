//! Property-based tests for the staging collections.
//!
//! These tests use proptest to generate random paths and write sequences and
//! verify that registry and file store ordering invariants hold for all of
//! them.

#[cfg(test)]
mod proptest_tests {
    use crate::filesystem::{Content, FileStore};
    use crate::path::VirtualPath;
    use crate::registry::PathRegistry;
    use proptest::prelude::*;

    fn segments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z0-9_]{1,8}", 1..6)
    }

    // ============================================================================
    // PathRegistry property tests
    // ============================================================================

    proptest! {
        /// Property: adding the same chain twice leaves size and order unchanged
        #[test]
        fn add_folder_chain_is_idempotent(segs in segments()) {
            let path = VirtualPath::from_segments(&segs).unwrap();
            let mut registry = PathRegistry::new();
            registry.add_folder_chain(&path);
            let first: Vec<VirtualPath> = registry.iter().cloned().collect();

            let added = registry.add_folder_chain(&path);
            let second: Vec<VirtualPath> = registry.iter().cloned().collect();

            prop_assert_eq!(added, 0);
            prop_assert_eq!(first, second);
        }

        /// Property: a chain registers exactly its prefixes, root to leaf
        #[test]
        fn add_folder_chain_registers_prefixes_in_order(segs in segments()) {
            let path = VirtualPath::from_segments(&segs).unwrap();
            let mut registry = PathRegistry::new();
            registry.add_folder_chain(&path);

            prop_assert_eq!(registry.len(), segs.len());
            for (index, folder) in registry.iter().enumerate() {
                prop_assert_eq!(folder.segments(), &segs[..=index]);
            }
        }

        /// Property: every registered folder's parent was registered before it
        #[test]
        fn parents_precede_children(paths in prop::collection::vec(segments(), 1..10)) {
            let mut registry = PathRegistry::new();
            for segs in &paths {
                registry.add_folder_chain(&VirtualPath::from_segments(segs).unwrap());
            }

            let order: Vec<&VirtualPath> = registry.iter().collect();
            for (index, folder) in order.iter().enumerate() {
                if let Some(parent) = folder.parent() {
                    let parent_index = order.iter().position(|p| **p == parent);
                    prop_assert!(parent_index.is_some_and(|i| i < index));
                }
            }
        }
    }

    // ============================================================================
    // FileStore property tests
    // ============================================================================

    proptest! {
        /// Property: iteration follows first insertion; the last write wins
        #[test]
        fn file_store_last_write_wins_in_first_insertion_order(
            writes in prop::collection::vec((0usize..5, "[a-z]{0,6}"), 1..30)
        ) {
            let mut store = FileStore::new();
            let mut first_seen: Vec<usize> = Vec::new();
            let mut last_value: [Option<String>; 5] = Default::default();

            for (slot, text) in &writes {
                let name = format!("f{}.txt", slot);
                let path = VirtualPath::from_segments(["ns", name.as_str()]).unwrap();
                store.put_text(path, text.clone());
                if !first_seen.contains(slot) {
                    first_seen.push(*slot);
                }
                last_value[*slot] = Some(text.clone());
            }

            prop_assert_eq!(store.len(), first_seen.len());
            for ((path, content), slot) in store.iter().zip(&first_seen) {
                prop_assert_eq!(path.file_name(), format!("f{}.txt", slot));
                let expected = Content::Text(last_value[*slot].clone().unwrap());
                prop_assert_eq!(content, &expected);
            }
        }
    }
}
