use std::collections::BTreeMap;

use proptest::prelude::*;

use dsviz_trees::{AvlTree, BinarySearchTree, HuffmanTree, LoadMode};

/// Sorted multiset of `values`, as value -> count.
fn multiset<'a>(values: impl Iterator<Item = &'a i32>) -> BTreeMap<i32, usize> {
    let mut out = BTreeMap::new();
    for v in values {
        *out.entry(*v).or_insert(0) += 1;
    }
    out
}

fn remove_one(set: &mut BTreeMap<i32, usize>, v: i32) {
    if let Some(count) = set.get_mut(&v) {
        *count -= 1;
        if *count == 0 {
            set.remove(&v);
        }
    }
}

fn small_values() -> impl Strategy<Value = Vec<i32>> {
    // narrow range so duplicates are common
    prop::collection::vec(-20i32..20, 0..64)
}

proptest! {
    #[test]
    fn prop_bst_ordering_holds(values in small_values()) {
        let mut bst = BinarySearchTree::new();
        for v in &values {
            bst.insert(*v);
        }
        prop_assert!(bst.assert_valid().is_ok());
        prop_assert_eq!(bst.len(), values.len());

        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(bst.values().copied().collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn prop_avl_balanced_after_every_operation(
        values in small_values(),
        deletes in prop::collection::vec(-20i32..20, 0..64),
    ) {
        let mut avl = AvlTree::new();
        for v in &values {
            avl.insert(*v);
            prop_assert!(avl.assert_valid().is_ok(), "after insert {}:\n{}", v, avl);
        }
        for v in &deletes {
            avl.delete(v);
            prop_assert!(avl.assert_valid().is_ok(), "after delete {}:\n{}", v, avl);
        }

        // 1.44 * log2(n + 2) bound on AVL height
        let n = avl.len() as f64;
        prop_assert!(f64::from(avl.height()) <= 1.45 * (n + 2.0).log2());
    }

    #[test]
    fn prop_delete_removes_exactly_one_occurrence(
        values in small_values(),
        deletes in prop::collection::vec(-20i32..20, 0..32),
    ) {
        let mut bst = BinarySearchTree::new();
        let mut avl = AvlTree::new();
        for v in &values {
            bst.insert(*v);
            avl.insert(*v);
        }
        let mut expected = multiset(values.iter());

        for v in deletes {
            let present = expected.contains_key(&v);
            prop_assert_eq!(bst.delete(&v), present.then_some(v));
            prop_assert_eq!(avl.delete(&v), present.then_some(v));
            remove_one(&mut expected, v);

            prop_assert_eq!(&multiset(bst.values()), &expected);
            prop_assert_eq!(&multiset(avl.values()), &expected);
            prop_assert!(bst.assert_valid().is_ok());
        }
    }

    #[test]
    fn prop_avl_snapshot_reload_is_identical(values in small_values()) {
        let mut avl = AvlTree::new();
        for v in &values {
            avl.insert(*v);
        }
        if let Some(snap) = avl.get_tree_structure() {
            let loaded = AvlTree::from_snapshot(&snap, LoadMode::Verify).unwrap();
            prop_assert_eq!(loaded.get_tree_structure(), Some(snap.clone()));

            let rebuilt = AvlTree::from_snapshot(&snap, LoadMode::Rebuild).unwrap();
            prop_assert!(rebuilt.assert_valid().is_ok());
            prop_assert_eq!(
                rebuilt.values().collect::<Vec<_>>(),
                avl.values().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn prop_huffman_codes_are_prefix_free(text in "[a-h]{2,200}") {
        let mut tree = HuffmanTree::new();
        tree.build_from_text(&text);
        let codes: Vec<&String> = tree.get_codes().values().collect();
        for (i, a) in codes.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a.as_str()), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_huffman_round_trip(text in "\\PC{1,200}") {
        let mut tree = HuffmanTree::new();
        tree.build_from_text(&text);
        let encoded = tree.encode(&text).unwrap();
        prop_assert!(encoded.chars().all(|c| c == '0' || c == '1'));
        prop_assert_eq!(encoded.len() as u64, tree.weighted_path_length());
        prop_assert_eq!(tree.decode(&encoded).unwrap(), text);
    }
}
