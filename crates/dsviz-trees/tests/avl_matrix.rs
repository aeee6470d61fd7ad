use dsviz_trees::{AvlPayload, AvlTree, LoadMode, SnapshotError, StableId, TreeSnapshot};

fn build(values: &[i32]) -> AvlTree<i32> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut avl = AvlTree::new();
    for &v in values {
        avl.insert(v);
        avl.assert_valid().unwrap();
    }
    avl
}

fn root_value(avl: &AvlTree<i32>) -> i32 {
    *avl.root().expect("tree is not empty").node().value()
}

fn children(avl: &AvlTree<i32>) -> (Option<i32>, Option<i32>) {
    let root = avl.root().unwrap();
    (
        root.left().map(|n| *n.node().value()),
        root.right().map(|n| *n.node().value()),
    )
}

#[test]
fn avl_symmetric_inserts_need_no_rotation() {
    let avl = build(&[50, 30, 70, 20, 40, 60, 80]);
    assert_eq!(avl.height(), 3);
    assert_eq!(root_value(&avl), 50);
    assert_eq!(avl.root().unwrap().node().id(), StableId(0));
    assert_eq!(children(&avl), (Some(30), Some(70)));
}

#[test]
fn avl_insert_rotation_cases_matrix() {
    // (inserts, expected root); each ends as root with 1 child on each side
    let cases: [(&[i32], i32, (i32, i32)); 4] = [
        (&[10, 20, 30], 20, (10, 30)),
        (&[30, 20, 10], 20, (10, 30)),
        (&[30, 10, 20], 20, (10, 30)),
        (&[10, 30, 20], 20, (10, 30)),
    ];
    for (inserts, root, (l, r)) in cases {
        let avl = build(inserts);
        assert_eq!(root_value(&avl), root, "inserts {inserts:?}");
        assert_eq!(children(&avl), (Some(l), Some(r)), "inserts {inserts:?}");
        assert_eq!(avl.height(), 2);
        assert!(avl.root().unwrap().parent().is_none());
    }
}

#[test]
fn avl_ascending_run_stays_logarithmic() {
    let values: Vec<i32> = (1..=1023).collect();
    let avl = build(&values);
    assert_eq!(avl.len(), 1023);
    assert_eq!(avl.height(), 10);
    assert_eq!(avl.values().copied().collect::<Vec<_>>(), values);
}

#[test]
fn avl_delete_rebalances_matrix() {
    // right-right after deleting from the short side
    let mut avl = build(&[20, 10, 30, 40]);
    assert_eq!(avl.delete(&10), Some(10));
    avl.assert_valid().unwrap();
    assert_eq!(root_value(&avl), 30);
    assert_eq!(children(&avl), (Some(20), Some(40)));

    // right-left
    let mut avl = build(&[20, 10, 30, 25]);
    assert_eq!(avl.delete(&10), Some(10));
    avl.assert_valid().unwrap();
    assert_eq!(root_value(&avl), 25);
    assert_eq!(children(&avl), (Some(20), Some(30)));

    // right child balanced after the delete: single rotation
    let mut avl = build(&[20, 10, 30, 25, 40]);
    assert_eq!(avl.delete(&10), Some(10));
    avl.assert_valid().unwrap();
    assert_eq!(root_value(&avl), 30);
    assert_eq!(avl.height(), 3);
}

#[test]
fn avl_delete_two_children_moves_successor_payload() {
    let mut avl = build(&[20, 10, 30]);
    let id_of_30 = avl.search(&30).unwrap().node().id();
    assert_eq!(avl.delete(&20), Some(20));
    avl.assert_valid().unwrap();

    let root = avl.root().unwrap();
    assert_eq!(*root.node().value(), 30);
    assert_eq!(root.node().id(), id_of_30);
    assert_eq!(children(&avl), (Some(10), None));
}

#[test]
fn avl_delete_every_value_keeps_invariants() {
    let values = [8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7, 9, 11, 13, 15];
    let mut avl = build(&values);
    for (i, v) in [8, 1, 15, 4, 12, 6, 2, 10, 14, 3, 5, 7, 9, 11, 13]
        .iter()
        .enumerate()
    {
        assert_eq!(avl.delete(v), Some(*v));
        avl.assert_valid().unwrap();
        assert_eq!(avl.len(), values.len() - i - 1);
        assert!(!avl.contains(v));
    }
    assert!(avl.is_empty());
    assert_eq!(avl.height(), 0);
}

#[test]
fn avl_delete_absent_and_empty_are_noops() {
    let mut avl = build(&[2, 1, 3]);
    let before = avl.get_tree_structure();
    assert_eq!(avl.delete(&7), None);
    assert_eq!(avl.get_tree_structure(), before);

    let mut empty: AvlTree<i32> = AvlTree::new();
    assert_eq!(empty.delete(&1), None);
    assert!(empty.search(&1).is_none());
    assert_eq!(empty.min(), None);
}

#[test]
fn avl_duplicates_stay_balanced() {
    let mut avl = build(&[5; 16]);
    assert_eq!(avl.len(), 16);
    assert!(avl.height() <= 6);
    assert_eq!(avl.delete(&5), Some(5));
    avl.assert_valid().unwrap();
    assert_eq!(avl.values().count(), 15);
}

#[test]
fn avl_snapshot_carries_height_and_balance() {
    let avl = build(&[2, 1, 3, 4]);
    let snap = avl.get_tree_structure().unwrap();
    assert_eq!(snap.height, Some(3));
    assert_eq!(snap.data.balance, -1);
    assert_eq!(snap.data.value, 2);
    assert_eq!(snap.left.as_ref().unwrap().height, Some(1));

    let loaded = AvlTree::from_snapshot(&snap, LoadMode::Verify).unwrap();
    assert_eq!(loaded.get_tree_structure().unwrap(), snap);
    loaded.assert_valid().unwrap();
}

fn payload(value: i32, id: u64) -> AvlPayload<i32> {
    AvlPayload {
        value,
        id: StableId(id),
        balance: 0,
    }
}

#[test]
fn avl_snapshot_heights_are_recomputed() {
    let mut snap = TreeSnapshot::with_children(
        payload(2, 0),
        Some(TreeSnapshot::leaf(payload(1, 1))),
        Some(TreeSnapshot::leaf(payload(3, 2))),
    );
    snap.height = Some(42);

    let mut loaded = AvlTree::from_snapshot(&snap, LoadMode::Verify).unwrap();
    assert_eq!(loaded.height(), 2);
    loaded.assert_valid().unwrap();
    assert_eq!(loaded.insert_tracked(4), StableId(3));
}

#[test]
fn avl_snapshot_verify_rejects_and_rebuild_repairs() {
    let chain = TreeSnapshot::with_children(
        payload(1, 0),
        None,
        Some(TreeSnapshot::with_children(
            payload(2, 1),
            None,
            Some(TreeSnapshot::leaf(payload(3, 2))),
        )),
    );

    assert_eq!(
        AvlTree::from_snapshot(&chain, LoadMode::Verify).err(),
        Some(SnapshotError::Unbalanced {
            id: StableId(0),
            balance: -2
        })
    );

    let rebuilt = AvlTree::from_snapshot(&chain, LoadMode::Rebuild).unwrap();
    rebuilt.assert_valid().unwrap();
    assert_eq!(root_value(&rebuilt), 2);
    assert_eq!(rebuilt.height(), 2);
}

#[test]
fn avl_snapshot_verify_rejects_unordered() {
    let swapped = TreeSnapshot::with_children(
        payload(2, 0),
        Some(TreeSnapshot::leaf(payload(3, 1))),
        Some(TreeSnapshot::leaf(payload(1, 2))),
    );
    assert_eq!(
        AvlTree::from_snapshot(&swapped, LoadMode::Verify).err(),
        Some(SnapshotError::Unordered(StableId(0)))
    );
}

#[test]
fn avl_display_matrix() {
    let avl = build(&[1, 2]);
    assert_eq!(
        avl.to_string(),
        "1 #0 [h=2 bf=-1]\n├─ L ∅\n└─ R 2 #1 [h=1 bf=0]"
    );
}

#[test]
fn avl_deep_chain_snapshot_is_rejected_or_rebuilt() {
    const N: i32 = 100_000;
    let mut chain = TreeSnapshot::leaf(payload(N - 1, (N - 1) as u64));
    for v in (0..N - 1).rev() {
        chain = TreeSnapshot::with_children(payload(v, v as u64), None, Some(chain));
    }

    assert_eq!(
        AvlTree::from_snapshot(&chain, LoadMode::Verify).err(),
        Some(SnapshotError::Unbalanced {
            id: StableId(0),
            balance: -(N - 1)
        })
    );

    let rebuilt = AvlTree::from_snapshot(&chain, LoadMode::Rebuild).unwrap();
    assert_eq!(rebuilt.len(), N as usize);
    assert!(rebuilt.height() <= 17);
    rebuilt.assert_valid().unwrap();
}
