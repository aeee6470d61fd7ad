use std::collections::BTreeMap;

use dsviz_trees::huffman::SINGLETON_CODE;
use dsviz_trees::{
    frequencies, FrequencyTable, HuffmanError, HuffmanPayload, HuffmanTree, MalformedCode,
    SnapshotError, TreeSnapshot,
};

fn abracadabra() -> HuffmanTree {
    let mut tree = HuffmanTree::new();
    tree.build_from_text("ABRACADABRA");
    tree
}

fn codes(pairs: &[(char, &str)]) -> BTreeMap<char, String> {
    pairs.iter().map(|&(c, s)| (c, s.to_string())).collect()
}

#[test]
fn huffman_abracadabra_code_table() {
    let tree = abracadabra();
    assert_eq!(
        tree.get_codes(),
        &codes(&[('A', "0"), ('B', "110"), ('C', "100"), ('D', "101"), ('R', "111")])
    );
    assert_eq!(tree.len(), 9);
    assert_eq!(tree.root().unwrap().node().frequency(), 11);
    assert_eq!(tree.weighted_path_length(), 23);

    let encoded = tree.encode("ABRACADABRA").unwrap();
    assert_eq!(encoded.len(), 23);
    assert_eq!(tree.decode(&encoded).unwrap(), "ABRACADABRA");
}

#[test]
fn huffman_leaves_in_tree_order() {
    let tree = abracadabra();
    let symbols: String = tree.leaves().filter_map(|n| n.node().symbol()).collect();
    assert_eq!(symbols, "ACDBR");
}

#[test]
fn huffman_unknown_symbol_matrix() {
    let tree = abracadabra();
    assert_eq!(tree.encode("Z"), Err(HuffmanError::UnknownSymbol('Z')));
    assert_eq!(tree.encode("ABZ"), Err(HuffmanError::UnknownSymbol('Z')));
    assert_eq!(tree.encode("").unwrap(), "");

    let empty = HuffmanTree::new();
    assert_eq!(empty.encode("A"), Err(HuffmanError::UnknownSymbol('A')));
}

#[test]
fn huffman_malformed_code_matrix() {
    let tree = abracadabra();
    let cases: [(&str, MalformedCode); 3] = [
        ("01x", MalformedCode::InvalidBit { position: 2, found: 'x' }),
        ("011", MalformedCode::Truncated),
        ("2", MalformedCode::InvalidBit { position: 0, found: '2' }),
    ];
    for (bits, expected) in cases {
        assert_eq!(
            tree.decode(bits),
            Err(HuffmanError::MalformedCode(expected)),
            "bits {bits:?}"
        );
    }
    assert_eq!(tree.decode("").unwrap(), "");
}

#[test]
fn huffman_empty_tree_decode() {
    let empty = HuffmanTree::new();
    assert!(empty.is_empty());
    assert_eq!(empty.decode("").unwrap(), "");
    assert_eq!(
        empty.decode("0"),
        Err(HuffmanError::MalformedCode(MalformedCode::DeadEnd { position: 0 }))
    );
    assert!(empty.get_codes().is_empty());
    assert!(empty.get_tree_structure().is_none());
}

#[test]
fn huffman_single_symbol_round_trip() {
    let mut tree = HuffmanTree::new();
    tree.build_from_text("aaaa");
    assert_eq!(tree.get_codes(), &codes(&[('a', SINGLETON_CODE)]));
    let encoded = tree.encode("aaa").unwrap();
    assert_eq!(encoded, "000");
    assert_eq!(tree.decode(&encoded).unwrap(), "aaa");
    assert_eq!(
        tree.decode("01"),
        Err(HuffmanError::MalformedCode(MalformedCode::DeadEnd { position: 1 }))
    );
}

#[test]
fn huffman_rebuild_replaces_previous_tree() {
    let mut tree = abracadabra();
    tree.build_from_text("");
    assert_eq!(tree.get_codes().len(), 5);

    let mut table = FrequencyTable::new();
    table.insert('x', 3);
    table.insert('y', 1);
    tree.build_from_frequency(&table).unwrap();
    assert_eq!(tree.get_codes(), &codes(&[('x', "1"), ('y', "0")]));
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.encode("A"), Err(HuffmanError::UnknownSymbol('A')));
}

#[test]
fn huffman_frequency_total_overflow_is_rejected() {
    let mut tree = abracadabra();
    let table: FrequencyTable = [('a', u64::MAX), ('b', 1)].into_iter().collect();
    assert_eq!(
        tree.build_from_frequency(&table),
        Err(HuffmanError::FrequencyOverflow)
    );
    assert_eq!(tree.get_codes().len(), 5);
    assert_eq!(tree.root().unwrap().node().frequency(), 11);

    let table: FrequencyTable = [('a', u64::MAX - 1), ('b', 1)].into_iter().collect();
    tree.build_from_frequency(&table).unwrap();
    assert_eq!(tree.root().unwrap().node().frequency(), u64::MAX);
    assert_eq!(tree.get_codes(), &codes(&[('a', "1"), ('b', "0")]));
}

#[test]
fn huffman_multibyte_symbols() {
    let text = "ünïcödé ünïcödé";
    let mut tree = HuffmanTree::new();
    tree.build_from_text(text);
    assert_eq!(tree.get_codes().len(), frequencies(text).len());
    assert_eq!(tree.decode(&tree.encode(text).unwrap()).unwrap(), text);
}

#[test]
fn huffman_snapshot_round_trip() {
    let tree = abracadabra();
    let snap = tree.get_tree_structure().unwrap();
    assert_eq!(snap.node_count(), 9);
    assert!(snap.height.is_none());
    assert_eq!(snap.data.symbol, None);
    assert!(!snap.data.is_leaf);

    let loaded = HuffmanTree::from_snapshot(&snap, Some(tree.get_codes())).unwrap();
    assert_eq!(loaded.get_codes(), tree.get_codes());
    assert_eq!(loaded.get_tree_structure().unwrap(), snap);
    assert_eq!(loaded.decode("0110111").unwrap(), "ABR");

    assert!(HuffmanTree::from_snapshot(&snap, None).is_ok());
}

fn leaf(symbol: char, frequency: u64) -> TreeSnapshot<HuffmanPayload> {
    TreeSnapshot::leaf(HuffmanPayload {
        symbol: Some(symbol),
        frequency,
        is_leaf: true,
    })
}

fn internal(
    frequency: u64,
    left: Option<TreeSnapshot<HuffmanPayload>>,
    right: Option<TreeSnapshot<HuffmanPayload>>,
) -> TreeSnapshot<HuffmanPayload> {
    TreeSnapshot::with_children(
        HuffmanPayload {
            symbol: None,
            frequency,
            is_leaf: false,
        },
        left,
        right,
    )
}

#[test]
fn huffman_snapshot_rejection_matrix() {
    let one_child = internal(1, Some(leaf('a', 1)), None);
    assert!(matches!(
        HuffmanTree::from_snapshot(&one_child, None),
        Err(SnapshotError::MalformedHuffmanNode(_))
    ));

    let bad_sum = internal(5, Some(leaf('a', 1)), Some(leaf('b', 1)));
    assert!(matches!(
        HuffmanTree::from_snapshot(&bad_sum, None),
        Err(SnapshotError::MalformedHuffmanNode(_))
    ));

    let overflowing = internal(0, Some(leaf('a', u64::MAX)), Some(leaf('b', 1)));
    assert!(matches!(
        HuffmanTree::from_snapshot(&overflowing, None),
        Err(SnapshotError::MalformedHuffmanNode(_))
    ));

    let dup = internal(2, Some(leaf('a', 1)), Some(leaf('a', 1)));
    assert_eq!(
        HuffmanTree::from_snapshot(&dup, None).err(),
        Some(SnapshotError::DuplicateSymbol('a'))
    );

    let ok = internal(2, Some(leaf('a', 1)), Some(leaf('b', 1)));
    assert_eq!(
        HuffmanTree::from_snapshot(&ok, Some(&codes(&[('a', "1"), ('b', "0")]))).err(),
        Some(SnapshotError::CodeMismatch {
            symbol: 'a',
            stored: "1".to_string(),
            derived: "0".to_string(),
        })
    );
    assert_eq!(
        HuffmanTree::from_snapshot(&ok, Some(&codes(&[('a', "0"), ('b', "1"), ('c', "11")])))
            .err(),
        Some(SnapshotError::CodeMismatch {
            symbol: 'c',
            stored: "11".to_string(),
            derived: String::new(),
        })
    );
}

#[test]
fn huffman_display_matrix() {
    let mut tree = HuffmanTree::new();
    tree.build_from_text("aab");
    assert_eq!(tree.to_string(), "3\n├─ L 'b':1\n└─ R 'a':2");
}
