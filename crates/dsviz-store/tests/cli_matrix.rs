use serde_json::Value;

use dsviz_store::cli::{build_tree, parse_tree_args, run_huffman, run_tree, TreeKind};
use dsviz_store::TreeDocument;
use dsviz_trees::LoadMode;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn cli_bst_delete_with_two_children() {
    let cmd = parse_tree_args(args(&["bst", "50", "30", "70", "20", "40", "--delete", "30"])).unwrap();
    let json: Value = serde_json::from_str(&run_tree(&cmd).unwrap()).unwrap();

    assert_eq!(json["type"], "BinarySearchTree");
    let left = &json["data"]["left"];
    assert_eq!(left["data"]["value"], 40);
    assert_eq!(left["left"]["data"]["value"], 20);
    assert!(left["right"].is_null());
}

#[test]
fn cli_avl_rotates() {
    let cmd = parse_tree_args(args(&["AVL", "10", "20", "30"])).unwrap();
    assert_eq!(cmd.kind, TreeKind::Avl);
    let json: Value = serde_json::from_str(&run_tree(&cmd).unwrap()).unwrap();
    assert_eq!(json["type"], "AVLTree");
    assert_eq!(json["data"]["data"]["value"], 20);
    assert_eq!(json["data"]["height"], 2);
}

#[test]
fn cli_binary_fills_level_order() {
    let cmd = parse_tree_args(args(&["binary", "1", "2", "3", "4"])).unwrap();
    let doc = build_tree(&cmd);
    assert_eq!(doc.node_count(), 4);
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["data"]["left"]["left"]["data"]["value"], 4);
    assert!(doc.into_tree(LoadMode::Verify).is_ok());
}

#[test]
fn cli_huffman_output() {
    let json: Value = serde_json::from_str(&run_huffman("ABRACADABRA").unwrap()).unwrap();
    assert_eq!(json["encoded"].as_str().unwrap().len(), 23);
    assert_eq!(json["tree"]["type"], "HuffmanTree");
    assert_eq!(json["tree"]["codes"]["A"], "0");

    let doc: TreeDocument<()> = serde_json::from_value(json["tree"].clone()).unwrap();
    assert!(doc.into_tree(LoadMode::Verify).is_ok());
}

#[test]
fn cli_huffman_empty_input() {
    let json: Value = serde_json::from_str(&run_huffman("").unwrap()).unwrap();
    assert_eq!(json["encoded"], "");
    assert!(json["tree"]["data"].is_null());
}
