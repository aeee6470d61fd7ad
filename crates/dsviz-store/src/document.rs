//! The serialized form of one tree, tagged by tree type.
//!
//! ```json
//! {"type": "AVLTree", "data": {"data": {...}, "height": 2, "left": ..., "right": ...}}
//! ```
//!
//! An empty tree is `"data": null`.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use dsviz_trees::{
    AvlPayload, AvlTree, BinarySearchTree, BinaryTree, HuffmanPayload, HuffmanTree, LoadMode,
    SnapshotError, TreeSnapshot, ValuePayload,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeDocument<T> {
    BinaryTree {
        data: Option<TreeSnapshot<ValuePayload<T>>>,
    },
    BinarySearchTree {
        data: Option<TreeSnapshot<ValuePayload<T>>>,
    },
    #[serde(rename = "AVLTree")]
    AvlTree {
        data: Option<TreeSnapshot<AvlPayload<T>>>,
    },
    HuffmanTree {
        data: Option<TreeSnapshot<HuffmanPayload>>,
        /// Code table at save time. Missing or empty means "not stored".
        #[serde(default)]
        codes: BTreeMap<char, String>,
    },
}

impl<T> TreeDocument<T> {
    /// The `"type"` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            TreeDocument::BinaryTree { .. } => "BinaryTree",
            TreeDocument::BinarySearchTree { .. } => "BinarySearchTree",
            TreeDocument::AvlTree { .. } => "AVLTree",
            TreeDocument::HuffmanTree { .. } => "HuffmanTree",
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            TreeDocument::BinaryTree { data } | TreeDocument::BinarySearchTree { data } => {
                data.as_ref().map_or(0, TreeSnapshot::node_count)
            }
            TreeDocument::AvlTree { data } => data.as_ref().map_or(0, TreeSnapshot::node_count),
            TreeDocument::HuffmanTree { data, .. } => {
                data.as_ref().map_or(0, TreeSnapshot::node_count)
            }
        }
    }
}

impl<T> TreeDocument<T>
where
    T: PartialOrd + Clone,
{
    /// Rebuilds the live tree. `mode` only affects AVL documents.
    pub fn into_tree(self, mode: LoadMode) -> Result<LoadedTree<T>, SnapshotError> {
        let type_name = self.type_name();
        let tree = match self {
            TreeDocument::BinaryTree { data } => LoadedTree::Binary(match data {
                Some(snap) => BinaryTree::from_snapshot(&snap)?,
                None => BinaryTree::new(),
            }),
            TreeDocument::BinarySearchTree { data } => LoadedTree::Bst(match data {
                Some(snap) => BinarySearchTree::from_snapshot(&snap)?,
                None => BinarySearchTree::new(),
            }),
            TreeDocument::AvlTree { data } => LoadedTree::Avl(match data {
                Some(snap) => AvlTree::from_snapshot(&snap, mode)?,
                None => AvlTree::new(),
            }),
            TreeDocument::HuffmanTree { data, codes } => {
                let stored = (!codes.is_empty()).then_some(&codes);
                LoadedTree::Huffman(match data {
                    Some(snap) => HuffmanTree::from_snapshot(&snap, stored)?,
                    None => match codes.iter().next() {
                        Some((&symbol, code)) => {
                            return Err(SnapshotError::CodeMismatch {
                                symbol,
                                stored: code.clone(),
                                derived: String::new(),
                            })
                        }
                        None => HuffmanTree::new(),
                    },
                })
            }
        };
        debug!("store: rebuilt {type_name} ({mode:?})");
        Ok(tree)
    }
}

impl<T: Clone, C> From<&BinarySearchTree<T, C>> for TreeDocument<T>
where
    C: Fn(&T, &T) -> i32,
{
    fn from(tree: &BinarySearchTree<T, C>) -> Self {
        TreeDocument::BinarySearchTree {
            data: tree.get_tree_structure(),
        }
    }
}

impl<T: Clone, C> From<&AvlTree<T, C>> for TreeDocument<T>
where
    C: Fn(&T, &T) -> i32,
{
    fn from(tree: &AvlTree<T, C>) -> Self {
        TreeDocument::AvlTree {
            data: tree.get_tree_structure(),
        }
    }
}

impl<T: Clone> From<&BinaryTree<T>> for TreeDocument<T> {
    fn from(tree: &BinaryTree<T>) -> Self {
        TreeDocument::BinaryTree {
            data: tree.get_tree_structure(),
        }
    }
}

impl<T> From<&HuffmanTree> for TreeDocument<T> {
    fn from(tree: &HuffmanTree) -> Self {
        TreeDocument::HuffmanTree {
            data: tree.get_tree_structure(),
            codes: tree.get_codes().clone(),
        }
    }
}

/// A tree rebuilt from a [`TreeDocument`].
#[derive(Debug)]
pub enum LoadedTree<T> {
    Binary(BinaryTree<T>),
    Bst(BinarySearchTree<T>),
    Avl(AvlTree<T>),
    Huffman(HuffmanTree),
}

impl<T: Clone> LoadedTree<T> {
    /// Snapshot of the live tree, ready to be saved again.
    pub fn to_document(&self) -> TreeDocument<T> {
        match self {
            LoadedTree::Binary(tree) => tree.into(),
            LoadedTree::Bst(tree) => tree.into(),
            LoadedTree::Avl(tree) => tree.into(),
            LoadedTree::Huffman(tree) => tree.into(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for LoadedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadedTree::Binary(tree) => fmt::Display::fmt(tree, f),
            LoadedTree::Bst(tree) => fmt::Display::fmt(tree, f),
            LoadedTree::Avl(tree) => fmt::Display::fmt(tree, f),
            LoadedTree::Huffman(tree) => fmt::Display::fmt(tree, f),
        }
    }
}
