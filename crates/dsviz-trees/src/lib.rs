//! Arena-backed binary trees built for inspection.
//!
//! Three ordered or weighted trees and one free-form tree, each exposing a
//! read-only recursive snapshot that visualizers and the `dsviz-store`
//! persistence layer consume:
//!
//! - **Binary search tree**: unbalanced, duplicates descend right.
//! - **AVL tree**: same ordering, rebalanced after every insert and delete.
//! - **Huffman tree**: built from symbol frequencies, encodes and decodes
//!   bit strings of `0`/`1` characters.
//! - **Binary tree**: no ordering, shape chosen by the caller.
//!
//! Nodes live in a per-tree [`Arena`](arena::Arena); links are `Option<u32>`
//! slot indices, never pointers. Every node carries a [`StableId`] that the
//! tree never reuses, so observers can follow a node across rotations.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`arena`] | Slot storage with free-list reuse |
//! [`types`] | [`Node`] trait, [`StableId`], [`NodeRef`] |
//! [`util`] | Linking, in-order stepping, search, link validation |
//! [`bst`] | [`BinarySearchTree`] |
//! [`avl`] | [`AvlTree`], rotations and height bookkeeping |
//! [`huffman`] | [`HuffmanTree`], frequency counting and code assignment |
//! [`binary_tree`] | [`BinaryTree`] |
//! [`snapshot`] | [`TreeSnapshot`] and [`LoadMode`] |
//! [`print`] | Box-drawing text rendering used by `Display` |
//! [`error`] | Error enums |

pub mod arena;
pub mod avl;
pub mod binary_tree;
pub mod bst;
pub mod error;
pub mod huffman;
pub mod print;
pub mod snapshot;
pub mod types;
pub mod util;

pub use avl::{AvlNode, AvlPayload, AvlTree};
pub use binary_tree::{BinaryTree, BinaryTreeNode};
pub use bst::{BinarySearchTree, BstNode};
pub use error::{HuffmanError, MalformedCode, SnapshotError};
pub use huffman::{frequencies, FrequencyTable, HuffmanNode, HuffmanPayload, HuffmanTree};
pub use snapshot::{LoadMode, TreeSnapshot};
pub use types::{Node, NodeRef, StableId, ValuePayload};
pub use util::default_comparator;
