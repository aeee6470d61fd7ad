//! JSON persistence for [`dsviz_trees`] and the logic of the `dsviz-tree`
//! and `dsviz-huffman` binaries.
//!
//! A saved file is an [`Envelope`]: format metadata plus one
//! [`TreeDocument`], the type-tagged snapshot of a tree. Loading hands the
//! document back; [`TreeDocument::into_tree`] rebuilds the live tree.

pub mod cli;
pub mod document;
pub mod error;
pub mod store;

pub use document::{LoadedTree, TreeDocument};
pub use error::StoreError;
pub use store::{
    from_json_str, load_from_file, load_tree_from_file, save_to_file, to_json_string, Envelope,
    Metadata, StoreOptions, FORMAT_VERSION,
};
