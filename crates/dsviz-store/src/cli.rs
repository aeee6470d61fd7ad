//! Logic behind the command-line tools.
//!
//! - `dsviz-tree <bst|avl|binary> <int>... [--delete <int>]...`: builds a
//!   tree and prints its document as JSON.
//! - `dsviz-huffman`: builds a Huffman tree from stdin and prints
//!   `{"encoded": <bits>, "tree": <document>}`.

use std::str::FromStr;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use dsviz_trees::{AvlTree, BinarySearchTree, BinaryTree, HuffmanError, HuffmanTree};

use crate::document::TreeDocument;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("unknown tree kind {0:?} (expected bst, avl or binary)")]
    UnknownKind(String),
    #[error("not an integer: {0:?}")]
    InvalidNumber(String),
    #[error(transparent)]
    Huffman(#[from] HuffmanError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub const TREE_USAGE: &str = "dsviz-tree <bst|avl|binary> <int>... [--delete <int>]...";

// ── dsviz-tree ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeKind {
    Bst,
    Avl,
    Binary,
}

impl FromStr for TreeKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bst" => Ok(TreeKind::Bst),
            "avl" => Ok(TreeKind::Avl),
            "binary" => Ok(TreeKind::Binary),
            other => Err(CliError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeCommand {
    pub kind: TreeKind,
    pub inserts: Vec<i64>,
    pub deletes: Vec<i64>,
}

fn parse_int(s: &str) -> Result<i64, CliError> {
    s.parse().map_err(|_| CliError::InvalidNumber(s.to_string()))
}

/// Parses the arguments after the program name.
pub fn parse_tree_args<I>(args: I) -> Result<TreeCommand, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let kind: TreeKind = args
        .next()
        .ok_or_else(|| CliError::Usage(TREE_USAGE.to_string()))?
        .parse()?;

    let mut inserts = Vec::new();
    let mut deletes = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--delete" {
            let value = args
                .next()
                .ok_or_else(|| CliError::Usage("--delete needs a value".to_string()))?;
            deletes.push(parse_int(&value)?);
        } else if !deletes.is_empty() {
            return Err(CliError::Usage(format!(
                "insert value {arg:?} after --delete; {TREE_USAGE}"
            )));
        } else {
            inserts.push(parse_int(&arg)?);
        }
    }

    if kind == TreeKind::Binary && !deletes.is_empty() {
        return Err(CliError::Usage(
            "binary trees do not support --delete".to_string(),
        ));
    }
    Ok(TreeCommand {
        kind,
        inserts,
        deletes,
    })
}

/// Builds the tree for `cmd` and returns its document.
pub fn build_tree(cmd: &TreeCommand) -> TreeDocument<i64> {
    match cmd.kind {
        TreeKind::Bst => {
            let mut tree = BinarySearchTree::new();
            for &v in &cmd.inserts {
                tree.insert(v);
            }
            for v in &cmd.deletes {
                if tree.delete(v).is_none() {
                    debug!("cli: {v} not in tree, nothing deleted");
                }
            }
            (&tree).into()
        }
        TreeKind::Avl => {
            let mut tree = AvlTree::new();
            for &v in &cmd.inserts {
                tree.insert(v);
            }
            for v in &cmd.deletes {
                if tree.delete(v).is_none() {
                    debug!("cli: {v} not in tree, nothing deleted");
                }
            }
            (&tree).into()
        }
        TreeKind::Binary => {
            let mut tree = BinaryTree::new();
            tree.insert_level_order(cmd.inserts.iter().copied());
            (&tree).into()
        }
    }
}

pub fn run_tree(cmd: &TreeCommand) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(&build_tree(cmd))?)
}

// ── dsviz-huffman ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HuffmanOutput {
    pub encoded: String,
    pub tree: TreeDocument<()>,
}

/// Drops one trailing line ending left by the shell.
pub fn strip_line_ending(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

pub fn encode_text(text: &str) -> Result<HuffmanOutput, CliError> {
    let mut tree = HuffmanTree::new();
    tree.build_from_text(text);
    let encoded = tree.encode(text)?;
    Ok(HuffmanOutput {
        encoded,
        tree: (&tree).into(),
    })
}

pub fn run_huffman(text: &str) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(&encode_text(text)?)?)
}
