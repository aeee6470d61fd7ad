//! Huffman coding tree.
//!
//! Built bottom-up by repeatedly merging the two lightest nodes from a
//! min-priority queue. Every symbol's code is its root-to-leaf path, which
//! makes the code table prefix-free.

mod build;
pub mod types;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::debug;

pub use build::{frequencies, SINGLETON_CODE};
pub use types::{FrequencyTable, HuffmanNode, HuffmanPayload};

use crate::arena::Arena;
use crate::error::{HuffmanError, MalformedCode, SnapshotError};
use crate::print::print_binary;
use crate::snapshot::{capture, restore, TreeSnapshot};
use crate::types::{IdCounter, NodeRef};
use crate::util::InOrder;

use self::build::{assign_codes, merge};

#[derive(Debug, Default)]
pub struct HuffmanTree {
    root: Option<u32>,
    arena: Arena<HuffmanNode>,
    ids: IdCounter,
    codes: BTreeMap<char, String>,
}

impl HuffmanTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the characters of `text` and builds from those counts.
    ///
    /// Empty input leaves the tree as it was.
    pub fn build_from_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // counts of one string sum to its length, which fits in u64
        self.rebuild(&frequencies(text));
    }

    /// Replaces the current tree with one built from `table`.
    ///
    /// An empty table leaves the tree as it was. A table whose frequencies
    /// sum past `u64::MAX` is rejected before anything is cleared, since the
    /// root weight would not be representable.
    pub fn build_from_frequency(&mut self, table: &FrequencyTable) -> Result<(), HuffmanError> {
        if table.is_empty() {
            return Ok(());
        }
        table
            .values()
            .try_fold(0u64, |total, &f| total.checked_add(f))
            .ok_or(HuffmanError::FrequencyOverflow)?;
        self.rebuild(table);
        Ok(())
    }

    fn rebuild(&mut self, table: &FrequencyTable) {
        self.clear();
        self.root = merge(&mut self.arena, &mut self.ids, table);
        self.codes = assign_codes(&self.arena, self.root);
        debug!(
            "huffman: built {} symbols into {} nodes",
            self.codes.len(),
            self.arena.len()
        );
    }

    /// Concatenates the code of every character of `text`.
    pub fn encode(&self, text: &str) -> Result<String, HuffmanError> {
        let mut out = String::new();
        for ch in text.chars() {
            let code = self.codes.get(&ch).ok_or(HuffmanError::UnknownSymbol(ch))?;
            out.push_str(code);
        }
        Ok(out)
    }

    /// Walks the tree bit by bit, emitting a symbol at each leaf.
    ///
    /// Fails on characters other than `0`/`1`, on a step into a missing
    /// child, and on input that stops between the root and a leaf.
    pub fn decode(&self, bits: &str) -> Result<String, HuffmanError> {
        let Some(root) = self.root else {
            return match bits.chars().next() {
                None => Ok(String::new()),
                Some('0' | '1') => Err(MalformedCode::DeadEnd { position: 0 }.into()),
                Some(found) => Err(MalformedCode::InvalidBit { position: 0, found }.into()),
            };
        };

        if self.arena[root].is_leaf() {
            return self.decode_singleton(root, bits);
        }

        let mut out = String::new();
        let mut curr = root;
        for (position, bit) in bits.chars().enumerate() {
            let next = match bit {
                '0' => self.arena[curr].l,
                '1' => self.arena[curr].r,
                found => return Err(MalformedCode::InvalidBit { position, found }.into()),
            };
            let next = next.ok_or(MalformedCode::DeadEnd { position })?;
            let node = &self.arena[next];
            if node.is_leaf() {
                let symbol = node.symbol().ok_or(MalformedCode::DeadEnd { position })?;
                out.push(symbol);
                curr = root;
            } else {
                curr = next;
            }
        }

        if curr != root {
            return Err(MalformedCode::Truncated.into());
        }
        Ok(out)
    }

    /// A lone leaf decodes one symbol per [`SINGLETON_CODE`] bit.
    fn decode_singleton(&self, root: u32, bits: &str) -> Result<String, HuffmanError> {
        let symbol = self.arena[root]
            .symbol()
            .ok_or(MalformedCode::DeadEnd { position: 0 })?;
        let mut out = String::new();
        for (position, bit) in bits.chars().enumerate() {
            match bit {
                '0' => out.push(symbol),
                '1' => return Err(MalformedCode::DeadEnd { position }.into()),
                found => return Err(MalformedCode::InvalidBit { position, found }.into()),
            }
        }
        Ok(out)
    }

    pub fn get_codes(&self) -> &BTreeMap<char, String> {
        &self.codes
    }

    /// Sum of `frequency * code length` over all symbols: the encoded size
    /// in bits of the text the tree was built from.
    pub fn weighted_path_length(&self) -> u64 {
        self.arena
            .iter()
            .filter(|(_, n)| n.is_leaf())
            .filter_map(|(_, n)| {
                let code = self.codes.get(&n.symbol()?)?;
                Some(n.frequency() * code.len() as u64)
            })
            .sum()
    }

    pub fn root(&self) -> Option<NodeRef<'_, HuffmanNode>> {
        self.root.map(|i| NodeRef::new(&self.arena, i))
    }

    /// Number of nodes, leaves and internal ones.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'_, HuffmanNode>> + '_ {
        InOrder::new(&self.arena, self.root)
            .filter(|&i| self.arena[i].is_leaf())
            .map(|i| NodeRef::new(&self.arena, i))
    }

    pub fn get_tree_structure(&self) -> Option<TreeSnapshot<HuffmanPayload>> {
        capture(&self.arena, self.root, &|n: &HuffmanNode| (n.payload.clone(), None))
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.codes.clear();
    }

    /// Loads a tree from its snapshot and regenerates the code table.
    ///
    /// Every leaf must carry a distinct symbol and no children; every
    /// internal node must carry no symbol, two children, and the sum of
    /// their frequencies. When `stored_codes` is given it must match the
    /// regenerated table.
    pub fn from_snapshot(
        snapshot: &TreeSnapshot<HuffmanPayload>,
        stored_codes: Option<&BTreeMap<char, String>>,
    ) -> Result<Self, SnapshotError> {
        check_shape(snapshot)?;

        let mut tree = Self::new();
        let mut symbols = HashSet::new();
        let ids = &mut tree.ids;
        let root = restore(&mut tree.arena, snapshot, &mut |data: &HuffmanPayload| {
            match data.symbol {
                Some(symbol) => {
                    if !symbols.insert(symbol) {
                        return Err(SnapshotError::DuplicateSymbol(symbol));
                    }
                    Ok(HuffmanNode::leaf(symbol, data.frequency, ids.issue()))
                }
                None => Ok(HuffmanNode::internal(data.frequency, ids.issue())),
            }
        })?;
        tree.root = Some(root);
        tree.codes = assign_codes(&tree.arena, tree.root);

        if let Some(stored) = stored_codes {
            for (&symbol, derived) in &tree.codes {
                let stored = stored.get(&symbol).cloned().unwrap_or_default();
                if &stored != derived {
                    return Err(SnapshotError::CodeMismatch {
                        symbol,
                        stored,
                        derived: derived.clone(),
                    });
                }
            }
            if let Some((&symbol, code)) = stored.iter().find(|(s, _)| !tree.codes.contains_key(*s)) {
                return Err(SnapshotError::CodeMismatch {
                    symbol,
                    stored: code.clone(),
                    derived: String::new(),
                });
            }
        }
        debug!("huffman: loaded {} symbols from snapshot", tree.codes.len());
        Ok(tree)
    }
}

fn check_shape(root: &TreeSnapshot<HuffmanPayload>) -> Result<(), SnapshotError> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let data = &node.data;
        match (&node.left, &node.right) {
            (None, None) => {
                if !data.is_leaf || data.symbol.is_none() {
                    return Err(SnapshotError::MalformedHuffmanNode(
                        "childless node must be a leaf with a symbol".to_string(),
                    ));
                }
            }
            (Some(l), Some(r)) => {
                if data.is_leaf || data.symbol.is_some() {
                    return Err(SnapshotError::MalformedHuffmanNode(
                        "internal node must not carry a symbol".to_string(),
                    ));
                }
                let (lf, rf) = (l.data.frequency, r.data.frequency);
                if lf.checked_add(rf) != Some(data.frequency) {
                    return Err(SnapshotError::MalformedHuffmanNode(format!(
                        "frequency {} is not {lf} + {rf}",
                        data.frequency
                    )));
                }
                stack.push(r);
                stack.push(l);
            }
            _ => {
                return Err(SnapshotError::MalformedHuffmanNode(
                    "internal node must have two children".to_string(),
                ));
            }
        }
    }
    Ok(())
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = print_binary(&self.arena, self.root, &|n: &HuffmanNode| match n.symbol() {
            Some(symbol) => format!("{symbol:?}:{}", n.frequency()),
            None => n.frequency().to_string(),
        });
        f.write_str(&out)
    }
}
