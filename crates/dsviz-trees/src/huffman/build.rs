//! Greedy bottom-up construction and code assignment.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use log::trace;

use crate::arena::Arena;
use crate::types::IdCounter;
use crate::util::{link_left, link_right};

use super::types::{FrequencyTable, HuffmanNode};

/// Code given to the only symbol of a single-leaf tree.
pub const SINGLETON_CODE: &str = "0";

/// Counts every `char` of `text`, keeping first-occurrence order.
pub fn frequencies(text: &str) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for ch in text.chars() {
        *table.entry(ch).or_insert(0) += 1;
    }
    table
}

/// Builds the tree for `table` in `arena` and returns the root slot.
///
/// The queue orders by `(frequency, seq)`; `seq` grows with every push, so
/// among equal frequencies the earlier leaf (or earlier merge) pops first.
/// The first pop becomes the left child. The table's total must fit in a
/// `u64`; every merged weight is bounded by it.
pub(crate) fn merge(
    arena: &mut Arena<HuffmanNode>,
    ids: &mut IdCounter,
    table: &FrequencyTable,
) -> Option<u32> {
    let mut heap = BinaryHeap::with_capacity(table.len());
    let mut seq: u64 = 0;
    for (&symbol, &frequency) in table {
        let leaf = arena.alloc(HuffmanNode::leaf(symbol, frequency, ids.issue()));
        heap.push(Reverse((frequency, seq, leaf)));
        seq += 1;
    }

    while heap.len() > 1 {
        let Some(Reverse((fa, _, a))) = heap.pop() else {
            break;
        };
        let Some(Reverse((fb, _, b))) = heap.pop() else {
            break;
        };
        let merged = arena.alloc(HuffmanNode::internal(fa + fb, ids.issue()));
        link_left(arena, merged, Some(a));
        link_right(arena, merged, Some(b));
        trace!("huffman: merged {fa} + {fb} into {}", arena[merged].id);
        heap.push(Reverse((fa + fb, seq, merged)));
        seq += 1;
    }

    heap.pop().map(|Reverse((_, _, root))| root)
}

/// Root-to-leaf paths, `0` for left and `1` for right.
///
/// A tree that is a single leaf gets [`SINGLETON_CODE`] so every symbol has
/// a non-empty code.
pub(crate) fn assign_codes(arena: &Arena<HuffmanNode>, root: Option<u32>) -> BTreeMap<char, String> {
    let mut codes = BTreeMap::new();
    let Some(root) = root else {
        return codes;
    };

    if arena[root].is_leaf() {
        if let Some(symbol) = arena[root].symbol() {
            codes.insert(symbol, SINGLETON_CODE.to_string());
        }
        return codes;
    }

    let mut stack = vec![(root, String::new())];
    while let Some((idx, path)) = stack.pop() {
        let node = &arena[idx];
        if node.is_leaf() {
            if let Some(symbol) = node.symbol() {
                codes.insert(symbol, path);
            }
            continue;
        }
        if let Some(r) = node.r {
            stack.push((r, format!("{path}1")));
        }
        if let Some(l) = node.l {
            stack.push((l, format!("{path}0")));
        }
    }
    codes
}
