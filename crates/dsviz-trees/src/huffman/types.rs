use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{impl_node_links, StableId};

/// Symbol counts in first-occurrence order.
///
/// The order is the merge tie-break, so the same table always builds the
/// same tree.
pub type FrequencyTable = IndexMap<char, u64>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuffmanPayload {
    /// `None` on internal nodes.
    pub symbol: Option<char>,
    pub frequency: u64,
    pub is_leaf: bool,
}

#[derive(Clone, Debug)]
pub struct HuffmanNode {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub id: StableId,
    pub payload: HuffmanPayload,
}

impl HuffmanNode {
    pub fn leaf(symbol: char, frequency: u64, id: StableId) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            id,
            payload: HuffmanPayload {
                symbol: Some(symbol),
                frequency,
                is_leaf: true,
            },
        }
    }

    pub fn internal(frequency: u64, id: StableId) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            id,
            payload: HuffmanPayload {
                symbol: None,
                frequency,
                is_leaf: false,
            },
        }
    }

    pub fn symbol(&self) -> Option<char> {
        self.payload.symbol
    }

    pub fn frequency(&self) -> u64 {
        self.payload.frequency
    }

    pub fn is_leaf(&self) -> bool {
        self.payload.is_leaf
    }
}

impl_node_links!(HuffmanNode);
