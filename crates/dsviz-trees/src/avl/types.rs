use serde::{Deserialize, Serialize};

use crate::types::{impl_node_links, StableId};

/// What an AVL node carries.
///
/// `balance` is a display copy of `height(left) - height(right)`, refreshed
/// whenever the node's height is; rebalancing never reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvlPayload<T> {
    pub value: T,
    pub id: StableId,
    pub balance: i32,
}

#[derive(Clone, Debug)]
pub struct AvlNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    /// Cached subtree height; a lone node has height 1.
    pub height: u32,
    pub payload: AvlPayload<T>,
}

impl<T> AvlNode<T> {
    pub fn new(value: T, id: StableId) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            height: 1,
            payload: AvlPayload {
                value,
                id,
                balance: 0,
            },
        }
    }

    pub fn value(&self) -> &T {
        &self.payload.value
    }

    pub fn id(&self) -> StableId {
        self.payload.id
    }

    pub fn balance(&self) -> i32 {
        self.payload.balance
    }
}

impl_node_links!(AvlNode<T>);
