//! Node contract shared by every tree in this crate.
//!
//! Nodes live in an [`Arena`](crate::arena::Arena) owned by the tree. Each
//! link is an `Option<u32>` slot index: `l` and `r` own their child, `p` is
//! a non-owning back-link used for in-order stepping and validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;

/// Binary-tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Per-tree node identifier, handed out once per inserted node.
///
/// Ids come from a counter owned by the tree that only ever increments, so
/// an id is never handed out twice by the same tree instance, even after
/// the node carrying it was deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(pub u64);

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value plus identity, the payload of binary search tree and plain
/// binary tree nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePayload<T> {
    pub value: T,
    pub id: StableId,
}

/// Monotonic [`StableId`] source.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdCounter {
    next: u64,
}

impl IdCounter {
    pub(crate) fn issue(&mut self) -> StableId {
        let id = StableId(self.next);
        self.next += 1;
        id
    }

    /// Makes sure ids issued from now on are greater than `seen`.
    pub(crate) fn observe(&mut self, seen: StableId) {
        self.next = self.next.max(seen.0 + 1);
    }
}

/// Borrowed, read-only view of one node inside a tree.
pub struct NodeRef<'a, N> {
    arena: &'a Arena<N>,
    idx: u32,
}

impl<'a, N> Clone for NodeRef<'a, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N> Copy for NodeRef<'a, N> {}

impl<'a, N: Node> NodeRef<'a, N> {
    pub(crate) fn new(arena: &'a Arena<N>, idx: u32) -> Self {
        Self { arena, idx }
    }

    /// Arena slot of this node. Only meaningful until the next mutation.
    pub fn index(&self) -> u32 {
        self.idx
    }

    pub fn node(&self) -> &'a N {
        &self.arena[self.idx]
    }

    pub fn left(&self) -> Option<NodeRef<'a, N>> {
        self.node().l().map(|i| NodeRef::new(self.arena, i))
    }

    pub fn right(&self) -> Option<NodeRef<'a, N>> {
        self.node().r().map(|i| NodeRef::new(self.arena, i))
    }

    pub fn parent(&self) -> Option<NodeRef<'a, N>> {
        self.node().p().map(|i| NodeRef::new(self.arena, i))
    }

    pub fn is_leaf(&self) -> bool {
        self.node().l().is_none() && self.node().r().is_none()
    }
}

impl<'a, N: fmt::Debug> fmt::Debug for NodeRef<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("idx", &self.idx)
            .field("node", &self.arena[self.idx])
            .finish()
    }
}

/// Implements [`Node`] for a struct with `p`, `l`, `r` fields.
macro_rules! impl_node_links {
    ($ty:ident $(<$($gen:ident),*>)?) => {
        impl$(<$($gen),*>)? $crate::types::Node for $ty$(<$($gen),*>)? {
            fn p(&self) -> Option<u32> {
                self.p
            }

            fn l(&self) -> Option<u32> {
                self.l
            }

            fn r(&self) -> Option<u32> {
                self.r
            }

            fn set_p(&mut self, v: Option<u32>) {
                self.p = v;
            }

            fn set_l(&mut self, v: Option<u32>) {
                self.l = v;
            }

            fn set_r(&mut self, v: Option<u32>) {
                self.r = v;
            }
        }
    };
}

pub(crate) use impl_node_links;
