//! Height-balanced binary search tree.
//!
//! Same ordering rules as [`BinarySearchTree`](crate::bst::BinarySearchTree)
//! (duplicates descend right), plus `|height(left) - height(right)| <= 1`
//! at every node once an insert or delete returns. Cached heights are kept
//! bottom-up on the way back out of each recursive call.

pub mod types;
pub mod util;

use std::collections::HashSet;
use std::fmt;

use log::{debug, trace};

pub use types::{AvlNode, AvlPayload};
pub use util::{assert_avl_tree, balance_factor, height, rotate_left, rotate_right, update_height};

use crate::arena::Arena;
use crate::error::SnapshotError;
use crate::print::print_binary;
use crate::snapshot::{capture, restore, LoadMode, TreeSnapshot};
use crate::types::{IdCounter, NodeRef, StableId};
use crate::util::{default_comparator, find, first, last, link_left, link_right, make_root, InOrder};

use self::util::{rebalance_after_delete, recompute_heights};

pub struct AvlTree<T, C = fn(&T, &T) -> i32>
where
    C: Fn(&T, &T) -> i32,
{
    root: Option<u32>,
    arena: Arena<AvlNode<T>>,
    ids: IdCounter,
    comparator: C,
}

impl<T> AvlTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<T>)
    }
}

impl<T> Default for AvlTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            arena: Arena::new(),
            ids: IdCounter::default(),
            comparator,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `value` and rebalances; duplicates are kept. Always succeeds.
    pub fn insert(&mut self, value: T) -> bool {
        self.insert_tracked(value);
        true
    }

    /// Like [`insert`](Self::insert), returning the id given to the new node.
    pub fn insert_tracked(&mut self, value: T) -> StableId {
        let id = self.ids.issue();
        let node = self.arena.alloc(AvlNode::new(value, id));
        let root = self.insert_at(self.root, node);
        self.root = make_root(&mut self.arena, Some(root));
        trace!("avl: inserted {id}, height now {}", self.height());
        id
    }

    fn cmp_nodes(&self, a: u32, b: u32) -> i32 {
        (self.comparator)(self.arena[a].value(), self.arena[b].value())
    }

    /// Inserts `new` under `node`; returns the subtree's new root.
    fn insert_at(&mut self, node: Option<u32>, new: u32) -> u32 {
        let Some(n) = node else {
            return new;
        };

        if self.cmp_nodes(new, n) < 0 {
            let l = self.insert_at(self.arena[n].l, new);
            link_left(&mut self.arena, n, Some(l));
        } else {
            let r = self.insert_at(self.arena[n].r, new);
            link_right(&mut self.arena, n, Some(r));
        }

        update_height(&mut self.arena, n);
        let balance = balance_factor(&self.arena, Some(n));

        // The new value went left of a child exactly when it compares less
        // than that child, so the comparison picks the rotation case.
        if balance > 1 {
            let l = self.arena[n].l.expect("left-heavy node has a left child");
            if self.cmp_nodes(new, l) < 0 {
                debug!("avl: left-left at {}", self.arena[n].id());
            } else {
                debug!("avl: left-right at {}", self.arena[n].id());
                let l = rotate_left(&mut self.arena, l);
                link_left(&mut self.arena, n, Some(l));
            }
            return rotate_right(&mut self.arena, n);
        }

        if balance < -1 {
            let r = self.arena[n].r.expect("right-heavy node has a right child");
            if self.cmp_nodes(new, r) >= 0 {
                debug!("avl: right-right at {}", self.arena[n].id());
            } else {
                debug!("avl: right-left at {}", self.arena[n].id());
                let r = rotate_right(&mut self.arena, r);
                link_right(&mut self.arena, n, Some(r));
            }
            return rotate_left(&mut self.arena, n);
        }

        n
    }

    /// First node on the search path whose value compares equal.
    pub fn search(&self, value: &T) -> Option<NodeRef<'_, AvlNode<T>>> {
        self.find_idx(value).map(|i| NodeRef::new(&self.arena, i))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_idx(value).is_some()
    }

    fn find_idx(&self, value: &T) -> Option<u32> {
        find(&self.arena, self.root, value, AvlNode::value, &self.comparator)
    }

    /// Removes one occurrence of `value`, rebalancing every ancestor on the
    /// way back up, and returns it. Absent values leave the tree untouched.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        self.find_idx(value)?;

        let mut removed = None;
        let root = self.delete_at(self.root, value, &mut removed);
        self.root = make_root(&mut self.arena, root);

        let removed = removed.and_then(|i| self.arena.release(i))?;
        trace!("avl: deleted {}, height now {}", removed.id(), self.height());
        Some(removed.payload.value)
    }

    fn delete_at(&mut self, node: Option<u32>, value: &T, removed: &mut Option<u32>) -> Option<u32> {
        let n = node?;
        let cmp = (self.comparator)(value, self.arena[n].value());

        if cmp < 0 {
            let l = self.delete_at(self.arena[n].l, value, removed);
            link_left(&mut self.arena, n, l);
        } else if cmp > 0 {
            let r = self.delete_at(self.arena[n].r, value, removed);
            link_right(&mut self.arena, n, r);
        } else {
            match (self.arena[n].l, self.arena[n].r) {
                (Some(_), Some(r)) => {
                    let (rest, succ) = self.detach_min(r);
                    link_right(&mut self.arena, n, rest);
                    let (node, succ_node) = self.arena.pair_mut(n, succ);
                    std::mem::swap(&mut node.payload, &mut succ_node.payload);
                    *removed = Some(succ);
                }
                (l, r) => {
                    *removed = Some(n);
                    return l.or(r);
                }
            }
        }

        Some(rebalance_after_delete(&mut self.arena, n))
    }

    /// Unhooks the leftmost node under `n`, rebalancing on the way up.
    ///
    /// Returns the remaining subtree and the detached slot.
    fn detach_min(&mut self, n: u32) -> (Option<u32>, u32) {
        match self.arena[n].l {
            None => (self.arena[n].r, n),
            Some(l) => {
                let (rest, min) = self.detach_min(l);
                link_left(&mut self.arena, n, rest);
                (Some(rebalance_after_delete(&mut self.arena, n)), min)
            }
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    pub fn root(&self) -> Option<NodeRef<'_, AvlNode<T>>> {
        self.root.map(|i| NodeRef::new(&self.arena, i))
    }

    /// Cached height of the root; 0 for an empty tree.
    pub fn height(&self) -> u32 {
        height(&self.arena, self.root)
    }

    pub fn min(&self) -> Option<&T> {
        first(&self.arena, self.root).map(|i| self.arena[i].value())
    }

    pub fn max(&self) -> Option<&T> {
        last(&self.arena, self.root).map(|i| self.arena[i].value())
    }

    /// Values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        InOrder::new(&self.arena, self.root).map(|i| self.arena[i].value())
    }

    /// Nodes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_, AvlNode<T>>> + '_ {
        InOrder::new(&self.arena, self.root).map(|i| NodeRef::new(&self.arena, i))
    }

    /// Snapshot carrying each node's payload (with display balance) and height.
    pub fn get_tree_structure(&self) -> Option<TreeSnapshot<AvlPayload<T>>>
    where
        T: Clone,
    {
        capture(&self.arena, self.root, &|n: &AvlNode<T>| {
            (n.payload.clone(), Some(n.height))
        })
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        assert_avl_tree(&self.arena, self.root, &self.comparator)
    }
}

impl<T> AvlTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd + Clone,
{
    /// Loads a tree from its snapshot.
    ///
    /// Stored heights are never trusted. See [`LoadMode`] for how the shape
    /// itself is treated.
    pub fn from_snapshot(
        snapshot: &TreeSnapshot<AvlPayload<T>>,
        mode: LoadMode,
    ) -> Result<Self, SnapshotError> {
        let mut tree = Self::new();
        match mode {
            LoadMode::Rebuild => {
                for data in snapshot.pre_order() {
                    tree.insert(data.value.clone());
                }
                debug!("avl: rebuilt {} nodes from snapshot", tree.len());
            }
            LoadMode::Verify => {
                let mut seen = HashSet::new();
                let root = restore(&mut tree.arena, snapshot, &mut |data: &AvlPayload<T>| {
                    if !seen.insert(data.id) {
                        return Err(SnapshotError::DuplicateId(data.id));
                    }
                    Ok(AvlNode::new(data.value.clone(), data.id))
                })?;
                tree.root = Some(root);
                for id in seen {
                    tree.ids.observe(id);
                }
                recompute_heights(&mut tree.arena, tree.root);
                tree.verify_loaded()?;
                debug!("avl: loaded {} nodes from snapshot", tree.len());
            }
        }
        Ok(tree)
    }

    fn verify_loaded(&self) -> Result<(), SnapshotError> {
        let mut prev: Option<u32> = None;
        for i in InOrder::new(&self.arena, self.root) {
            let node = &self.arena[i];
            if !(-1..=1).contains(&node.balance()) {
                return Err(SnapshotError::Unbalanced {
                    id: node.id(),
                    balance: node.balance(),
                });
            }
            if let Some(p) = prev {
                if self.arena[p].value() > node.value() {
                    return Err(SnapshotError::Unordered(node.id()));
                }
            }
            prev = Some(i);
        }
        Ok(())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlTree")
            .field("root", &self.root)
            .field("arena", &self.arena)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Display, C> fmt::Display for AvlTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = print_binary(&self.arena, self.root, &|n: &AvlNode<T>| {
            format!("{} {} [h={} bf={}]", n.value(), n.id(), n.height, n.balance())
        });
        f.write_str(&out)
    }
}
