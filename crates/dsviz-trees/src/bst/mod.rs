//! Unbalanced binary search tree that keeps duplicates.
//!
//! Equal values always descend right, so for every node the left subtree
//! holds values `<=` and the right subtree values `>=` the node's value.

pub mod types;

use std::collections::HashSet;
use std::fmt;

use log::{debug, trace};

pub use types::BstNode;

use crate::arena::Arena;
use crate::error::SnapshotError;
use crate::print::print_binary;
use crate::snapshot::{capture, restore, TreeSnapshot};
use crate::types::{IdCounter, NodeRef, StableId, ValuePayload};
use crate::util::{
    assert_links, default_comparator, find, first, get_l, get_p, get_r, height, last,
    link_left, link_right, make_root, InOrder,
};

pub struct BinarySearchTree<T, C = fn(&T, &T) -> i32>
where
    C: Fn(&T, &T) -> i32,
{
    root: Option<u32>,
    arena: Arena<BstNode<T>>,
    ids: IdCounter,
    comparator: C,
}

impl<T> BinarySearchTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<T>)
    }
}

impl<T> Default for BinarySearchTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> BinarySearchTree<T, C>
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

    /// Inserts `value` as a new leaf. Duplicates are kept; always succeeds.
    pub fn insert(&mut self, value: T) -> bool {
        self.insert_tracked(value);
        true
    }

    /// Like [`insert`](Self::insert), returning the id given to the new node.
    pub fn insert_tracked(&mut self, value: T) -> StableId {
        let id = self.ids.issue();
        let node = self.arena.alloc(BstNode::new(value, id));

        let Some(mut curr) = self.root else {
            self.root = Some(node);
            trace!("bst: {id} becomes root");
            return id;
        };

        loop {
            let cmp = (self.comparator)(self.arena[node].value(), self.arena[curr].value());
            let next = if cmp < 0 {
                get_l(&self.arena, curr)
            } else {
                get_r(&self.arena, curr)
            };
            match next {
                Some(next) => curr = next,
                None => {
                    if cmp < 0 {
                        link_left(&mut self.arena, curr, Some(node));
                    } else {
                        link_right(&mut self.arena, curr, Some(node));
                    }
                    trace!("bst: {id} attached under {}", self.arena[curr].id());
                    return id;
                }
            }
        }
    }

    /// First node on the search path whose value compares equal.
    pub fn search(&self, value: &T) -> Option<NodeRef<'_, BstNode<T>>> {
        self.find_idx(value).map(|i| NodeRef::new(&self.arena, i))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_idx(value).is_some()
    }

    fn find_idx(&self, value: &T) -> Option<u32> {
        find(&self.arena, self.root, value, BstNode::value, &self.comparator)
    }

    /// Removes one occurrence of `value` and returns it.
    ///
    /// A node with two children takes over its in-order successor's payload
    /// and the successor's node is spliced out instead. Absent values leave
    /// the tree untouched.
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let n = self.find_idx(value)?;
        let doomed = match (get_l(&self.arena, n), get_r(&self.arena, n)) {
            (Some(_), Some(r)) => {
                let succ = first(&self.arena, Some(r)).expect("right subtree is not empty");
                let (node, succ_node) = self.arena.pair_mut(n, succ);
                std::mem::swap(&mut node.payload, &mut succ_node.payload);
                debug!(
                    "bst: successor {} moves up into slot of removed node",
                    self.arena[n].id()
                );
                succ
            }
            _ => n,
        };
        self.splice(doomed);
        self.arena.release(doomed).map(|node| node.payload.value)
    }

    /// Unlinks a node that has at most one child, moving the child up.
    fn splice(&mut self, n: u32) {
        let child = get_l(&self.arena, n).or(get_r(&self.arena, n));
        match get_p(&self.arena, n) {
            None => self.root = make_root(&mut self.arena, child),
            Some(p) => {
                if get_l(&self.arena, p) == Some(n) {
                    link_left(&mut self.arena, p, child);
                } else {
                    link_right(&mut self.arena, p, child);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    pub fn root(&self) -> Option<NodeRef<'_, BstNode<T>>> {
        self.root.map(|i| NodeRef::new(&self.arena, i))
    }

    /// Number of levels; 0 for an empty tree.
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
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_, BstNode<T>>> + '_ {
        InOrder::new(&self.arena, self.root).map(|i| NodeRef::new(&self.arena, i))
    }

    pub fn get_tree_structure(&self) -> Option<TreeSnapshot<ValuePayload<T>>>
    where
        T: Clone,
    {
        capture(&self.arena, self.root, &|n: &BstNode<T>| (n.payload.clone(), None))
    }

    /// Checks links and ordering.
    pub fn assert_valid(&self) -> Result<(), String> {
        assert_links(&self.arena, self.root)?;
        let mut stack: Vec<u32> = self.root.into_iter().collect();
        while let Some(n) = stack.pop() {
            let value = self.arena[n].value();
            if let Some(l) = get_l(&self.arena, n) {
                if (self.comparator)(self.arena[l].value(), value) > 0 {
                    return Err("Left child greater than parent".to_string());
                }
                stack.push(l);
            }
            if let Some(r) = get_r(&self.arena, n) {
                if (self.comparator)(self.arena[r].value(), value) < 0 {
                    return Err("Right child less than parent".to_string());
                }
                stack.push(r);
            }
        }
        self.assert_in_order()
    }

    fn assert_in_order(&self) -> Result<(), String> {
        let mut prev: Option<&T> = None;
        for value in self.values() {
            if let Some(prev) = prev {
                if (self.comparator)(prev, value) > 0 {
                    return Err("Node order violated".to_string());
                }
            }
            prev = Some(value);
        }
        Ok(())
    }
}

impl<T> BinarySearchTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd + Clone,
{
    /// Rebuilds a tree from its snapshot, keeping shape and ids.
    pub fn from_snapshot(snapshot: &TreeSnapshot<ValuePayload<T>>) -> Result<Self, SnapshotError> {
        let mut tree = Self::new();
        let mut seen = HashSet::new();
        let root = restore(&mut tree.arena, snapshot, &mut |data: &ValuePayload<T>| {
            if !seen.insert(data.id) {
                return Err(SnapshotError::DuplicateId(data.id));
            }
            Ok(BstNode::new(data.value.clone(), data.id))
        })?;
        tree.root = Some(root);
        for id in seen {
            tree.ids.observe(id);
        }

        let mut prev: Option<u32> = None;
        for i in InOrder::new(&tree.arena, tree.root) {
            if let Some(p) = prev {
                if tree.arena[p].value() > tree.arena[i].value() {
                    return Err(SnapshotError::Unordered(tree.arena[i].id()));
                }
            }
            prev = Some(i);
        }
        debug!("bst: loaded {} nodes from snapshot", tree.len());
        Ok(tree)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinarySearchTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinarySearchTree")
            .field("root", &self.root)
            .field("arena", &self.arena)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Display, C> fmt::Display for BinarySearchTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = print_binary(&self.arena, self.root, &|n: &BstNode<T>| {
            format!("{} {}", n.value(), n.id())
        });
        f.write_str(&out)
    }
}
