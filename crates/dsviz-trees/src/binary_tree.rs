//! Plain binary tree whose shape is chosen by the caller.
//!
//! No ordering is kept. Nodes are addressed by [`StableId`], which is how
//! callers pick the parent for [`BinaryTree::insert_left`] and
//! [`BinaryTree::insert_right`].

use std::collections::{HashSet, VecDeque};
use std::fmt;

use log::debug;

use crate::arena::Arena;
use crate::error::SnapshotError;
use crate::print::print_binary;
use crate::snapshot::{capture, restore, TreeSnapshot};
use crate::types::{impl_node_links, IdCounter, NodeRef, StableId, ValuePayload};
use crate::util::{height, link_left, link_right, release_subtree};

#[derive(Clone, Debug)]
pub struct BinaryTreeNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub payload: ValuePayload<T>,
}

impl<T> BinaryTreeNode<T> {
    fn new(value: T, id: StableId) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            payload: ValuePayload { value, id },
        }
    }

    pub fn value(&self) -> &T {
        &self.payload.value
    }

    pub fn id(&self) -> StableId {
        self.payload.id
    }
}

impl_node_links!(BinaryTreeNode<T>);

#[derive(Debug)]
pub struct BinaryTree<T> {
    root: Option<u32>,
    arena: Arena<BinaryTreeNode<T>>,
    ids: IdCounter,
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl<T> BinaryTree<T> {
    pub fn new() -> Self {
        Self {
            root: None,
            arena: Arena::new(),
            ids: IdCounter::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Replaces the contents with a complete tree filled breadth-first.
    ///
    /// Returns the ids of the new nodes in input order. An empty input
    /// leaves the tree as it was.
    pub fn insert_level_order<I>(&mut self, values: I) -> Vec<StableId>
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Vec::new();
        }
        self.clear();

        let mut ids = Vec::new();
        let mut queue: VecDeque<u32> = VecDeque::new();
        for value in values {
            let id = self.ids.issue();
            let idx = self.arena.alloc(BinaryTreeNode::new(value, id));
            ids.push(id);
            match queue.front().copied() {
                None if self.root.is_none() => self.root = Some(idx),
                None => unreachable!("level-order queue drained before the tree was full"),
                Some(parent) => {
                    if self.arena[parent].l.is_none() {
                        link_left(&mut self.arena, parent, Some(idx));
                    } else {
                        link_right(&mut self.arena, parent, Some(idx));
                        queue.pop_front();
                    }
                }
            }
            queue.push_back(idx);
        }
        debug!("binary tree: filled {} nodes level by level", ids.len());
        ids
    }

    /// Attaches `value` as left child of `parent`, discarding whatever
    /// subtree was there. `None` if no node has id `parent`.
    pub fn insert_left(&mut self, parent: StableId, value: T) -> Option<StableId> {
        self.attach(parent, value, Side::Left)
    }

    /// Right-hand counterpart of [`insert_left`](Self::insert_left).
    pub fn insert_right(&mut self, parent: StableId, value: T) -> Option<StableId> {
        self.attach(parent, value, Side::Right)
    }

    fn attach(&mut self, parent: StableId, value: T, side: Side) -> Option<StableId> {
        let p = self.find_idx(parent)?;
        let old = match side {
            Side::Left => self.arena[p].l,
            Side::Right => self.arena[p].r,
        };
        let dropped = release_subtree(&mut self.arena, old);
        if dropped > 0 {
            debug!("binary tree: replaced {dropped} nodes under {parent}");
        }

        let id = self.ids.issue();
        let idx = self.arena.alloc(BinaryTreeNode::new(value, id));
        match side {
            Side::Left => link_left(&mut self.arena, p, Some(idx)),
            Side::Right => link_right(&mut self.arena, p, Some(idx)),
        }
        Some(id)
    }

    fn find_idx(&self, id: StableId) -> Option<u32> {
        self.arena.iter().find(|(_, n)| n.id() == id).map(|(i, _)| i)
    }

    pub fn find(&self, id: StableId) -> Option<NodeRef<'_, BinaryTreeNode<T>>> {
        self.find_idx(id).map(|i| NodeRef::new(&self.arena, i))
    }

    pub fn root(&self) -> Option<NodeRef<'_, BinaryTreeNode<T>>> {
        self.root.map(|i| NodeRef::new(&self.arena, i))
    }

    pub fn height(&self) -> u32 {
        height(&self.arena, self.root)
    }

    /// Values breadth-first, left to right within a level.
    pub fn level_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len());
        let mut queue: VecDeque<u32> = self.root.into_iter().collect();
        while let Some(idx) = queue.pop_front() {
            let node = &self.arena[idx];
            out.push(node.value());
            queue.extend(node.l);
            queue.extend(node.r);
        }
        out
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    pub fn get_tree_structure(&self) -> Option<TreeSnapshot<ValuePayload<T>>>
    where
        T: Clone,
    {
        capture(&self.arena, self.root, &|n: &BinaryTreeNode<T>| (n.payload.clone(), None))
    }

    /// Rebuilds the exact shape of `snapshot`, keeping its ids.
    pub fn from_snapshot(snapshot: &TreeSnapshot<ValuePayload<T>>) -> Result<Self, SnapshotError>
    where
        T: Clone,
    {
        let mut tree = Self::new();
        let mut seen = HashSet::new();
        let root = restore(&mut tree.arena, snapshot, &mut |data: &ValuePayload<T>| {
            if !seen.insert(data.id) {
                return Err(SnapshotError::DuplicateId(data.id));
            }
            Ok(BinaryTreeNode::new(data.value.clone(), data.id))
        })?;
        tree.root = Some(root);
        for id in seen {
            tree.ids.observe(id);
        }
        Ok(tree)
    }
}

impl<T: fmt::Display> fmt::Display for BinaryTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = print_binary(&self.arena, self.root, &|n: &BinaryTreeNode<T>| {
            format!("{} {}", n.value(), n.id())
        });
        f.write_str(&out)
    }
}
