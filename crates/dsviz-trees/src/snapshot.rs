//! Read-only structural exports and the loaders' shared plumbing.
//!
//! A snapshot is the recursive `{data, height?, left, right}` shape that
//! external observers and the persistence layer consume. `height` is only
//! carried by AVL snapshots and is a hint: loaders recompute it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::error::SnapshotError;
use crate::types::Node;
use crate::util::{link_left, link_right};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot<P> {
    pub data: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub left: Option<Box<TreeSnapshot<P>>>,
    pub right: Option<Box<TreeSnapshot<P>>>,
}

impl<P> TreeSnapshot<P> {
    pub fn leaf(data: P) -> Self {
        Self {
            data,
            height: None,
            left: None,
            right: None,
        }
    }

    pub fn with_children(
        data: P,
        left: Option<TreeSnapshot<P>>,
        right: Option<TreeSnapshot<P>>,
    ) -> Self {
        Self {
            data,
            height: None,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
        count
    }

    /// Payloads in pre-order (node, left, right).
    pub fn pre_order(&self) -> Vec<&P> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(&node.data);
            if let Some(r) = &node.right {
                stack.push(r);
            }
            if let Some(l) = &node.left {
                stack.push(l);
            }
        }
        out
    }

    /// Payloads in order (left, node, right).
    pub fn in_order(&self) -> Vec<&P> {
        let mut out = Vec::new();
        let mut stack: Vec<&TreeSnapshot<P>> = Vec::new();
        let mut curr = Some(self);
        while curr.is_some() || !stack.is_empty() {
            while let Some(node) = curr {
                stack.push(node);
                curr = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push(&node.data);
                curr = node.right.as_deref();
            }
        }
        out
    }
}

// Unlinks children onto a heap stack so dropping a deep chain does not
// recurse once per level.
impl<P> Drop for TreeSnapshot<P> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TreeSnapshot<P>>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// How a loader treats a serialized ordered tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadMode {
    /// Keep the serialized shape, recompute cached heights, reject the
    /// snapshot if ordering or balance does not hold.
    #[default]
    Verify,
    /// Re-insert the values in pre-order through the regular insert path.
    Rebuild,
}

/// Builds a snapshot of the subtree at `root`.
///
/// `data_of` yields the payload and the optional height for one node.
/// Children are built before their parent by replaying a pre-order walk
/// backwards.
pub(crate) fn capture<N, P, F>(arena: &Arena<N>, root: Option<u32>, data_of: &F) -> Option<TreeSnapshot<P>>
where
    N: Node,
    F: Fn(&N) -> (P, Option<u32>),
{
    let root = root?;
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        order.push(idx);
        stack.extend(arena[idx].r());
        stack.extend(arena[idx].l());
    }

    let mut built: HashMap<u32, TreeSnapshot<P>> = HashMap::with_capacity(order.len());
    for &idx in order.iter().rev() {
        let node = &arena[idx];
        let (data, height) = data_of(node);
        let left = node.l().and_then(|l| built.remove(&l)).map(Box::new);
        let right = node.r().and_then(|r| built.remove(&r)).map(Box::new);
        built.insert(
            idx,
            TreeSnapshot {
                data,
                height,
                left,
                right,
            },
        );
    }
    built.remove(&root)
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Allocates the snapshot's nodes in `arena`, linking children and parents.
///
/// Returns the slot of the subtree root. Nodes are allocated in pre-order.
/// On error the partially built nodes stay in the arena; callers load into
/// a fresh arena and discard it.
pub(crate) fn restore<N, P, F>(
    arena: &mut Arena<N>,
    snapshot: &TreeSnapshot<P>,
    make: &mut F,
) -> Result<u32, SnapshotError>
where
    N: Node,
    F: FnMut(&P) -> Result<N, SnapshotError>,
{
    let root = arena.alloc(make(&snapshot.data)?);
    let mut stack: Vec<(&TreeSnapshot<P>, u32, Side)> = Vec::new();
    push_children(&mut stack, snapshot, root);
    while let Some((snap, parent, side)) = stack.pop() {
        let idx = arena.alloc(make(&snap.data)?);
        match side {
            Side::Left => link_left(arena, parent, Some(idx)),
            Side::Right => link_right(arena, parent, Some(idx)),
        }
        push_children(&mut stack, snap, idx);
    }
    Ok(root)
}

fn push_children<'a, P>(
    stack: &mut Vec<(&'a TreeSnapshot<P>, u32, Side)>,
    snap: &'a TreeSnapshot<P>,
    idx: u32,
) {
    if let Some(r) = &snap.right {
        stack.push((r, idx, Side::Right));
    }
    if let Some(l) = &snap.left {
        stack.push((l, idx, Side::Left));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TreeSnapshot<i32> {
        TreeSnapshot::with_children(
            2,
            Some(TreeSnapshot::leaf(1)),
            Some(TreeSnapshot::with_children(4, Some(TreeSnapshot::leaf(3)), None)),
        )
    }

    #[test]
    fn traversal_orders() {
        let snap = sample();
        assert_eq!(snap.node_count(), 4);
        assert_eq!(snap.pre_order(), vec![&2, &1, &4, &3]);
        assert_eq!(snap.in_order(), vec![&1, &2, &3, &4]);
    }

    #[test]
    fn height_is_omitted_unless_present() {
        let value = serde_json::to_value(TreeSnapshot::leaf(7)).unwrap();
        assert_eq!(value, json!({"data": 7, "left": null, "right": null}));

        let mut with_height = TreeSnapshot::leaf(7);
        with_height.height = Some(1);
        let value = serde_json::to_value(&with_height).unwrap();
        assert_eq!(value, json!({"data": 7, "height": 1, "left": null, "right": null}));
    }

    #[test]
    fn missing_children_deserialize_as_none() {
        let snap: TreeSnapshot<i32> = serde_json::from_value(json!({"data": 5})).unwrap();
        assert_eq!(snap, TreeSnapshot::leaf(5));
    }

    #[test]
    fn deep_chain_counts_and_drops() {
        let mut snap = TreeSnapshot::leaf(0);
        for v in 1..200_000 {
            snap = TreeSnapshot::with_children(v, None, Some(snap));
        }
        assert_eq!(snap.node_count(), 200_000);
        assert_eq!(snap.pre_order().len(), 200_000);
        drop(snap);
    }
}
