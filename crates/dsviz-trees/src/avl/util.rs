use std::collections::HashMap;

use log::debug;

use crate::arena::Arena;
use crate::util::{assert_links, link_left, link_right, InOrder};

use super::types::AvlNode;

/// Cached height of `node`; 0 for an empty subtree.
#[inline]
pub fn height<T>(arena: &Arena<AvlNode<T>>, node: Option<u32>) -> u32 {
    node.map_or(0, |i| arena[i].height)
}

/// `height(left) - height(right)`; 0 for an empty subtree.
#[inline]
pub fn balance_factor<T>(arena: &Arena<AvlNode<T>>, node: Option<u32>) -> i32 {
    node.map_or(0, |i| {
        let n = &arena[i];
        height(arena, n.l) as i32 - height(arena, n.r) as i32
    })
}

/// Recomputes the cached height from the children's cached heights.
///
/// Children must already be up to date. Also refreshes the display balance.
pub fn update_height<T>(arena: &mut Arena<AvlNode<T>>, n: u32) {
    let (l, r) = (arena[n].l, arena[n].r);
    let h = 1 + height(arena, l).max(height(arena, r));
    let balance = balance_factor(arena, Some(n));
    let node = &mut arena[n];
    node.height = h;
    node.payload.balance = balance;
}

/// Single right rotation around `y`; returns the new subtree root.
///
/// ```text
///       y            x
///      / \          / \
///     x   T3  =>  T1   y
///    / \              / \
///   T1  T2           T2  T3
/// ```
pub fn rotate_right<T>(arena: &mut Arena<AvlNode<T>>, y: u32) -> u32 {
    let x = arena[y].l.expect("rotate_right needs a left child");
    let t2 = arena[x].r;
    let parent = arena[y].p;

    link_left(arena, y, t2);
    link_right(arena, x, Some(y));
    arena[x].p = parent;

    update_height(arena, y);
    update_height(arena, x);
    x
}

/// Mirror of [`rotate_right`].
pub fn rotate_left<T>(arena: &mut Arena<AvlNode<T>>, x: u32) -> u32 {
    let y = arena[x].r.expect("rotate_left needs a right child");
    let t2 = arena[y].l;
    let parent = arena[x].p;

    link_right(arena, x, t2);
    link_left(arena, y, Some(x));
    arena[y].p = parent;

    update_height(arena, x);
    update_height(arena, y);
    y
}

/// Restores balance at `n` after a removal below it.
///
/// The child's own balance picks single versus double rotation, since after
/// a deletion the heavy child may be perfectly balanced.
pub(crate) fn rebalance_after_delete<T>(arena: &mut Arena<AvlNode<T>>, n: u32) -> u32 {
    update_height(arena, n);
    let balance = balance_factor(arena, Some(n));

    if balance > 1 {
        let l = arena[n].l;
        if balance_factor(arena, l) >= 0 {
            debug!("avl: left-left after delete at {}", arena[n].id());
        } else {
            debug!("avl: left-right after delete at {}", arena[n].id());
            let l = rotate_left(arena, l.expect("left-heavy node has a left child"));
            link_left(arena, n, Some(l));
        }
        return rotate_right(arena, n);
    }

    if balance < -1 {
        let r = arena[n].r;
        if balance_factor(arena, r) <= 0 {
            debug!("avl: right-right after delete at {}", arena[n].id());
        } else {
            debug!("avl: right-left after delete at {}", arena[n].id());
            let r = rotate_right(arena, r.expect("right-heavy node has a right child"));
            link_right(arena, n, Some(r));
        }
        return rotate_left(arena, n);
    }

    n
}

/// Slots under `root` in pre-order; reversed, every child precedes its parent.
fn pre_order<T>(arena: &Arena<AvlNode<T>>, root: Option<u32>) -> Vec<u32> {
    let mut order = Vec::new();
    let mut stack: Vec<u32> = root.into_iter().collect();
    while let Some(n) = stack.pop() {
        order.push(n);
        stack.extend(arena[n].r);
        stack.extend(arena[n].l);
    }
    order
}

/// Recomputes every cached height under `root`, children first.
pub(crate) fn recompute_heights<T>(arena: &mut Arena<AvlNode<T>>, root: Option<u32>) {
    for n in pre_order(arena, root).into_iter().rev() {
        update_height(arena, n);
    }
}

/// Heights measured from the links, ignoring the cached ones.
fn measured_heights<T>(arena: &Arena<AvlNode<T>>, root: Option<u32>) -> HashMap<u32, u32> {
    let mut heights = HashMap::new();
    for n in pre_order(arena, root).into_iter().rev() {
        let of = |c: Option<u32>| c.and_then(|c| heights.get(&c).copied()).unwrap_or(0);
        let h = 1 + of(arena[n].l).max(of(arena[n].r));
        heights.insert(n, h);
    }
    heights
}

/// Checks links, cached heights, balance and in-order ordering.
pub fn assert_avl_tree<T, C>(
    arena: &Arena<AvlNode<T>>,
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    C: Fn(&T, &T) -> i32,
{
    assert_links(arena, root)?;

    let measured = measured_heights(arena, root);
    let measured_of = |c: Option<u32>| c.and_then(|c| measured.get(&c).copied()).unwrap_or(0);
    for i in InOrder::new(arena, root) {
        let node = &arena[i];
        let lh = measured_of(node.l);
        let rh = measured_of(node.r);
        let expected = 1 + lh.max(rh);
        if node.height != expected {
            return Err(format!(
                "Height mismatch at {}: expected {expected}, got {}",
                node.id(),
                node.height
            ));
        }
        let bf = lh as i32 - rh as i32;
        if !(-1..=1).contains(&bf) {
            return Err(format!("AVL balance violated at {}: {bf}", node.id()));
        }
        if node.balance() != bf {
            return Err(format!(
                "Stale balance at {}: expected {bf}, got {}",
                node.id(),
                node.balance()
            ));
        }
    }

    let mut prev: Option<u32> = None;
    for i in InOrder::new(arena, root) {
        if let Some(p) = prev {
            if comparator(arena[p].value(), arena[i].value()) > 0 {
                return Err("Node order violated".to_string());
            }
        }
        prev = Some(i);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StableId;

    fn node(arena: &mut Arena<AvlNode<i32>>, v: i32) -> u32 {
        arena.alloc(AvlNode::new(v, StableId(v as u64)))
    }

    #[test]
    fn rotate_right_reattaches_inner_subtree() {
        //     30          20
        //    /           /  \
        //   20     =>   10   30
        //  /  \             /
        // 10  25           25
        let mut arena = Arena::new();
        let n30 = node(&mut arena, 30);
        let n20 = node(&mut arena, 20);
        let n10 = node(&mut arena, 10);
        let n25 = node(&mut arena, 25);
        link_left(&mut arena, n30, Some(n20));
        link_left(&mut arena, n20, Some(n10));
        link_right(&mut arena, n20, Some(n25));
        recompute_heights(&mut arena, Some(n30));
        assert_eq!(balance_factor(&arena, Some(n30)), 2);

        let root = rotate_right(&mut arena, n30);
        assert_eq!(root, n20);
        assert_eq!(arena[n20].p, None);
        assert_eq!(arena[n20].r, Some(n30));
        assert_eq!(arena[n30].l, Some(n25));
        assert_eq!(arena[n25].p, Some(n30));
        assert_eq!(height(&arena, Some(n20)), 3);
        assert_eq!(height(&arena, Some(n30)), 2);
        assert_eq!(arena[n20].balance(), -1);
    }

    #[test]
    fn rotate_left_is_the_mirror() {
        let mut arena = Arena::new();
        let n10 = node(&mut arena, 10);
        let n20 = node(&mut arena, 20);
        let n30 = node(&mut arena, 30);
        link_right(&mut arena, n10, Some(n20));
        link_right(&mut arena, n20, Some(n30));
        recompute_heights(&mut arena, Some(n10));

        let root = rotate_left(&mut arena, n10);
        assert_eq!(root, n20);
        assert_eq!(arena[n20].l, Some(n10));
        assert_eq!(arena[n20].r, Some(n30));
        assert_eq!(height(&arena, Some(n20)), 2);
        assert_eq!(balance_factor(&arena, Some(n20)), 0);
        assert_avl_tree(&arena, Some(root), &|a: &i32, b: &i32| a - b).unwrap();
    }

    #[test]
    fn empty_subtree_has_zero_height_and_balance() {
        let arena: Arena<AvlNode<i32>> = Arena::new();
        assert_eq!(height(&arena, None), 0);
        assert_eq!(balance_factor(&arena, None), 0);
    }
}
