//! Link-level helpers shared by all trees (p / l / r).

use crate::arena::Arena;
use crate::types::Node;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut Arena<N>, idx: u32, v: Option<u32>) {
    arena[idx].set_p(v);
}

/// Puts `child` into the left slot of `parent` and points it back.
pub fn link_left<N: Node>(arena: &mut Arena<N>, parent: u32, child: Option<u32>) {
    arena[parent].set_l(child);
    if let Some(c) = child {
        set_p(arena, c, Some(parent));
    }
}

/// Puts `child` into the right slot of `parent` and points it back.
pub fn link_right<N: Node>(arena: &mut Arena<N>, parent: u32, child: Option<u32>) {
    arena[parent].set_r(child);
    if let Some(c) = child {
        set_p(arena, c, Some(parent));
    }
}

/// Detaches `root` from its parent link; used when a subtree becomes the tree root.
pub fn make_root<N: Node>(arena: &mut Arena<N>, root: Option<u32>) -> Option<u32> {
    if let Some(r) = root {
        set_p(arena, r, None);
    }
    root
}

/// Leftmost node.
pub fn first<N: Node>(arena: &Arena<N>, root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node.
pub fn last<N: Node>(arena: &Arena<N>, root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &Arena<N>, node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &Arena<N>, node: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, node) {
        return last(arena, Some(l));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &Arena<N>, root: Option<u32>) -> usize {
    let mut stack: Vec<u32> = root.into_iter().collect();
    let mut count = 0;
    while let Some(idx) = stack.pop() {
        count += 1;
        stack.extend(get_l(arena, idx));
        stack.extend(get_r(arena, idx));
    }
    count
}

/// Height of the subtree, walking it; an empty subtree has height 0.
pub fn height<N: Node>(arena: &Arena<N>, root: Option<u32>) -> u32 {
    let mut stack: Vec<(u32, u32)> = root.map(|r| (r, 1)).into_iter().collect();
    let mut max = 0;
    while let Some((idx, depth)) = stack.pop() {
        max = max.max(depth);
        stack.extend(get_l(arena, idx).map(|l| (l, depth + 1)));
        stack.extend(get_r(arena, idx).map(|r| (r, depth + 1)));
    }
    max
}

/// Releases every node under `root` and returns how many were freed.
pub fn release_subtree<N: Node>(arena: &mut Arena<N>, root: Option<u32>) -> usize {
    let mut stack: Vec<u32> = root.into_iter().collect();
    let mut freed = 0;
    while let Some(idx) = stack.pop() {
        if let Some(node) = arena.release(idx) {
            stack.extend(node.l());
            stack.extend(node.r());
            freed += 1;
        }
    }
    freed
}

/// In-order walk over slot indices, driven by [`first`] and [`next`].
pub struct InOrder<'a, N> {
    arena: &'a Arena<N>,
    curr: Option<u32>,
}

impl<'a, N: Node> InOrder<'a, N> {
    pub fn new(arena: &'a Arena<N>, root: Option<u32>) -> Self {
        Self {
            arena,
            curr: first(arena, root),
        }
    }
}

impl<'a, N: Node> Iterator for InOrder<'a, N> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let idx = self.curr?;
        self.curr = next(self.arena, idx);
        Some(idx)
    }
}

/// Descends from `root` comparing `key` against each node.
///
/// Returns the first node that compares equal; later duplicates further down
/// the right spine are not visited.
pub fn find<N, K, F, C>(
    arena: &Arena<N>,
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, key_of(&arena[i]));
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 {
            get_l(arena, i)
        } else {
            get_r(arena, i)
        };
    }
    None
}

/// Comparator over `PartialOrd`: negative means `a < b`, zero equal,
/// positive `a > b`. Incomparable values (NaN) count as greater.
pub fn default_comparator<T: PartialOrd>(a: &T, b: &T) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Checks that every child points back at its parent and the root has none.
pub fn assert_links<N: Node>(arena: &Arena<N>, root: Option<u32>) -> Result<(), String> {
    let Some(root) = root else {
        return Ok(());
    };
    if get_p(arena, root).is_some() {
        return Err("Root has parent".to_string());
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(l) = get_l(arena, node) {
            if get_p(arena, l) != Some(node) {
                return Err("Broken parent link on left child".to_string());
            }
            stack.push(l);
        }
        if let Some(r) = get_r(arena, node) {
            if get_p(arena, r) != Some(node) {
                return Err("Broken parent link on right child".to_string());
            }
            stack.push(r);
        }
    }
    Ok(())
}
