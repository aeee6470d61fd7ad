use std::ops::{Index, IndexMut};

/// Slot storage for tree nodes.
///
/// Released slots are recycled by later allocations, so an index is only
/// meaningful while the node it was allocated for is alive. Trees expose
/// [`StableId`](crate::types::StableId)s to callers for anything that has to
/// outlive a mutation.
#[derive(Clone, Debug)]
pub struct Arena<N> {
    slots: Vec<Option<N>>,
    free: Vec<u32>,
    live: usize,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn alloc(&mut self, node: N) -> u32 {
        self.live += 1;
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx as usize] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                (self.slots.len() - 1) as u32
            }
        }
    }

    /// Moves the node out of its slot and frees the slot for reuse.
    pub fn release(&mut self, idx: u32) -> Option<N> {
        let node = self.slots.get_mut(idx as usize)?.take()?;
        self.free.push(idx);
        self.live -= 1;
        Some(node)
    }

    pub fn get(&self, idx: u32) -> Option<&N> {
        self.slots.get(idx as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, idx: u32) -> Option<&mut N> {
        self.slots.get_mut(idx as usize)?.as_mut()
    }

    /// Mutable access to two distinct slots at once.
    pub fn pair_mut(&mut self, a: u32, b: u32) -> (&mut N, &mut N) {
        assert_ne!(a, b, "pair_mut needs two distinct slots");
        let (a, b) = (a as usize, b as usize);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_node = head[lo].as_mut().expect("live arena slot");
        let hi_node = tail[0].as_mut().expect("live arena slot");
        if a < b {
            (lo_node, hi_node)
        } else {
            (hi_node, lo_node)
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }

    /// Live nodes with their slot index, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &N)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (i as u32, n)))
    }
}

impl<N> Index<u32> for Arena<N> {
    type Output = N;

    fn index(&self, idx: u32) -> &N {
        self.slots[idx as usize].as_ref().expect("live arena slot")
    }
}

impl<N> IndexMut<u32> for Arena<N> {
    fn index_mut(&mut self, idx: u32) -> &mut N {
        self.slots[idx as usize].as_mut().expect("live arena slot")
    }
}
