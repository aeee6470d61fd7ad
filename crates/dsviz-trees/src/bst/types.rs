use crate::types::{impl_node_links, StableId, ValuePayload};

#[derive(Clone, Debug)]
pub struct BstNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub payload: ValuePayload<T>,
}

impl<T> BstNode<T> {
    pub fn new(value: T, id: StableId) -> Self {
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

impl_node_links!(BstNode<T>);
