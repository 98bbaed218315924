//! LRU Recency List Module
//!
//! Arena-backed doubly-linked list ordering items by recency of use.

// == Node ==
#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Orders items from most recently used (front) to least recently used (back).
///
/// Nodes live in a slot arena and are linked by slot index, so a caller that
/// remembers the slot returned by [`RecencyList::push_front`] can move or
/// remove the item in O(1). Freed slots are reused by later insertions.
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as most recently used and returns its slot.
    pub fn push_front(&mut self, item: T) -> usize {
        let node = Node {
            item,
            prev: None,
            next: self.head,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => {
                if let Some(node) = self.node_mut(old_head) {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the item in `slot` as most recently used.
    pub fn move_to_front(&mut self, slot: usize) {
        if self.head == Some(slot) || self.node(slot).is_none() {
            return;
        }
        self.unlink(slot);

        let old_head = self.head;
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => {
                if let Some(node) = self.node_mut(old_head) {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    // == Remove ==
    /// Unlinks the item in `slot` and returns it, freeing the slot.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        self.node(slot)?;
        self.unlink(slot);
        let node = self.slots.get_mut(slot)?.take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(node.item)
    }

    // == Clear ==
    /// Drops every item and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Accessors ==
    /// Slot of the most recently used item.
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Slot of the least recently used item.
    pub fn back(&self) -> Option<usize> {
        self.tail
    }

    /// Slot of the item just behind `slot` in recency order.
    pub fn next_of(&self, slot: usize) -> Option<usize> {
        self.node(slot).and_then(|node| node.next)
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.node(slot).map(|node| &node.item)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.node_mut(slot).map(|node| &mut node.item)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Internal Helpers ==
    fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Detaches `slot` from its neighbours, patching head and tail.
    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.node(slot).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev {
            Some(prev) => {
                if let Some(node) = self.node_mut(prev) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next) => {
                if let Some(node) = self.node_mut(next) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`RecencyList`].
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.item)
    }
}
