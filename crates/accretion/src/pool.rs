//! Bounded FIFO queue for particle populations with an unbounded producer.
//!
//! Outflow and debris particles are appended by event systems and retired by
//! their owners. When a push would exceed the capacity the oldest entry is
//! evicted; the eviction count is exposed for statistics.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct CappedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
    evicted: u64,
}

impl<T> CappedQueue<T> {
    /// Creates an empty queue; storage for `capacity` items is reserved up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Appends an item, evicting the oldest one when full.
    ///
    /// Returns true if an eviction happened.
    pub fn push(&mut self, item: T) -> bool {
        if self.capacity == 0 {
            self.evicted += 1;
            return true;
        }
        let evict = self.items.len() >= self.capacity;
        if evict {
            self.items.pop_front();
            self.evicted += 1;
        }
        self.items.push_back(item);
        evict
    }

    pub fn retain_mut<F: FnMut(&mut T) -> bool>(&mut self, keep: F) {
        self.items.retain_mut(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total evictions since construction (not reset by [`clear`](Self::clear))
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
