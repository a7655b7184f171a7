use std::collections::VecDeque;

/// Recently closed segments keyed by subject end position, ascending.
///
/// Entries with equal keys keep insertion order. Eviction drops entries from the front
/// once they fall more than `max_dist` behind the current position.
#[derive(Debug, Clone, Default)]
pub struct SlidingWindow {
    entries: VecDeque<(i32, usize)>,
    max_dist: i32,
}

impl SlidingWindow {
    pub fn new(max_dist: i32) -> Self {
        Self {
            entries: VecDeque::new(),
            max_dist,
        }
    }

    pub fn insert(&mut self, key: i32, idx: usize) {
        // keys usually arrive in order, making this a push to the back
        let pos = self.entries.partition_point(|&(k, _)| k <= key);
        self.entries.insert(pos, (key, idx));
    }

    /// Drops every entry whose key lies more than `max_dist` before `key`
    pub fn evict(&mut self, key: i32) {
        while self
            .entries
            .front()
            .is_some_and(|&(k, _)| key - k > self.max_dist)
        {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
