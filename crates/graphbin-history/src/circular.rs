// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-capacity ring index.
//!
//! Maps logical positions (0 = oldest) to physical slots of a backing
//! buffer the caller owns. Once full, each push reuses the oldest slot.

use crate::error::{HistoryError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularIndex {
    capacity: usize,
    /// Physical slot of the oldest entry
    head: usize,
    len: usize,
}

impl CircularIndex {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            head: 0,
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Physical slot of logical position `logical`, if occupied.
    pub fn physical(&self, logical: usize) -> Option<usize> {
        (logical < self.len).then(|| (self.head + logical) % self.capacity)
    }

    /// Physical slot of the newest entry.
    pub fn newest(&self) -> Option<usize> {
        self.len.checked_sub(1).and_then(|last| self.physical(last))
    }

    /// Claim the slot for a new newest entry.
    ///
    /// Returns the slot and whether the oldest entry was evicted to make room.
    pub fn push(&mut self) -> (usize, bool) {
        if self.len < self.capacity {
            let slot = (self.head + self.len) % self.capacity;
            self.len += 1;
            (slot, false)
        } else {
            let slot = self.head;
            self.head = (self.head + 1) % self.capacity;
            (slot, true)
        }
    }

    /// Drop every entry at logical position `len` or later.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Physical slots from oldest to newest.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| (self.head + i) % self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(CircularIndex::new(0), Err(HistoryError::ZeroCapacity)));
    }

    #[test]
    fn test_fill_then_wrap() {
        let mut idx = CircularIndex::new(3).expect("index");
        assert_eq!(idx.push(), (0, false));
        assert_eq!(idx.push(), (1, false));
        assert_eq!(idx.push(), (2, false));
        assert!(idx.is_full());

        // Evicts logical 0 (slot 0).
        assert_eq!(idx.push(), (0, true));
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.physical(0), Some(1));
        assert_eq!(idx.physical(2), Some(0));
        assert_eq!(idx.physical(3), None);
        assert_eq!(idx.newest(), Some(0));
        assert_eq!(idx.slots().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_truncate_then_push_reuses_tail() {
        let mut idx = CircularIndex::new(4).expect("index");
        for _ in 0..6 {
            idx.push();
        }
        // head = 2, logical 0..4 -> slots 2, 3, 0, 1
        idx.truncate(2);
        assert_eq!(idx.slots().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(idx.push(), (0, false));
        idx.truncate(10);
        assert_eq!(idx.len(), 3);

        idx.clear();
        assert!(idx.is_empty());
        assert_eq!(idx.newest(), None);
        assert_eq!(idx.push(), (0, false));
    }

    #[test]
    fn test_random_ops_match_vecdeque() {
        use std::collections::VecDeque;

        let mut rng = fastrand::Rng::with_seed(11);
        let mut idx = CircularIndex::new(5).expect("index");
        let mut slots = [0u32; 5];
        let mut model: VecDeque<u32> = VecDeque::new();

        for tick in 0..2_000u32 {
            match rng.u8(..10) {
                0 => {
                    let keep = rng.usize(..=5);
                    idx.truncate(keep);
                    model.truncate(keep);
                }
                _ => {
                    let (slot, evicted) = idx.push();
                    slots[slot] = tick;
                    if model.len() == 5 {
                        model.pop_front();
                        assert!(evicted);
                    }
                    model.push_back(tick);
                }
            }
            let seen: Vec<u32> = idx.slots().map(|s| slots[s]).collect();
            assert_eq!(seen, model.iter().copied().collect::<Vec<_>>());
        }
    }
}
