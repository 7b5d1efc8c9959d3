//! Frontier primitives shared by outlet seeding and flow routing
//!
//! The frontier is a min-priority queue keyed on `(elevation, sequence)`.
//! `sequence` is handed out by a [`SequenceCounter`] when an entry is
//! created, so cells at equal elevation leave the queue in the order they
//! were discovered.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Monotonic insertion counter.
///
/// Owned by a single run: seeding starts it, routing continues it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    /// A counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number
    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.next;
        self.next += 1;
        seq
    }

    /// Number of sequence numbers handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// A queued cell.
///
/// Field order matters: the derived ordering compares elevation first and
/// sequence second. Sequence numbers are unique within a run, so `row` and
/// `col` never decide a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierEntry {
    pub elevation: i32,
    pub sequence: u64,
    pub row: usize,
    pub col: usize,
}

impl FrontierEntry {
    /// Create an entry, taking a fresh sequence number from `counter`
    pub fn new(row: usize, col: usize, elevation: i32, counter: &mut SequenceCounter) -> Self {
        Self {
            elevation,
            sequence: counter.next_sequence(),
            row,
            col,
        }
    }
}

/// Min-priority queue of [`FrontierEntry`] values
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.heap.push(Reverse(entry));
    }

    /// Remove the lowest entry; earliest sequence wins on equal elevation
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<FrontierEntry> for Frontier {
    fn extend<I: IntoIterator<Item = FrontierEntry>>(&mut self, iter: I) {
        self.heap.extend(iter.into_iter().map(Reverse));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_monotonic() {
        let mut counter = SequenceCounter::new();
        assert_eq!(counter.next_sequence(), 0);
        assert_eq!(counter.next_sequence(), 1);
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn test_pops_lowest_elevation_first() {
        let mut counter = SequenceCounter::new();
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new(0, 0, 30, &mut counter));
        frontier.push(FrontierEntry::new(0, 1, -5, &mut counter));
        frontier.push(FrontierEntry::new(0, 2, 12, &mut counter));

        let order: Vec<i32> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.elevation)
            .collect();
        assert_eq!(order, vec![-5, 12, 30]);
    }

    #[test]
    fn test_ties_break_on_insertion_order() {
        let mut counter = SequenceCounter::new();
        let mut frontier = Frontier::new();
        // Later entries sit at lower (row, col) to prove coordinates don't matter
        frontier.push(FrontierEntry::new(9, 9, 4, &mut counter));
        frontier.push(FrontierEntry::new(5, 5, 4, &mut counter));
        frontier.push(FrontierEntry::new(0, 0, 4, &mut counter));

        let cells: Vec<(usize, usize)> = std::iter::from_fn(|| frontier.pop())
            .map(|e| (e.row, e.col))
            .collect();
        assert_eq!(cells, vec![(9, 9), (5, 5), (0, 0)]);
        assert!(frontier.is_empty());
    }
}
