use std::{cmp::Ordering, collections::BinaryHeap};

use crate::errors::RouteError;


/// Snapshot of an item and the priority it had when it was queued
/// Ordering is reversed so the std max-heap pops the smallest priority first
#[derive(Debug)]
struct Entry<T> {
    item: T,
    priority: f64,
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.total_cmp(&self.priority)
    }
}
impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<T> Eq for Entry<T> {}


/// Min-priority queue with lazy decrease-key
///
/// There is no update operation: a better priority for an item is pushed as a
/// new entry and the old one stays in the heap. Duplicates are never removed,
/// so callers must discard entries that are stale by the time they are
/// dequeued (see the settled checks in the search engines).
#[derive(Debug)]
pub struct MinQueue<T> {
    heap: BinaryHeap<Entry<T>>,
}

impl<T> Default for MinQueue<T> {
    fn default() -> Self {
        Self { heap: BinaryHeap::new() }
    }
}

impl<T> MinQueue<T> {

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item`, or re-insert it with a new priority. O(log n)
    pub fn enqueue(&mut self, item: T, priority: f64) {
        self.heap.push(Entry { item, priority });
    }

    /// Remove the entry with the smallest priority. O(log n)
    /// Ties come out in unspecified order
    pub fn dequeue(&mut self) -> Result<(T, f64), RouteError> {
        self.heap
            .pop()
            .map(|Entry { item, priority }| (item, priority))
            .ok_or(RouteError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

    #[test]
    fn test_dequeue_in_priority_order() {
        let mut queue = MinQueue::new();
        queue.enqueue("c", 3.0);
        queue.enqueue("a", 1.0);
        queue.enqueue("d", 4.5);
        queue.enqueue("b", 2.0);

        let mut order = Vec::new();
        while !queue.is_empty() {
            order.push(queue.dequeue().unwrap().0);
        }
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_random_priorities_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut priorities: Vec<f64> = (0..500).map(|i| i as f64 * 0.5 + rng.random::<f64>() * 0.1).collect();
        priorities.shuffle(&mut rng);

        let mut queue = MinQueue::new();
        for (i, p) in priorities.iter().enumerate() {
            queue.enqueue(i, *p);
        }
        assert_eq!(queue.len(), 500);

        let mut last = f64::NEG_INFINITY;
        for _ in 0..500 {
            let (item, p) = queue.dequeue().unwrap();
            assert_eq!(priorities[item], p);
            assert!(p >= last);
            last = p;
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        // the queue does not deduplicate, both snapshots come back out
        let mut queue = MinQueue::new();
        queue.enqueue(42u32, 10.0);
        queue.enqueue(42u32, 4.0);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue().unwrap(), (42, 4.0));
        assert_eq!(queue.dequeue().unwrap(), (42, 10.0));
    }

    #[test]
    fn test_infinite_priority_sorts_last() {
        let mut queue = MinQueue::new();
        queue.enqueue('x', f64::INFINITY);
        queue.enqueue('y', 1e300);
        queue.enqueue('z', 0.0);
        assert_eq!(queue.dequeue().unwrap().0, 'z');
        assert_eq!(queue.dequeue().unwrap().0, 'y');
        assert_eq!(queue.dequeue().unwrap().0, 'x');
    }

    #[test]
    fn test_empty_dequeue_fails() {
        let mut queue: MinQueue<u8> = MinQueue::new();
        assert!(matches!(queue.dequeue(), Err(RouteError::EmptyQueue)));
    }
}
