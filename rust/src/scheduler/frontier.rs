//! Frontier ordering for connectivity-driven growth.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Rank of an eligible segment on the growth frontier.
///
/// Implements `Ord` so that the *greater* key is the better pick:
/// higher downstream priority class, then lower cost, then lower segment id.
#[derive(Debug, Clone)]
pub struct FrontierKey<'g> {
    pub priority: u8,
    pub cost: f64,
    pub segment_id: &'g str,
    pub edge: usize,
}

impl PartialEq for FrontierKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey<'_> {}

impl Ord for FrontierKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(other.cost.total_cmp(&self.cost))
            .then(other.segment_id.cmp(self.segment_id))
            .then(other.edge.cmp(&self.edge))
    }
}

impl PartialOrd for FrontierKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-heap of eligible segments with one entry per segment.
#[derive(Debug, Default)]
pub struct Frontier<'g> {
    heap: BinaryHeap<FrontierKey<'g>>,
    queued: Vec<bool>,
}

impl<'g> Frontier<'g> {
    pub fn new(edge_count: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(edge_count),
            queued: vec![false; edge_count],
        }
    }

    /// Queue a segment unless it is already on the frontier. Returns whether it was added.
    pub fn push(&mut self, key: FrontierKey<'g>) -> bool {
        if self.queued[key.edge] {
            return false;
        }
        self.queued[key.edge] = true;
        self.heap.push(key);
        true
    }

    pub fn pop(&mut self) -> Option<FrontierKey<'g>> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(priority: u8, cost: f64, id: &str, edge: usize) -> FrontierKey<'_> {
        FrontierKey {
            priority,
            cost,
            segment_id: id,
            edge,
        }
    }

    #[test]
    fn test_priority_dominates_cost() {
        assert!(key(2, 9_000.0, "b", 1) > key(1, 10.0, "a", 0));
    }

    #[test]
    fn test_cost_breaks_priority_ties() {
        assert!(key(1, 100.0, "z", 1) > key(1, 200.0, "a", 0));
    }

    #[test]
    fn test_id_breaks_full_ties() {
        assert!(key(1, 100.0, "s01", 1) > key(1, 100.0, "s02", 0));
    }

    #[test]
    fn test_frontier_pops_best_first_and_dedups() {
        let mut frontier = Frontier::new(4);
        assert!(frontier.push(key(1, 300.0, "c", 2)));
        assert!(frontier.push(key(3, 900.0, "d", 3)));
        assert!(frontier.push(key(1, 100.0, "a", 0)));
        assert!(!frontier.push(key(1, 100.0, "a", 0)));
        assert_eq!(frontier.len(), 3);

        let order: Vec<&str> = std::iter::from_fn(|| frontier.pop())
            .map(|k| k.segment_id)
            .collect();
        assert_eq!(order, vec!["d", "a", "c"]);
        assert!(frontier.is_empty());
    }
}
