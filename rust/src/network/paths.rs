//! Shortest-path tree from the source, hospital paths, and downstream priorities.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::arena::NodeId;
use super::graph::NetworkGraph;

/// Tentative distance of a node on the Dijkstra heap.
///
/// Only (length, cost) are ranked here; ties on both are settled against the
/// segment ids when the node's parent is chosen, not in the heap.
#[derive(Clone, Copy, Debug)]
struct Tentative {
    length_m: f64,
    cost: f64,
    node: NodeId,
}

impl PartialEq for Tentative {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Tentative {}

impl Ord for Tentative {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length_m
            .total_cmp(&other.length_m)
            .then(self.cost.total_cmp(&other.cost))
            .then(self.node.cmp(&other.node))
    }
}

impl PartialOrd for Tentative {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Segments from the source out to `node`, following `parent_edge`.
fn walk_parents(graph: &NetworkGraph, parent_edge: &[Option<usize>], node: NodeId) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(edge_idx) = parent_edge[current as usize] {
        path.push(edge_idx);
        current = graph.edge(edge_idx).other_end(current);
    }
    path.reverse();
    path
}

/// Compare two routes of equal length and cost by their segment id sequences.
///
/// Each route is a settled node plus the segment leaving it.
fn compare_routes(
    graph: &NetworkGraph,
    parent_edge: &[Option<usize>],
    (from_a, via_a): (NodeId, usize),
    (from_b, via_b): (NodeId, usize),
) -> Ordering {
    let ids = |from: NodeId, via: usize| {
        walk_parents(graph, parent_edge, from)
            .into_iter()
            .chain(std::iter::once(via))
            .map(|idx| graph.edge(idx).id.as_str())
            .collect::<Vec<&str>>()
    };
    ids(from_a, via_a).cmp(&ids(from_b, via_b))
}

/// Shortest paths from the source under the (length, cost, segment ids) order.
///
/// Ties on length fall back to total cost, then to the lexicographically lowest
/// sequence of segment ids, so the tree is unique for a given input.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    /// Segment used to reach each node (None for the source and unreached nodes).
    pub parent_edge: Vec<Option<usize>>,
    pub length_m: Vec<f64>,
    pub cost: Vec<f64>,
    /// Nodes in settlement order (source first).
    pub settled: Vec<NodeId>,
}

impl ShortestPathTree {
    /// Run Dijkstra from the source. `edge_costs` is indexed by segment position.
    ///
    /// Per-node state is a parent pointer plus two scalars; id sequences are
    /// only rebuilt for exact (length, cost) ties.
    pub fn build(graph: &NetworkGraph, edge_costs: &[f64]) -> Self {
        let n = graph.node_count();
        let source = graph.source();
        let mut parent_edge: Vec<Option<usize>> = vec![None; n];
        let mut length_m = vec![f64::INFINITY; n];
        let mut cost = vec![f64::INFINITY; n];
        let mut done = vec![false; n];
        let mut settled = Vec::with_capacity(n);
        let mut heap = BinaryHeap::new();

        length_m[source as usize] = 0.0;
        cost[source as usize] = 0.0;
        heap.push(Reverse(Tentative {
            length_m: 0.0,
            cost: 0.0,
            node: source,
        }));

        while let Some(Reverse(entry)) = heap.pop() {
            let node = entry.node as usize;
            if done[node] {
                continue;
            }
            done[node] = true;
            settled.push(entry.node);

            for &edge_idx in graph.incident(entry.node) {
                let edge = graph.edge(edge_idx);
                let next = edge.other_end(entry.node) as usize;
                if done[next] {
                    continue;
                }
                let candidate_length = length_m[node] + edge.length_m;
                let candidate_cost = cost[node] + edge_costs[edge_idx];
                let ranking = candidate_length
                    .total_cmp(&length_m[next])
                    .then(candidate_cost.total_cmp(&cost[next]))
                    .then_with(|| match parent_edge[next] {
                        Some(current) => {
                            let current_from = graph.edge(current).other_end(next as NodeId);
                            compare_routes(
                                graph,
                                &parent_edge,
                                (entry.node, edge_idx),
                                (current_from, current),
                            )
                        }
                        None => Ordering::Less,
                    });
                if ranking == Ordering::Less {
                    parent_edge[next] = Some(edge_idx);
                    length_m[next] = candidate_length;
                    cost[next] = candidate_cost;
                    heap.push(Reverse(Tentative {
                        length_m: candidate_length,
                        cost: candidate_cost,
                        node: next as NodeId,
                    }));
                }
            }
        }

        Self {
            parent_edge,
            length_m,
            cost,
            settled,
        }
    }

    /// Segments from the source out to `node`, in growth order.
    pub fn path_to(&self, graph: &NetworkGraph, node: NodeId) -> Vec<usize> {
        walk_parents(graph, &self.parent_edge, node)
    }

    /// Union of the paths to every hospital, in growth order without repeats.
    ///
    /// Hospitals closest to the source go first (ties by building id).
    pub fn hospital_paths(&self, graph: &NetworkGraph) -> Vec<usize> {
        let mut hospitals = graph.hospitals();
        hospitals.sort_by(|a, b| {
            self.length_m[a.node as usize]
                .total_cmp(&self.length_m[b.node as usize])
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut included = vec![false; graph.edge_count()];
        let mut ordered = Vec::new();
        for hospital in hospitals {
            for edge_idx in self.path_to(graph, hospital.node) {
                if !included[edge_idx] {
                    included[edge_idx] = true;
                    ordered.push(edge_idx);
                }
            }
        }
        ordered
    }

    /// Highest building priority class reachable through each segment.
    ///
    /// A tree segment carries the maximum class in the subtree it feeds; a
    /// segment outside the tree carries the maximum class at its own endpoints.
    pub fn downstream_priority(&self, graph: &NetworkGraph) -> Vec<u8> {
        let mut subtree: Vec<u8> = (0..graph.node_count() as NodeId)
            .map(|node| graph.node_priority(node))
            .collect();

        // Children settle after their parents, so a reverse sweep sees every subtree complete.
        for &node in self.settled.iter().rev() {
            if let Some(edge_idx) = self.parent_edge[node as usize] {
                let parent = graph.edge(edge_idx).other_end(node) as usize;
                subtree[parent] = subtree[parent].max(subtree[node as usize]);
            }
        }

        let mut priorities = vec![0u8; graph.edge_count()];
        for (edge_idx, edge) in graph.edges().iter().enumerate() {
            priorities[edge_idx] = if self.parent_edge[edge.b as usize] == Some(edge_idx) {
                subtree[edge.b as usize]
            } else if self.parent_edge[edge.a as usize] == Some(edge_idx) {
                subtree[edge.a as usize]
            } else {
                graph.node_priority(edge.a).max(graph.node_priority(edge.b))
            };
        }
        priorities
    }
}
