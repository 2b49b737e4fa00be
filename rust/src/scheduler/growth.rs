//! Connectivity-driven ordering of construction tasks.
//!
//! Segments are released in the order a network can physically grow: the
//! hospital path first, then repeatedly the best-ranked segment touching the
//! already-energized part of the network.

use crate::error::PlanningError;
use crate::network::NodeId;
use crate::network::NetworkGraph;
use crate::{log_decisions, log_trace};

use super::frontier::{Frontier, FrontierKey};
use super::task::Task;

/// A total growth order over all tasks.
#[derive(Clone, Debug, Default)]
pub struct GrowthOrder {
    /// Task indices in build order.
    pub order: Vec<usize>,
    /// The first `hospital_len` entries of `order` form the hospital path(s).
    pub hospital_len: usize,
    /// Nodes that become connected when the task at the same position finishes.
    pub newly_connected: Vec<Vec<NodeId>>,
}

impl GrowthOrder {
    pub fn hospital_tasks(&self) -> &[usize] {
        &self.order[..self.hospital_len]
    }
}

/// Priority-first spanning growth from the source.
pub struct ConnectivityScheduler<'g> {
    graph: &'g NetworkGraph,
    tasks: &'g [Task],
    priorities: &'g [u8],
    verbosity: u8,
}

/// Mutable growth state: per-node connected flags and per-task scheduled flags.
struct GrowthState<'g> {
    connected: Vec<bool>,
    scheduled: Vec<bool>,
    frontier: Frontier<'g>,
    result: GrowthOrder,
}

impl<'g> ConnectivityScheduler<'g> {
    /// `priorities` is the downstream priority class of each segment.
    pub fn new(
        graph: &'g NetworkGraph,
        tasks: &'g [Task],
        priorities: &'g [u8],
        verbosity: u8,
    ) -> Self {
        Self {
            graph,
            tasks,
            priorities,
            verbosity,
        }
    }

    /// Order every task so each one touches the network connected by its predecessors.
    ///
    /// `hospital_path` must already be in growth order from the source; it is
    /// emitted first, unchanged.
    ///
    /// # Errors
    /// * `Disconnected` if some segment never becomes eligible
    pub fn grow(&self, hospital_path: &[usize]) -> Result<GrowthOrder, PlanningError> {
        let mut state = GrowthState {
            connected: vec![false; self.graph.node_count()],
            scheduled: vec![false; self.tasks.len()],
            frontier: Frontier::new(self.tasks.len()),
            result: GrowthOrder {
                order: Vec::with_capacity(self.tasks.len()),
                hospital_len: 0,
                newly_connected: Vec::with_capacity(self.tasks.len()),
            },
        };
        self.connect_node(&mut state, self.graph.source());

        for &task_idx in hospital_path {
            if state.scheduled[task_idx] {
                continue;
            }
            if !self
                .graph
                .touches_connected(self.tasks[task_idx].edge, &state.connected)
            {
                return Err(self.disconnected(&state));
            }
            log_decisions!(
                self.verbosity,
                "  Hospital path: {} (cost={:.2})",
                self.tasks[task_idx].id,
                self.tasks[task_idx].cost
            );
            self.emit(&mut state, task_idx);
        }
        state.result.hospital_len = state.result.order.len();

        while let Some(key) = state.frontier.pop() {
            if state.scheduled[key.edge] {
                continue;
            }
            log_decisions!(
                self.verbosity,
                "  Grow: {} (priority={}, cost={:.2})",
                key.segment_id,
                key.priority,
                key.cost
            );
            self.emit(&mut state, key.edge);
        }

        if state.result.order.len() < self.tasks.len() {
            return Err(self.disconnected(&state));
        }
        Ok(state.result)
    }

    /// Append a task to the order and connect whatever it reaches.
    fn emit(&self, state: &mut GrowthState<'g>, task_idx: usize) {
        state.scheduled[task_idx] = true;
        state.result.order.push(task_idx);

        let edge = self.graph.edge(self.tasks[task_idx].edge);
        let mut reached = Vec::new();
        for node in [edge.a, edge.b] {
            if !state.connected[node as usize] {
                reached.push(node);
                self.connect_node(state, node);
            }
        }
        state.result.newly_connected.push(reached);
    }

    /// Flag a node as connected and enqueue its not-yet-scheduled segments.
    fn connect_node(&self, state: &mut GrowthState<'g>, node: NodeId) {
        state.connected[node as usize] = true;
        let tasks: &'g [Task] = self.tasks;
        for &edge_idx in self.graph.incident(node) {
            if state.scheduled[edge_idx] {
                continue;
            }
            let task = &tasks[edge_idx];
            let pushed = state.frontier.push(FrontierKey {
                priority: self.priorities[edge_idx],
                cost: task.cost,
                segment_id: task.id.as_str(),
                edge: edge_idx,
            });
            if pushed {
                log_trace!(
                    self.verbosity,
                    "    Frontier += {} via {}",
                    task.id,
                    self.graph.node_name(node)
                );
            }
        }
    }

    fn disconnected(&self, state: &GrowthState<'g>) -> PlanningError {
        PlanningError::Disconnected {
            source_node: self.graph.node_name(self.graph.source()).to_string(),
            unreachable: self
                .tasks
                .iter()
                .filter(|t| !state.scheduled[t.edge])
                .map(|t| t.id.clone())
                .collect(),
        }
    }
}
