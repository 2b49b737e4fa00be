//! Construction tasks derived one-to-one from network segments.

use crate::cost_model::{CostModel, InfraType};
use crate::network::NetworkGraph;

/// A segment annotated with its estimate, and later its phase and timing.
#[derive(Clone, Debug)]
pub struct Task {
    /// Index of the segment in the graph (also the task's index).
    pub edge: usize,
    pub id: String,
    pub length_m: f64,
    pub infra: InfraType,
    pub cost: f64,
    pub duration_hours: f64,
    pub phase: Option<u8>,
    pub scheduled_start: Option<f64>,
    pub scheduled_end: Option<f64>,
    pub worker: Option<usize>,
}

impl Task {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some() && self.scheduled_end.is_some()
    }
}

/// Fresh, unscheduled tasks for every segment of the graph.
///
/// Each planning run builds its own copy, so runs never share mutable tasks.
pub fn build_tasks(graph: &NetworkGraph, model: &CostModel) -> Vec<Task> {
    graph
        .edges()
        .iter()
        .enumerate()
        .map(|(idx, edge)| {
            let estimate = model.estimate(edge.infra, edge.length_m);
            Task {
                edge: idx,
                id: edge.id.clone(),
                length_m: edge.length_m,
                infra: edge.infra,
                cost: estimate.cost,
                duration_hours: estimate.duration_hours,
                phase: None,
                scheduled_start: None,
                scheduled_end: None,
                worker: None,
            }
        })
        .collect()
}
