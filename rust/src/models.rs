//! Input and output records exchanged with the loader and report consumers.

use chrono::NaiveDateTime;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::error::PlanningError;

// Note: We use std HashMap here for PyO3 interface compatibility

/// A building that must end up connected to the source substation.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Building {
    #[pyo3(get, set)]
    pub id: String,
    /// Graph node the building hangs off
    #[pyo3(get, set)]
    pub node: String,
    /// "residential", "school" or "hospital" (survey labels accepted)
    #[pyo3(get, set)]
    pub category: String,
    /// Number of dwellings served by the building
    #[pyo3(get, set)]
    pub houses: u32,
}

#[pymethods]
impl Building {
    #[new]
    #[pyo3(signature = (id, node, category, houses=1))]
    pub fn new(id: String, node: String, category: String, houses: u32) -> Self {
        Self {
            id,
            node,
            category,
            houses,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Building(id={:?}, node={:?}, category={:?}, houses={})",
            self.id, self.node, self.category, self.houses
        )
    }
}

/// A candidate line segment between two graph nodes.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Segment {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub node_a: String,
    #[pyo3(get, set)]
    pub node_b: String,
    #[pyo3(get, set)]
    pub length_m: f64,
    /// "aerial", "semi-aerial" or "conduit" (survey labels accepted)
    #[pyo3(get, set)]
    pub infra_type: String,
}

#[pymethods]
impl Segment {
    #[new]
    pub fn new(
        id: String,
        node_a: String,
        node_b: String,
        length_m: f64,
        infra_type: String,
    ) -> Self {
        Self {
            id,
            node_a,
            node_b,
            length_m,
            infra_type,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Segment(id={:?}, {} -- {}, length_m={}, type={:?})",
            self.id, self.node_a, self.node_b, self.length_m, self.infra_type
        )
    }
}

/// A segment placed on the construction timeline.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduledTask {
    #[pyo3(get)]
    pub segment_id: String,
    #[pyo3(get)]
    pub node_a: String,
    #[pyo3(get)]
    pub node_b: String,
    #[pyo3(get)]
    pub infra_type: String,
    #[pyo3(get)]
    pub length_m: f64,
    #[pyo3(get)]
    pub phase: u8,
    /// Material cost (€)
    #[pyo3(get)]
    pub cost: f64,
    #[pyo3(get)]
    pub labor_cost: f64,
    #[pyo3(get)]
    pub duration_hours: f64,
    #[pyo3(get)]
    pub start_hours: f64,
    #[pyo3(get)]
    pub end_hours: f64,
    /// Worker slot the task ran on
    #[pyo3(get)]
    pub worker: usize,
    #[pyo3(get)]
    pub on_hospital_path: bool,
    /// Buildings that become powered when this segment is finished
    #[pyo3(get)]
    pub buildings_connected: Vec<String>,
    /// Material + labor spent up to and including this task
    #[pyo3(get)]
    pub cumulative_cost: f64,
    #[pyo3(get)]
    pub calendar_start: Option<NaiveDateTime>,
    #[pyo3(get)]
    pub calendar_end: Option<NaiveDateTime>,
}

#[pymethods]
impl ScheduledTask {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(segment_id={:?}, phase={}, start={:.2}h, end={:.2}h)",
            self.segment_id, self.phase, self.start_hours, self.end_hours
        )
    }
}

/// Aggregates for one construction phase.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct PhaseSummary {
    #[pyo3(get)]
    pub phase: u8,
    #[pyo3(get)]
    pub task_count: usize,
    #[pyo3(get)]
    pub length_m: f64,
    #[pyo3(get)]
    pub material_cost: f64,
    #[pyo3(get)]
    pub labor_cost: f64,
    #[pyo3(get)]
    pub work_hours: f64,
    /// Earliest start among the phase's tasks (None for an empty phase)
    #[pyo3(get)]
    pub start_hours: Option<f64>,
    #[pyo3(get)]
    pub end_hours: Option<f64>,
    #[pyo3(get)]
    pub buildings_connected: usize,
    #[pyo3(get)]
    pub houses_connected: u32,
    #[pyo3(get)]
    pub priority_score: f64,
    #[pyo3(get)]
    pub infra_type_counts: HashMap<String, usize>,
    /// Buildings connected in this phase, by category
    #[pyo3(get)]
    pub category_counts: HashMap<String, usize>,
    #[pyo3(get)]
    pub category_houses: HashMap<String, u32>,
    /// Material + labor spent by the end of this phase, earlier phases included
    #[pyo3(get)]
    pub cumulative_cost: f64,
}

impl PhaseSummary {
    /// Count one newly connected building.
    pub fn add_building(&mut self, category: &str, houses: u32, priority_score: f64) {
        self.buildings_connected += 1;
        self.houses_connected += houses;
        self.priority_score += priority_score;
        *self
            .category_counts
            .entry(category.to_string())
            .or_insert(0) += 1;
        *self
            .category_houses
            .entry(category.to_string())
            .or_insert(0) += houses;
    }
}

#[pymethods]
impl PhaseSummary {
    #[getter]
    fn total_cost(&self) -> f64 {
        self.material_cost + self.labor_cost
    }

    fn __repr__(&self) -> String {
        format!(
            "PhaseSummary(phase={}, tasks={}, length={:.1}m, cost={:.2})",
            self.phase,
            self.task_count,
            self.length_m,
            self.material_cost + self.labor_cost
        )
    }
}

/// Result of a planning run.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    /// Tasks in construction order (phase order, then growth order)
    #[pyo3(get)]
    pub tasks: Vec<ScheduledTask>,
    #[pyo3(get)]
    pub phases: Vec<PhaseSummary>,
    #[pyo3(get)]
    pub material_cost: f64,
    #[pyo3(get)]
    pub labor_cost: f64,
    #[pyo3(get)]
    pub total_cost: f64,
    #[pyo3(get)]
    pub total_work_hours: f64,
    #[pyo3(get)]
    pub makespan_hours: f64,
    /// Makespan with unlimited crews
    #[pyo3(get)]
    pub critical_path_hours: f64,
    /// When the last hospital-path segment finishes (None without a hospital)
    #[pyo3(get)]
    pub hospital_ready_hours: Option<f64>,
    #[pyo3(get)]
    pub hospital_deadline_hours: f64,
    #[pyo3(get)]
    pub feasible: bool,
    #[pyo3(get)]
    pub overrun_hours: f64,
    #[pyo3(get)]
    pub buildings_connected: usize,
    #[pyo3(get)]
    pub houses_connected: u32,
    #[pyo3(get)]
    pub category_counts: HashMap<String, usize>,
    #[pyo3(get)]
    pub category_houses: HashMap<String, u32>,
    #[pyo3(get)]
    pub budget: Option<f64>,
    /// Position in `tasks` of the first task whose cumulative cost exceeds the budget
    #[pyo3(get)]
    pub budget_exceeded_at: Option<usize>,
    #[pyo3(get)]
    pub algorithm_metadata: HashMap<String, String>,
}

impl Schedule {
    /// Treat an infeasible hospital connection as an error.
    pub fn check_deadline(&self) -> Result<(), PlanningError> {
        match self.hospital_ready_hours {
            Some(ready) if !self.feasible => Err(PlanningError::HospitalDeadlineExceeded {
                ready_hours: ready,
                deadline_hours: self.hospital_deadline_hours,
            }),
            _ => Ok(()),
        }
    }

    /// True when no budget is set or the whole plan fits in it.
    pub fn within_budget(&self) -> bool {
        self.budget_exceeded_at.is_none()
    }

    pub fn avg_cost_per_building(&self) -> f64 {
        self.total_cost / self.buildings_connected.max(1) as f64
    }

    pub fn avg_cost_per_house(&self) -> f64 {
        self.total_cost / self.houses_connected.max(1) as f64
    }

    /// Houses connected per 1000 € spent.
    pub fn houses_per_thousand_euros(&self) -> f64 {
        self.houses_connected as f64 / (self.total_cost / 1000.0).max(1e-9)
    }
}

#[pymethods]
impl Schedule {
    /// Tasks belonging to one phase, in construction order.
    pub fn tasks_in_phase(&self, phase: u8) -> Vec<ScheduledTask> {
        self.tasks
            .iter()
            .filter(|t| t.phase == phase)
            .cloned()
            .collect()
    }

    /// Raise ValueError if the hospital misses its generator deadline.
    fn require_feasible(&self) -> PyResult<()> {
        self.check_deadline()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    #[getter(within_budget)]
    fn py_within_budget(&self) -> bool {
        self.within_budget()
    }

    #[getter(avg_cost_per_building)]
    fn py_avg_cost_per_building(&self) -> f64 {
        self.avg_cost_per_building()
    }

    #[getter(avg_cost_per_house)]
    fn py_avg_cost_per_house(&self) -> f64 {
        self.avg_cost_per_house()
    }

    #[getter(houses_per_thousand_euros)]
    fn py_houses_per_thousand_euros(&self) -> f64 {
        self.houses_per_thousand_euros()
    }

    fn __repr__(&self) -> String {
        format!(
            "Schedule(tasks={}, makespan={:.2}h, total_cost={:.2}, feasible={})",
            self.tasks.len(),
            self.makespan_hours,
            self.total_cost,
            self.feasible
        )
    }
}
