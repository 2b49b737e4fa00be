//! Construction planner for rural electrical distribution networks.
//!
//! Orders candidate line segments so the network grows outward from the
//! substation, energizes the hospital first, splits the rest into
//! length-balanced phases and simulates the work on a bounded crew pool.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod config;
mod cost_model;
mod error;
pub mod logging;
mod models;
pub mod network;
mod report;
pub mod scheduler;

pub use config::{PlannerConfig, RateTable};
pub use cost_model::{labor_cost, CostModel, InfraRate, InfraType, TaskEstimate};
pub use error::PlanningError;
pub use models::{Building, PhaseSummary, Schedule, ScheduledTask, Segment};
pub use network::{NodeArena, NodeId};
pub use report::{calendar_time, ScheduleReport};
pub use scheduler::NetworkPlanner;

fn to_py_err(e: PlanningError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

/// Plan the construction of a network.
///
/// # Arguments
/// * `buildings` - Buildings to connect (each attached to a graph node)
/// * `segments` - Candidate segments between graph nodes
/// * `source` - Node id of the substation
/// * `config` - Planner configuration (defaults when omitted)
///
/// # Returns
/// * Schedule with per-task timings, per-phase totals and the hospital verdict.
///   A late hospital is reported through `feasible`, not raised.
///
/// # Raises
/// * ValueError for unknown labels, invalid segments, a disconnected or empty
///   network, or an invalid configuration
#[pyfunction]
#[pyo3(signature = (buildings, segments, source, config=None))]
fn plan_network(
    buildings: Vec<Building>,
    segments: Vec<Segment>,
    source: &str,
    config: Option<PlannerConfig>,
) -> PyResult<Schedule> {
    let planner = NetworkPlanner::new(&buildings, &segments, source, config.unwrap_or_default())
        .map_err(to_py_err)?;
    planner.plan().map_err(to_py_err)
}

/// Material cost (€) and crew hours for one segment.
#[pyfunction]
#[pyo3(signature = (infra_type, length_m, rates=None))]
fn estimate_segment(
    infra_type: &str,
    length_m: f64,
    rates: Option<RateTable>,
) -> PyResult<(f64, f64)> {
    let rates = rates.unwrap_or_default();
    let estimate = CostModel::new(&rates)
        .estimate_by_name(infra_type, length_m)
        .map_err(to_py_err)?;
    Ok((estimate.cost, estimate.duration_hours))
}

/// The gridplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input records
    m.add_class::<Building>()?;
    m.add_class::<Segment>()?;

    // Output records
    m.add_class::<ScheduledTask>()?;
    m.add_class::<PhaseSummary>()?;
    m.add_class::<Schedule>()?;

    // Config types
    m.add_class::<RateTable>()?;
    m.add_class::<PlannerConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(plan_network, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_segment, m)?)?;

    Ok(())
}
