//! Error taxonomy for network loading and construction planning.

use thiserror::Error;

/// Errors that can occur while loading a network or planning its construction.
///
/// Everything except `HospitalDeadlineExceeded` is fatal and is raised before
/// any task is placed on the timeline. The deadline variant is only produced on
/// request by [`crate::Schedule::check_deadline`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("Network is disconnected from source {source_node}: unreachable {unreachable:?}")]
    Disconnected {
        source_node: String,
        unreachable: Vec<String>,
    },
    #[error("Unknown infrastructure type: {0}")]
    InvalidType(String),
    #[error("Unknown building category: {0}")]
    InvalidCategory(String),
    #[error("Empty network: {0}")]
    EmptyNetwork(String),
    #[error("Hospital connected at {ready_hours:.2}h, after the {deadline_hours:.2}h generator deadline")]
    HospitalDeadlineExceeded {
        ready_hours: f64,
        deadline_hours: f64,
    },
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("Invalid segment {id}: {reason}")]
    InvalidSegment { id: String, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
