//! Configuration types for the construction planner.

use chrono::NaiveDateTime;
use pyo3::prelude::*;

use crate::error::PlanningError;

/// Per-meter cost and crew time for each infrastructure type.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    /// Aerial line cost (€/m)
    #[pyo3(get, set)]
    pub aerial_cost_per_m: f64,
    /// Aerial line crew time (h/m)
    #[pyo3(get, set)]
    pub aerial_hours_per_m: f64,
    #[pyo3(get, set)]
    pub semi_aerial_cost_per_m: f64,
    #[pyo3(get, set)]
    pub semi_aerial_hours_per_m: f64,
    /// Underground conduit cost (€/m)
    #[pyo3(get, set)]
    pub conduit_cost_per_m: f64,
    #[pyo3(get, set)]
    pub conduit_hours_per_m: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            aerial_cost_per_m: 500.0,
            aerial_hours_per_m: 2.0,
            semi_aerial_cost_per_m: 750.0,
            semi_aerial_hours_per_m: 4.0,
            conduit_cost_per_m: 900.0,
            conduit_hours_per_m: 5.0,
        }
    }
}

#[pymethods]
impl RateTable {
    #[new]
    #[pyo3(signature = (
        aerial_cost_per_m=None,
        aerial_hours_per_m=None,
        semi_aerial_cost_per_m=None,
        semi_aerial_hours_per_m=None,
        conduit_cost_per_m=None,
        conduit_hours_per_m=None
    ))]
    pub fn new(
        aerial_cost_per_m: Option<f64>,
        aerial_hours_per_m: Option<f64>,
        semi_aerial_cost_per_m: Option<f64>,
        semi_aerial_hours_per_m: Option<f64>,
        conduit_cost_per_m: Option<f64>,
        conduit_hours_per_m: Option<f64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            aerial_cost_per_m: aerial_cost_per_m.unwrap_or(defaults.aerial_cost_per_m),
            aerial_hours_per_m: aerial_hours_per_m.unwrap_or(defaults.aerial_hours_per_m),
            semi_aerial_cost_per_m: semi_aerial_cost_per_m
                .unwrap_or(defaults.semi_aerial_cost_per_m),
            semi_aerial_hours_per_m: semi_aerial_hours_per_m
                .unwrap_or(defaults.semi_aerial_hours_per_m),
            conduit_cost_per_m: conduit_cost_per_m.unwrap_or(defaults.conduit_cost_per_m),
            conduit_hours_per_m: conduit_hours_per_m.unwrap_or(defaults.conduit_hours_per_m),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RateTable(aerial={}/{}, semi_aerial={}/{}, conduit={}/{})",
            self.aerial_cost_per_m,
            self.aerial_hours_per_m,
            self.semi_aerial_cost_per_m,
            self.semi_aerial_hours_per_m,
            self.conduit_cost_per_m,
            self.conduit_hours_per_m
        )
    }
}

/// Parameters for a single planning run.
///
/// Passed explicitly into every component so that independent runs never share state.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    #[pyo3(get, set)]
    pub rates: RateTable,
    /// Labor rate per worker-hour (€/h)
    #[pyo3(get, set)]
    pub hourly_rate: f64,
    /// Number of crews that can work on segments at the same time
    #[pyo3(get, set)]
    pub max_workers: usize,
    /// How long the hospital's backup generator can run (hours)
    #[pyo3(get, set)]
    pub generator_autonomy_hours: f64,
    /// Fraction of autonomy held back as margin: deadline = autonomy / (1 + margin)
    #[pyo3(get, set)]
    pub safety_margin: f64,
    /// Shares of the post-hospital length assigned to phases 1..=n
    #[pyo3(get, set)]
    pub phase_quotas: Vec<f64>,
    /// Calendar anchor for hour offsets, if any
    #[pyo3(get, set)]
    pub project_start: Option<NaiveDateTime>,
    /// Spending cap (€, material + labor). Only reported against, never enforced.
    #[pyo3(get, set)]
    pub budget: Option<f64>,
    /// Verbosity level: 0=silent, 1=progress, 2=decisions, 3=trace.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            rates: RateTable::default(),
            hourly_rate: 37.5,
            max_workers: 4,
            generator_autonomy_hours: 20.0,
            safety_margin: 0.0,
            phase_quotas: vec![0.40, 0.20, 0.20, 0.20],
            project_start: None,
            budget: None,
            verbosity: 0,
        }
    }
}

impl PlannerConfig {
    /// Latest acceptable energization time for hospital-path segments.
    pub fn hospital_deadline_hours(&self) -> f64 {
        self.generator_autonomy_hours / (1.0 + self.safety_margin)
    }

    /// Reject parameter combinations the planner cannot honor.
    pub fn validate(&self) -> Result<(), PlanningError> {
        let rates = [
            ("aerial_cost_per_m", self.rates.aerial_cost_per_m),
            ("aerial_hours_per_m", self.rates.aerial_hours_per_m),
            ("semi_aerial_cost_per_m", self.rates.semi_aerial_cost_per_m),
            ("semi_aerial_hours_per_m", self.rates.semi_aerial_hours_per_m),
            ("conduit_cost_per_m", self.rates.conduit_cost_per_m),
            ("conduit_hours_per_m", self.rates.conduit_hours_per_m),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlanningError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(PlanningError::InvalidConfig(format!(
                "hourly_rate must be non-negative, got {}",
                self.hourly_rate
            )));
        }
        if self.max_workers == 0 {
            return Err(PlanningError::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if !self.generator_autonomy_hours.is_finite() || self.generator_autonomy_hours <= 0.0 {
            return Err(PlanningError::InvalidConfig(format!(
                "generator_autonomy_hours must be positive, got {}",
                self.generator_autonomy_hours
            )));
        }
        if !self.safety_margin.is_finite() || self.safety_margin < 0.0 {
            return Err(PlanningError::InvalidConfig(format!(
                "safety_margin must be non-negative, got {}",
                self.safety_margin
            )));
        }
        if self.phase_quotas.is_empty() {
            return Err(PlanningError::InvalidConfig(
                "phase_quotas must name at least one phase".to_string(),
            ));
        }
        if self
            .phase_quotas
            .iter()
            .any(|q| !q.is_finite() || *q < 0.0)
        {
            return Err(PlanningError::InvalidConfig(format!(
                "phase_quotas must be non-negative, got {:?}",
                self.phase_quotas
            )));
        }
        let total: f64 = self.phase_quotas.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(PlanningError::InvalidConfig(format!(
                "phase_quotas must sum to 1.0, got {}",
                total
            )));
        }
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget <= 0.0 {
                return Err(PlanningError::InvalidConfig(format!(
                    "budget must be positive, got {}",
                    budget
                )));
            }
        }
        if self.phase_quotas.len() > u8::MAX as usize - 1 {
            return Err(PlanningError::InvalidConfig(
                "too many phase quotas".to_string(),
            ));
        }
        Ok(())
    }
}

#[pymethods]
impl PlannerConfig {
    #[new]
    #[pyo3(signature = (
        rates=None,
        hourly_rate=None,
        max_workers=None,
        generator_autonomy_hours=None,
        safety_margin=None,
        phase_quotas=None,
        project_start=None,
        budget=None,
        verbosity=0
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rates: Option<RateTable>,
        hourly_rate: Option<f64>,
        max_workers: Option<usize>,
        generator_autonomy_hours: Option<f64>,
        safety_margin: Option<f64>,
        phase_quotas: Option<Vec<f64>>,
        project_start: Option<NaiveDateTime>,
        budget: Option<f64>,
        verbosity: u8,
    ) -> Self {
        let defaults = Self::default();
        Self {
            rates: rates.unwrap_or(defaults.rates),
            hourly_rate: hourly_rate.unwrap_or(defaults.hourly_rate),
            max_workers: max_workers.unwrap_or(defaults.max_workers),
            generator_autonomy_hours: generator_autonomy_hours
                .unwrap_or(defaults.generator_autonomy_hours),
            safety_margin: safety_margin.unwrap_or(defaults.safety_margin),
            phase_quotas: phase_quotas.unwrap_or(defaults.phase_quotas),
            project_start,
            budget,
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PlannerConfig(max_workers={}, hourly_rate={}, autonomy={}h, quotas={:?})",
            self.max_workers, self.hourly_rate, self.generator_autonomy_hours, self.phase_quotas
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_workers, 4);
        assert!((config.hourly_rate - 37.5).abs() < 1e-9);
        assert!((config.hospital_deadline_hours() - 20.0).abs() < 1e-9);
        assert_eq!(config.phase_quotas, vec![0.40, 0.20, 0.20, 0.20]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_safety_margin_tightens_deadline() {
        let config = PlannerConfig {
            safety_margin: 0.2,
            ..PlannerConfig::default()
        };
        assert!((config.hospital_deadline_hours() - 20.0 / 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_rate_table_partial_override() {
        let rates = RateTable::new(Some(450.0), None, None, None, None, Some(6.0));
        assert!((rates.aerial_cost_per_m - 450.0).abs() < 1e-9);
        assert!((rates.aerial_hours_per_m - 2.0).abs() < 1e-9);
        assert!((rates.conduit_hours_per_m - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_workers = PlannerConfig {
            max_workers: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            zero_workers.validate(),
            Err(PlanningError::InvalidConfig(_))
        ));

        let bad_quotas = PlannerConfig {
            phase_quotas: vec![0.5, 0.2],
            ..PlannerConfig::default()
        };
        assert!(bad_quotas.validate().is_err());

        let negative_rate = PlannerConfig {
            rates: RateTable {
                semi_aerial_cost_per_m: -1.0,
                ..RateTable::default()
            },
            ..PlannerConfig::default()
        };
        assert!(negative_rate.validate().is_err());

        let zero_budget = PlannerConfig {
            budget: Some(0.0),
            ..PlannerConfig::default()
        };
        assert!(matches!(
            zero_budget.validate(),
            Err(PlanningError::InvalidConfig(_))
        ));
        let budget = PlannerConfig {
            budget: Some(250_000.0),
            ..PlannerConfig::default()
        };
        assert!(budget.validate().is_ok());
    }
}
