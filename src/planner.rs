//! End-to-end planning service.
//!
//! Wires the stages together: catalog to model, model to oracle, oracle
//! values through validation to a typed solution and its report. Oracle
//! output is never trusted blindly; a solution that violates the model is
//! rejected here rather than reported as a schedule.

use crate::catalog::Catalog;
use crate::config::ModelConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::report::ScheduleReport;
use crate::solver::{
    extract_solution, validate_solution, ModelBuilder, ModelStats, Oracle, OracleOutcome,
    ScheduleSolution, SolveOptions, DEFAULT_TOLERANCE,
};

/// Result of one planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub solution: ScheduleSolution,
    pub report: ScheduleReport,
    pub model_stats: ModelStats,
    /// Content hash of the built model, stable across runs on the same
    /// catalog and configuration.
    pub fingerprint: String,
}

/// Drives a full planning run for one catalog.
pub struct Planner {
    config: ModelConfig,
}

impl Planner {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn run(
        &self,
        catalog: &Catalog,
        oracle: &mut dyn Oracle,
        options: &SolveOptions,
    ) -> ScheduleResult<PlanOutcome> {
        // Step 1: Build the model
        let model = ModelBuilder::new(catalog, &self.config).build()?;
        let model_stats = model.stats();
        let fingerprint = model.fingerprint();
        log::info!("model fingerprint {}", fingerprint);

        // Step 2: Solve
        log::info!("solving with oracle {}", oracle.name());
        let raw = match oracle.solve(&model, options)? {
            OracleOutcome::Optimal(solution) => solution,
            OracleOutcome::Infeasible(certificate) => {
                log::warn!("model infeasible: {}", certificate);
                return Err(ScheduleError::Infeasible { certificate });
            }
            OracleOutcome::Other(status) => {
                return Err(ScheduleError::oracle_status(status));
            }
        };

        // Step 3: Check the oracle's work
        let violations = validate_solution(&model, &raw.values, DEFAULT_TOLERANCE);
        if !violations.is_empty() {
            for violation in &violations {
                log::error!("oracle solution rejected: {}", violation);
            }
            return Err(ScheduleError::oracle_status(format!(
                "solution failed validation with {} violations, first: {}",
                violations.len(),
                violations[0],
            )));
        }
        if raw.degraded {
            log::warn!("oracle stopped on its time budget, reporting the incumbent");
        }

        // Step 4: Extract and report
        let solution = extract_solution(&model, catalog, &self.config, &raw)?;
        let report = ScheduleReport::from_solution(catalog, &self.config, &solution);
        log::info!(
            "plan complete: {} observations, {:.2} GB downlinked, objective {:.3}",
            solution.observations.len(),
            solution.total_downlinked_gb(),
            solution.objective_value,
        );

        Ok(PlanOutcome {
            solution,
            report,
            model_stats,
            fingerprint,
        })
    }
}

/// Convenience wrapper for a run with default solve options.
pub fn plan(
    catalog: &Catalog,
    config: ModelConfig,
    oracle: &mut dyn Oracle,
) -> ScheduleResult<PlanOutcome> {
    Planner::new(config).run(catalog, oracle, &SolveOptions::default())
}
