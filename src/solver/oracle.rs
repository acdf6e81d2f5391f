//! The seam to the external optimization engine.
//!
//! The model builder does not solve anything. A solve is one blocking call
//! into an [`Oracle`] implementation, which wraps whatever MILP engine is
//! available and reports back one of three terminal outcomes.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::model::ScheduleModel;
use super::variables::VarId;
use crate::error::ScheduleResult;

/// Options forwarded to the oracle for a single solve call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveOptions {
    /// Wall-clock budget. `None` means solve to proven optimality. An
    /// oracle that hits the budget with a feasible incumbent reports
    /// [`OracleOutcome::Optimal`] with the degraded flag set.
    pub time_budget: Option<Duration>,
}

impl SolveOptions {
    pub fn with_time_budget(time_budget: Duration) -> Self {
        Self {
            time_budget: Some(time_budget),
        }
    }
}

/// Variable values returned by an oracle. Variables the engine never saw
/// read as zero; extraction relies on that instead of failing on sparse
/// assignments.
#[derive(Debug, Clone, Default)]
pub struct VariableValues {
    values: HashMap<VarId, f64>,
}

impl VariableValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, var: VarId, value: f64) {
        self.values.insert(var, value);
    }

    pub fn value_or_zero(&self, var: VarId) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(VarId, f64)> for VariableValues {
    fn from_iter<T: IntoIterator<Item = (VarId, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A minimal set of constraint names that cannot hold simultaneously,
/// reported when the model is infeasible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCertificate {
    constraints: Vec<String>,
}

impl ConflictCertificate {
    pub fn new(mut constraints: Vec<String>) -> Self {
        constraints.sort();
        constraints.dedup();
        Self { constraints }
    }

    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl std::fmt::Display for ConflictCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SHOWN: usize = 8;
        write!(f, "{} conflicting constraints", self.constraints.len())?;
        if self.constraints.is_empty() {
            return Ok(());
        }
        write!(f, " [")?;
        for (i, name) in self.constraints.iter().take(SHOWN).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        if self.constraints.len() > SHOWN {
            write!(f, ", ...")?;
        }
        write!(f, "]")
    }
}

/// Solution payload of a successful solve.
#[derive(Debug, Clone)]
pub struct OracleSolution {
    pub values: VariableValues,
    pub objective_value: f64,
    /// Set when the engine stopped at its time budget and returned the best
    /// incumbent instead of a proven optimum.
    pub degraded: bool,
}

/// Terminal status of one oracle invocation.
#[derive(Debug, Clone)]
pub enum OracleOutcome {
    /// A feasible assignment, optimal unless `degraded` is set.
    Optimal(OracleSolution),
    /// No feasible assignment exists; the certificate names an irreducible
    /// inconsistent subset of constraints.
    Infeasible(ConflictCertificate),
    /// Any other engine status, verbatim. Never treated as success.
    Other(String),
}

/// Capability surface an external MILP engine has to provide.
///
/// Implementations translate the model into engine form, run the search,
/// and map the engine's terminal status onto [`OracleOutcome`]. Engine
/// errors that prevent a solve from finishing at all (license failures,
/// lost connections) surface as `Err`, not as an outcome.
pub trait Oracle {
    /// Engine name for logs.
    fn name(&self) -> &str;

    fn solve(
        &mut self,
        model: &ScheduleModel,
        options: &SolveOptions,
    ) -> ScheduleResult<OracleOutcome>;
}
