//! Post-solve feasibility checking.
//!
//! Oracle implementations are external code; before a solution is accepted
//! its values are checked against every bound, integrality requirement and
//! constraint row of the model, within a numeric tolerance.

use std::fmt;

use super::expr::ConstraintSense;
use super::model::ScheduleModel;
use super::oracle::VariableValues;
use super::variables::VarKind;

/// Slack allowed when comparing floating-point solver output against bounds
/// and right-hand sides.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// One way a candidate solution fails the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Constraint {
        name: String,
        lhs: f64,
        sense: ConstraintSense,
        rhs: f64,
    },
    Bound {
        variable: String,
        value: f64,
        lower: f64,
        upper: f64,
    },
    Integrality {
        variable: String,
        value: f64,
    },
}

impl Violation {
    /// The constraint or variable name the violation points at.
    pub fn subject(&self) -> &str {
        match self {
            Violation::Constraint { name, .. } => name,
            Violation::Bound { variable, .. } => variable,
            Violation::Integrality { variable, .. } => variable,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Constraint {
                name,
                lhs,
                sense,
                rhs,
            } => write!(
                f,
                "constraint {name} violated: {lhs} {} {rhs} does not hold",
                sense.as_str()
            ),
            Violation::Bound {
                variable,
                value,
                lower,
                upper,
            } => write!(f, "variable {variable} = {value} outside [{lower}, {upper}]"),
            Violation::Integrality { variable, value } => {
                write!(f, "binary variable {variable} = {value} is not integral")
            }
        }
    }
}

/// Checks a value assignment against the model. Returns every violation
/// found; an empty vector means the solution is feasible within `tolerance`.
/// Variables absent from `values` evaluate as zero, consistent with
/// extraction.
pub fn validate_solution(
    model: &ScheduleModel,
    values: &VariableValues,
    tolerance: f64,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (id, def) in model.variables.iter() {
        let value = values.value_or_zero(id);
        if value < def.lower - tolerance || value > def.upper + tolerance {
            violations.push(Violation::Bound {
                variable: def.name.clone(),
                value,
                lower: def.lower,
                upper: def.upper,
            });
        }
        if def.kind == VarKind::Binary && (value - value.round()).abs() > tolerance {
            violations.push(Violation::Integrality {
                variable: def.name.clone(),
                value,
            });
        }
    }

    for constraint in &model.constraints {
        let lhs = constraint.expr.eval(values);
        let violated = match constraint.sense {
            ConstraintSense::Eq => (lhs - constraint.rhs).abs() > tolerance,
            ConstraintSense::Le => lhs > constraint.rhs + tolerance,
            ConstraintSense::Ge => lhs < constraint.rhs - tolerance,
        };
        if violated {
            violations.push(Violation::Constraint {
                name: constraint.name.clone(),
                lhs,
                sense: constraint.sense,
                rhs: constraint.rhs,
            });
        }
    }

    violations
}
