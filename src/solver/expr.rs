//! Linear expressions, constraints and the objective.

use serde::{Deserialize, Serialize};

use super::oracle::VariableValues;
use super::variables::VarId;

/// A linear expression: a sum of coefficient × variable terms. Constants
/// live on the right-hand side of constraints, never in the expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-term expression.
    pub fn term(var: VarId, coeff: f64) -> Self {
        Self {
            terms: vec![(var, coeff)],
        }
    }

    pub fn add_term(&mut self, var: VarId, coeff: f64) -> &mut Self {
        self.terms.push((var, coeff));
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Evaluate against returned variable values; variables absent from the
    /// assignment count as zero.
    pub fn eval(&self, values: &VariableValues) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.value_or_zero(*var))
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinExpr {
    fn from_iter<T: IntoIterator<Item = (VarId, f64)>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    Eq,
    Le,
    Ge,
}

impl ConstraintSense {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintSense::Eq => "=",
            ConstraintSense::Le => "<=",
            ConstraintSense::Ge => ">=",
        }
    }
}

/// A named linear constraint `expr sense rhs`. Names are stable across
/// rebuilds and are what infeasibility certificates refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinExpr,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, expr: LinExpr, sense: ConstraintSense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense,
            rhs,
        }
    }

    pub fn eq(name: impl Into<String>, expr: LinExpr, rhs: f64) -> Self {
        Self::new(name, expr, ConstraintSense::Eq, rhs)
    }

    pub fn le(name: impl Into<String>, expr: LinExpr, rhs: f64) -> Self {
        Self::new(name, expr, ConstraintSense::Le, rhs)
    }

    pub fn ge(name: impl Into<String>, expr: LinExpr, rhs: f64) -> Self {
        Self::new(name, expr, ConstraintSense::Ge, rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSense {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub sense: ObjectiveSense,
    pub expr: LinExpr,
}

impl Objective {
    pub fn maximize(expr: LinExpr) -> Self {
        Self {
            sense: ObjectiveSense::Maximize,
            expr,
        }
    }
}
