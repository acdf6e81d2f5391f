//! The built optimization model: variables, constraints, objective, and the
//! keyed lookup maps extraction reads back through.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::expr::{LinExpr, LinearConstraint, Objective, ObjectiveSense};
use super::variables::{DownlinkKey, LevelKey, ObservationKey, VarId, VariablePool, VarKind};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{SatelliteId, SlotLabel};
use crate::slots::SlotUniverse;

/// Variable and constraint counts, used for logging and determinism checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub num_variables: usize,
    pub num_binary: usize,
    pub num_continuous: usize,
    pub num_constraints: usize,
}

/// A fully constructed scheduling model.
///
/// The keyed maps are sparse: an entry exists exactly when a window record
/// made that (satellite, target/station, slot) combination eligible. Level
/// variables are dense over satellites × combined slots.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    pub variables: VariablePool,
    pub constraints: Vec<LinearConstraint>,
    pub objective: Objective,
    pub observation_vars: BTreeMap<ObservationKey, VarId>,
    pub downlink_vars: BTreeMap<DownlinkKey, VarId>,
    pub volume_vars: BTreeMap<DownlinkKey, VarId>,
    pub memory_vars: BTreeMap<LevelKey, VarId>,
    pub power_vars: BTreeMap<LevelKey, VarId>,
    pub slots: SlotUniverse,
}

impl ScheduleModel {
    pub fn new(slots: SlotUniverse) -> Self {
        Self {
            variables: VariablePool::new(),
            constraints: Vec::new(),
            objective: Objective::maximize(LinExpr::new()),
            observation_vars: BTreeMap::new(),
            downlink_vars: BTreeMap::new(),
            volume_vars: BTreeMap::new(),
            memory_vars: BTreeMap::new(),
            power_vars: BTreeMap::new(),
            slots,
        }
    }

    pub fn stats(&self) -> ModelStats {
        let num_binary = self
            .variables
            .iter()
            .filter(|(_, def)| def.kind == VarKind::Binary)
            .count();
        ModelStats {
            num_variables: self.variables.len(),
            num_binary,
            num_continuous: self.variables.len() - num_binary,
            num_constraints: self.constraints.len(),
        }
    }

    /// Verify the structural invariants of a built model.
    ///
    /// Violations here mean the builder itself is defective; they are not
    /// recoverable by callers.
    pub fn audit(&self) -> ScheduleResult<()> {
        let in_range = |id: VarId| (id.0 as usize) < self.variables.len();

        for constraint in &self.constraints {
            for (var, _) in constraint.expr.terms() {
                if !in_range(*var) {
                    return Err(ScheduleError::model_construction(format!(
                        "constraint {} references unknown variable {}",
                        constraint.name, var
                    )));
                }
            }
        }
        for (var, _) in self.objective.expr.terms() {
            if !in_range(*var) {
                return Err(ScheduleError::model_construction(format!(
                    "objective references unknown variable {}",
                    var
                )));
            }
        }

        let mut names = BTreeSet::new();
        for (_, def) in self.variables.iter() {
            if !names.insert(def.name.as_str()) {
                return Err(ScheduleError::model_construction(format!(
                    "duplicate variable name {}",
                    def.name
                )));
            }
            if def.kind == VarKind::Binary && (def.lower != 0.0 || def.upper != 1.0) {
                return Err(ScheduleError::model_construction(format!(
                    "binary variable {} has bounds [{}, {}]",
                    def.name, def.lower, def.upper
                )));
            }
        }

        if self.volume_vars.len() != self.downlink_vars.len() {
            return Err(ScheduleError::model_construction(format!(
                "{} volume variables against {} downlink indicators",
                self.volume_vars.len(),
                self.downlink_vars.len()
            )));
        }
        for key in self.volume_vars.keys() {
            if !self.downlink_vars.contains_key(key) {
                return Err(ScheduleError::model_construction(format!(
                    "volume variable for satellite {} station {} slot {} has no paired indicator",
                    key.satellite, key.station, key.slot
                )));
            }
        }

        if self.memory_vars.len() != self.power_vars.len() {
            return Err(ScheduleError::model_construction(format!(
                "{} memory levels against {} power levels",
                self.memory_vars.len(),
                self.power_vars.len()
            )));
        }
        for key in self.memory_vars.keys() {
            if !self.power_vars.contains_key(key) {
                return Err(ScheduleError::model_construction(format!(
                    "memory level for satellite {} slot {} has no paired power level",
                    key.satellite, key.slot
                )));
            }
        }

        let combined = self.slots.combined_slots();
        let mut chains: BTreeMap<&SatelliteId, Vec<&SlotLabel>> = BTreeMap::new();
        for key in self.memory_vars.keys() {
            chains.entry(&key.satellite).or_default().push(&key.slot);
        }
        for (satellite, chain) in chains {
            let complete = chain.len() == combined.len()
                && chain.iter().zip(combined.iter()).all(|(a, b)| **a == *b);
            if !complete {
                return Err(ScheduleError::model_construction(format!(
                    "level chain for satellite {} does not cover the combined slot sequence",
                    satellite
                )));
            }
        }

        Ok(())
    }

    /// SHA-256 over the canonical rendering. Two models built from the same
    /// catalog and configuration fingerprint identically.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_text().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Canonical line-per-element rendering backing the fingerprint. Unlike
    /// the LP form it keeps empty constraint rows, so uniform conflict rows
    /// are part of the hash.
    fn canonical_text(&self) -> String {
        let mut out = String::new();
        for (_, def) in self.variables.iter() {
            let kind = match def.kind {
                VarKind::Binary => "bin",
                VarKind::Continuous => "cont",
            };
            let _ = writeln!(out, "var|{}|{}|{}|{}", def.name, kind, def.lower, def.upper);
        }
        for constraint in &self.constraints {
            let _ = write!(
                out,
                "con|{}|{}|{}",
                constraint.name,
                constraint.sense.as_str(),
                constraint.rhs
            );
            for (var, coeff) in constraint.expr.terms() {
                let _ = write!(out, "|{}:{}", self.variables.def(*var).name, coeff);
            }
            out.push('\n');
        }
        let sense = match self.objective.sense {
            ObjectiveSense::Maximize => "max",
            ObjectiveSense::Minimize => "min",
        };
        let _ = write!(out, "obj|{}", sense);
        for (var, coeff) in self.objective.expr.terms() {
            let _ = write!(out, "|{}:{}", self.variables.def(*var).name, coeff);
        }
        out.push('\n');
        out
    }

    /// Render the model as LP-format text for offline inspection or a
    /// file-based solver backend.
    pub fn render_lp(&self) -> String {
        let mut out = String::new();
        out.push_str("\\ eos-sched scheduling model\n");
        out.push_str(match self.objective.sense {
            ObjectiveSense::Maximize => "Maximize\n",
            ObjectiveSense::Minimize => "Minimize\n",
        });
        out.push_str(" obj:");
        Self::push_expr(&mut out, &self.objective.expr, &self.variables);
        out.push('\n');

        out.push_str("Subject To\n");
        for constraint in &self.constraints {
            let _ = write!(out, " {}:", constraint.name);
            Self::push_expr(&mut out, &constraint.expr, &self.variables);
            let _ = writeln!(out, " {} {}", constraint.sense.as_str(), constraint.rhs);
        }

        out.push_str("Bounds\n");
        for (_, def) in self.variables.iter() {
            if def.kind != VarKind::Continuous {
                continue;
            }
            if def.upper.is_finite() {
                let _ = writeln!(out, " {} <= {} <= {}", def.lower, def.name, def.upper);
            } else {
                let _ = writeln!(out, " {} >= {}", def.name, def.lower);
            }
        }

        out.push_str("Binaries\n");
        for (_, def) in self.variables.iter() {
            if def.kind == VarKind::Binary {
                let _ = writeln!(out, " {}", def.name);
            }
        }

        out.push_str("End\n");
        out
    }

    fn push_expr(out: &mut String, expr: &LinExpr, pool: &VariablePool) {
        if expr.is_empty() {
            out.push_str(" 0");
            return;
        }
        for (i, (var, coeff)) in expr.terms().iter().enumerate() {
            let name = &pool.def(*var).name;
            if i == 0 {
                let _ = write!(out, " {} {}", coeff, name);
            } else if *coeff < 0.0 {
                let _ = write!(out, " - {} {}", -coeff, name);
            } else {
                let _ = write!(out, " + {} {}", coeff, name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::expr::ConstraintSense;

    fn tiny_model() -> ScheduleModel {
        let mut model = ScheduleModel::new(SlotUniverse::unify(&[], &[]));
        let x = model.variables.binary("x_SAT1_TGT1_T1");
        let d = model.variables.continuous("d_SAT1_GS1_T1", 0.0, 8.0);
        model
            .constraints
            .push(LinearConstraint::le("vtw_SAT1_TGT1_T1", LinExpr::term(x, 1.0), 1.0));
        let mut link = LinExpr::new();
        link.add_term(d, 1.0).add_term(x, -8.0);
        model
            .constraints
            .push(LinearConstraint::le("link_SAT1_GS1_T1", link, 0.0));
        model.objective = Objective::maximize(LinExpr::term(x, 30.0));
        model
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let model = tiny_model();
        assert_eq!(model.fingerprint(), tiny_model().fingerprint());
        assert_eq!(model.fingerprint().len(), 64);

        let mut doctored = tiny_model();
        doctored.constraints.push(LinearConstraint::le(
            "extra_row",
            LinExpr::new(),
            1.0,
        ));
        assert_ne!(model.fingerprint(), doctored.fingerprint());
    }

    #[test]
    fn empty_rows_are_part_of_the_fingerprint() {
        let mut a = tiny_model();
        a.constraints
            .push(LinearConstraint::le("gc_GS1_T1", LinExpr::new(), 1.0));
        let mut b = tiny_model();
        b.constraints
            .push(LinearConstraint::le("gc_GS1_T2", LinExpr::new(), 1.0));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn audit_accepts_a_consistent_model() {
        assert!(tiny_model().audit().is_ok());
    }

    #[test]
    fn audit_rejects_out_of_range_variable_ids() {
        let mut model = tiny_model();
        model.constraints.push(LinearConstraint::le(
            "bad_row",
            LinExpr::term(VarId(99), 1.0),
            1.0,
        ));
        let err = model.audit().unwrap_err();
        assert!(err.to_string().contains("bad_row"));
    }

    #[test]
    fn audit_rejects_duplicate_variable_names() {
        let mut model = tiny_model();
        model.variables.binary("x_SAT1_TGT1_T1");
        assert!(model.audit().is_err());
    }

    #[test]
    fn audit_rejects_unpaired_volume_variables() {
        let mut model = tiny_model();
        let d = model.variables.continuous("d_orphan", 0.0, 5.0);
        model
            .volume_vars
            .insert(DownlinkKey::new("SAT1", "GS1", "T9"), d);
        let err = model.audit().unwrap_err();
        assert!(matches!(err, ScheduleError::ModelConstruction(_)));
    }

    #[test]
    fn lp_rendering_lists_all_sections() {
        let lp = tiny_model().render_lp();
        assert!(lp.contains("Maximize"));
        assert!(lp.contains("obj: 30 x_SAT1_TGT1_T1"));
        assert!(lp.contains("Subject To"));
        assert!(lp.contains("link_SAT1_GS1_T1: 1 d_SAT1_GS1_T1 - 8 x_SAT1_TGT1_T1 <= 0"));
        assert!(lp.contains("Bounds"));
        assert!(lp.contains("0 <= d_SAT1_GS1_T1 <= 8"));
        assert!(lp.contains("Binaries"));
        assert!(lp.ends_with("End\n"));
    }

    #[test]
    fn empty_constraint_rows_render_a_zero_lhs() {
        let mut model = tiny_model();
        model.constraints.push(LinearConstraint::new(
            "gc_GS1_T1",
            LinExpr::new(),
            ConstraintSense::Le,
            1.0,
        ));
        assert!(model.render_lp().contains("gc_GS1_T1: 0 <= 1"));
    }
}
