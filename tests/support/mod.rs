//! Shared fixtures and a brute-force reference oracle for integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use eos_sched::catalog::Catalog;
use eos_sched::config::ModelConfig;
use eos_sched::error::ScheduleResult;
use eos_sched::models::{
    DownlinkWindow, GroundStation, GroundStationId, RechargeWindow, Satellite, SatelliteId,
    SlotInterval, SlotLabel, Target, TargetId, VisibilityWindow,
};
use eos_sched::solver::{
    replay_memory_levels, replay_power_levels, validate_solution, ConflictCertificate, LevelKey,
    Oracle, OracleOutcome, OracleSolution, ScheduleModel, SolveOptions, VarId, VarKind,
    VariableValues, DEFAULT_TOLERANCE,
};

pub fn satellite(id: &str, memory_gb: f64, max_obs: u32) -> Satellite {
    Satellite {
        id: SatelliteId::from(id),
        orbit: "LEO".to_string(),
        memory_capacity_gb: memory_gb,
        max_obs_per_day: max_obs,
    }
}

pub fn station(id: &str, rate_gb: f64) -> GroundStation {
    GroundStation {
        id: GroundStationId::from(id),
        location: "(0.0, 0.0)".to_string(),
        max_data_rate_gb: rate_gb,
    }
}

pub fn target(id: &str, urgency: f64, importance: f64) -> Target {
    Target {
        id: TargetId::from(id),
        latitude_deg: 0.0,
        longitude_deg: 0.0,
        urgency,
        importance,
    }
}

pub fn vtw(sat: &str, tgt: &str, slot: &str) -> VisibilityWindow {
    VisibilityWindow {
        satellite: SatelliteId::from(sat),
        target: TargetId::from(tgt),
        interval: SlotInterval::new(slot, slot),
        duration_min: 10.0,
    }
}

pub fn dlw(sat: &str, gs: &str, slot: &str, max_gb: f64) -> DownlinkWindow {
    DownlinkWindow {
        satellite: SatelliteId::from(sat),
        station: GroundStationId::from(gs),
        interval: SlotInterval::new(slot, slot),
        duration_min: 10.0,
        max_data_gb: max_gb,
    }
}

pub fn recharge(sat: &str, slot: &str) -> RechargeWindow {
    RechargeWindow {
        satellite: SatelliteId::from(sat),
        slot: SlotLabel::from(slot),
    }
}

pub fn test_config() -> ModelConfig {
    ModelConfig::default()
}

/// Reference oracle that enumerates every assignment of the binary
/// variables and keeps the best feasible candidate. Usable only on
/// fixture-sized models; the assertion on the binary count keeps an
/// accidentally large fixture from hanging the suite.
///
/// For each binary mask, volumes are filled greedily forward (as much as
/// fits the pass cap, the on-board memory and the power budget); if that
/// candidate is infeasible a zero-volume variant is tried before the mask
/// is dismissed. Level variables are filled by replaying the recurrences.
pub struct ExhaustiveOracle {
    catalog: Catalog,
    config: ModelConfig,
}

impl ExhaustiveOracle {
    pub fn for_fixture(catalog: &Catalog, config: &ModelConfig) -> Self {
        Self {
            catalog: catalog.clone(),
            config: config.clone(),
        }
    }

    fn fill_volumes(&self, model: &ScheduleModel, values: &mut VariableValues) {
        let power_cfg = &self.config.power;
        let recharge: BTreeSet<LevelKey> = self
            .catalog
            .recharge_windows()
            .iter()
            .map(|w| LevelKey::new(w.satellite.clone(), w.slot.clone()))
            .collect();

        let mut obs_gain: BTreeMap<LevelKey, f64> = BTreeMap::new();
        let mut obs_cost: BTreeMap<LevelKey, f64> = BTreeMap::new();
        for (key, id) in &model.observation_vars {
            if values.value_or_zero(*id) > 0.5 {
                let level_key = LevelKey::new(key.satellite.clone(), key.slot.clone());
                *obs_gain.entry(level_key.clone()).or_insert(0.0) += self.config.data_per_obs_gb;
                *obs_cost.entry(level_key).or_insert(0.0) += power_cfg.per_observation_wh;
            }
        }

        // active passes per satellite, in slot order
        let mut passes: BTreeMap<SatelliteId, Vec<(SlotLabel, VarId)>> = BTreeMap::new();
        for (key, d) in &model.volume_vars {
            let active = model
                .downlink_vars
                .get(key)
                .map(|y| values.value_or_zero(*y) > 0.5)
                .unwrap_or(false);
            if active {
                passes
                    .entry(key.satellite.clone())
                    .or_default()
                    .push((key.slot.clone(), *d));
            }
        }
        for slots in passes.values_mut() {
            slots.sort();
        }

        for satellite in self.catalog.satellites() {
            let mut memory = self.config.initial_memory_gb;
            let mut power = power_cfg.capacity_wh;
            let sat_passes = passes.get(&satellite.id);
            for slot in model.slots.combined_slots() {
                let level_key = LevelKey::new(satellite.id.clone(), slot.clone());
                memory += obs_gain.get(&level_key).copied().unwrap_or(0.0);
                let charge = if recharge.contains(&level_key) {
                    power_cfg.charge_per_slot_wh
                } else {
                    0.0
                };
                let mut budget =
                    power - obs_cost.get(&level_key).copied().unwrap_or(0.0) + charge;

                for (pass_slot, d) in sat_passes.into_iter().flatten() {
                    if pass_slot != slot {
                        continue;
                    }
                    let cap = model.variables.def(*d).upper;
                    let mut volume = cap.min(memory);
                    if power_cfg.per_gb_downlinked_wh > 0.0 {
                        volume = volume.min((budget / power_cfg.per_gb_downlinked_wh).max(0.0));
                    }
                    let volume = volume.max(0.0);
                    values.set(*d, volume);
                    memory -= volume;
                    budget -= volume * power_cfg.per_gb_downlinked_wh;
                }

                power = budget.min(power_cfg.capacity_wh).max(0.0);
            }
        }
    }

    fn fill_levels(&self, model: &ScheduleModel, values: &mut VariableValues) {
        for (key, level) in replay_memory_levels(model, &self.catalog, &self.config, values) {
            values.set(model.memory_vars[&key], level);
        }
        for (key, level) in replay_power_levels(model, &self.catalog, &self.config, values) {
            values.set(model.power_vars[&key], level);
        }
    }
}

impl Oracle for ExhaustiveOracle {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn solve(
        &mut self,
        model: &ScheduleModel,
        _options: &SolveOptions,
    ) -> ScheduleResult<OracleOutcome> {
        let binaries: Vec<VarId> = model
            .variables
            .iter()
            .filter(|(_, def)| def.kind == VarKind::Binary)
            .map(|(id, _)| id)
            .collect();
        assert!(
            binaries.len() <= 20,
            "fixture too large for exhaustive search: {} binaries",
            binaries.len()
        );

        let mut best: Option<(f64, VariableValues)> = None;
        let mut least_violating: Option<(usize, Vec<String>)> = None;

        for mask in 0u32..(1u32 << binaries.len()) {
            let mut values = VariableValues::new();
            for (bit, var) in binaries.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    values.set(*var, 1.0);
                }
            }
            self.fill_volumes(model, &mut values);
            self.fill_levels(model, &mut values);

            let mut violations = validate_solution(model, &values, DEFAULT_TOLERANCE);
            if !violations.is_empty() {
                // a pass may be feasible only without its volume
                let mut reduced = values.clone();
                for d in model.volume_vars.values() {
                    reduced.set(*d, 0.0);
                }
                self.fill_levels(model, &mut reduced);
                if validate_solution(model, &reduced, DEFAULT_TOLERANCE).is_empty() {
                    values = reduced;
                    violations.clear();
                }
            }

            if violations.is_empty() {
                let objective = model.objective.expr.eval(&values);
                let better = best
                    .as_ref()
                    .map_or(true, |(incumbent, _)| objective > *incumbent + 1e-9);
                if better {
                    best = Some((objective, values));
                }
            } else {
                let subjects: Vec<String> = violations
                    .iter()
                    .map(|v| v.subject().to_string())
                    .collect();
                // ties go to the later, denser candidate
                let fewer = least_violating
                    .as_ref()
                    .map_or(true, |(count, _)| subjects.len() <= *count);
                if fewer {
                    least_violating = Some((subjects.len(), subjects));
                }
            }
        }

        match best {
            Some((objective_value, values)) => Ok(OracleOutcome::Optimal(OracleSolution {
                values,
                objective_value,
                degraded: false,
            })),
            None => {
                let constraints = least_violating
                    .map(|(_, subjects)| subjects)
                    .unwrap_or_default();
                Ok(OracleOutcome::Infeasible(ConflictCertificate::new(
                    constraints,
                )))
            }
        }
    }
}
