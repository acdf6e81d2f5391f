//! Deterministic construction of the scheduling model.
//!
//! The builder walks the catalog once, materializes variables only where a
//! window record makes the combination eligible, and emits the constraint
//! families in a fixed order: observation rows, memory and power balances,
//! downlink linking, then the cross-satellite conflict rows. Rebuilding
//! from the same catalog and configuration yields an identical model.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::config::ModelConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{GroundStationId, SatelliteId, SlotLabel, TargetId};
use crate::slots::SlotUniverse;

use super::expr::{LinExpr, LinearConstraint, Objective};
use super::model::ScheduleModel;
use super::variables::{name_token, DownlinkKey, LevelKey, ObservationKey, VarId};

/// Builds a [`ScheduleModel`] from an immutable catalog and configuration.
pub struct ModelBuilder<'a> {
    catalog: &'a Catalog,
    config: &'a ModelConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ModelConfig) -> Self {
        Self { catalog, config }
    }

    pub fn build(&self) -> ScheduleResult<ScheduleModel> {
        self.config.validate()?;

        let slots = SlotUniverse::from_catalog(self.catalog);
        log::info!(
            "building model: {} satellites, {} stations, {} targets, {} obs slots, {} downlink slots, {} combined",
            self.catalog.num_satellites(),
            self.catalog.num_ground_stations(),
            self.catalog.num_targets(),
            slots.observation_slots().len(),
            slots.downlink_slots().len(),
            slots.combined_slots().len(),
        );

        let mut model = ScheduleModel::new(slots);

        self.add_observation_variables(&mut model);
        self.add_downlink_variables(&mut model)?;
        self.add_level_variables(&mut model);

        self.add_observation_constraints(&mut model);
        self.add_memory_constraints(&mut model)?;
        self.add_power_constraints(&mut model);
        self.add_downlink_constraints(&mut model)?;
        self.add_conflict_constraints(&mut model);

        self.set_objective(&mut model)?;
        model.audit()?;

        let stats = model.stats();
        log::info!(
            "model built: {} variables ({} binary), {} constraints",
            stats.num_variables,
            stats.num_binary,
            stats.num_constraints,
        );
        Ok(model)
    }

    /// One binary observation indicator per distinct (satellite, target,
    /// slot) triple with a visibility window. Duplicate rows collapse.
    fn add_observation_variables(&self, model: &mut ScheduleModel) {
        let mut keys: BTreeSet<ObservationKey> = BTreeSet::new();
        for window in self.catalog.visibility_windows() {
            let key = ObservationKey {
                satellite: window.satellite.clone(),
                target: window.target.clone(),
                slot: window.slot().clone(),
            };
            if keys.contains(&key) {
                log::debug!(
                    "duplicate visibility window collapsed: satellite {} target {} slot {}",
                    window.satellite,
                    window.target,
                    window.slot()
                );
                continue;
            }
            keys.insert(key);
        }

        for key in keys {
            let name = format!(
                "x_{}_{}_{}",
                name_token(key.satellite.as_str()),
                name_token(key.target.as_str()),
                name_token(key.slot.as_str()),
            );
            let id = model.variables.binary(name);
            model.observation_vars.insert(key, id);
        }
    }

    /// One binary downlink indicator and one continuous volume variable per
    /// distinct (satellite, station, slot) triple with a downlink window.
    /// The volume's upper bound is the effective per-pass cap.
    fn add_downlink_variables(&self, model: &mut ScheduleModel) -> ScheduleResult<()> {
        let mut caps: BTreeMap<DownlinkKey, f64> = BTreeMap::new();
        for window in self.catalog.downlink_windows() {
            let key = DownlinkKey {
                satellite: window.satellite.clone(),
                station: window.station.clone(),
                slot: window.slot().clone(),
            };
            if caps.contains_key(&key) {
                log::debug!(
                    "duplicate downlink window collapsed: satellite {} station {} slot {}",
                    window.satellite,
                    window.station,
                    window.slot()
                );
                continue;
            }
            let station = self.catalog.ground_station(&window.station).ok_or_else(|| {
                ScheduleError::model_construction(format!(
                    "downlink window references unknown ground station {}",
                    window.station
                ))
            })?;
            let cap = self
                .config
                .max_downlink_per_slot_gb
                .min(window.max_data_gb)
                .min(station.max_data_rate_gb)
                .max(0.0);
            caps.insert(key, cap);
        }

        for (key, cap) in caps {
            let suffix = format!(
                "{}_{}_{}",
                name_token(key.satellite.as_str()),
                name_token(key.station.as_str()),
                name_token(key.slot.as_str()),
            );
            let y = model.variables.binary(format!("y_{}", suffix));
            let d = model.variables.continuous(format!("d_{}", suffix), 0.0, cap);
            model.downlink_vars.insert(key.clone(), y);
            model.volume_vars.insert(key, d);
        }
        Ok(())
    }

    /// Memory and power level variables, dense over satellites × combined
    /// slots. Levels are non-negative; capacity is enforced by rows so an
    /// infeasibility certificate can name the binding slot.
    fn add_level_variables(&self, model: &mut ScheduleModel) {
        let combined: Vec<SlotLabel> = model.slots.combined_slots().to_vec();
        for satellite in self.catalog.satellites() {
            let sat_token = name_token(satellite.id.as_str());
            for slot in &combined {
                let slot_token = name_token(slot.as_str());
                let key = LevelKey::new(satellite.id.clone(), slot.clone());
                let m = model.variables.continuous(
                    format!("m_{}_{}", sat_token, slot_token),
                    0.0,
                    f64::INFINITY,
                );
                let p = model.variables.continuous(
                    format!("p_{}_{}", sat_token, slot_token),
                    0.0,
                    f64::INFINITY,
                );
                model.memory_vars.insert(key.clone(), m);
                model.power_vars.insert(key, p);
            }
        }
    }

    /// Per-triple eligibility rows, the per-satellite observation cap, and
    /// the single-observation-per-target rows. Cap rows are generated for
    /// every satellite and target, including those with no eligible
    /// windows, so the model structure stays uniform.
    fn add_observation_constraints(&self, model: &mut ScheduleModel) {
        let mut vtw_rows = Vec::with_capacity(model.observation_vars.len());
        let mut by_satellite: BTreeMap<SatelliteId, Vec<VarId>> = BTreeMap::new();
        let mut by_target: BTreeMap<TargetId, Vec<VarId>> = BTreeMap::new();

        for (key, id) in &model.observation_vars {
            vtw_rows.push(LinearConstraint::le(
                format!(
                    "vtw_{}_{}_{}",
                    name_token(key.satellite.as_str()),
                    name_token(key.target.as_str()),
                    name_token(key.slot.as_str()),
                ),
                LinExpr::term(*id, 1.0),
                1.0,
            ));
            by_satellite
                .entry(key.satellite.clone())
                .or_default()
                .push(*id);
            by_target.entry(key.target.clone()).or_default().push(*id);
        }
        model.constraints.extend(vtw_rows);

        for satellite in self.catalog.satellites() {
            let expr: LinExpr = by_satellite
                .get(&satellite.id)
                .into_iter()
                .flatten()
                .map(|id| (*id, 1.0))
                .collect();
            model.constraints.push(LinearConstraint::le(
                format!("max_obs_per_day_{}", name_token(satellite.id.as_str())),
                expr,
                f64::from(satellite.max_obs_per_day),
            ));
        }

        for target in self.catalog.targets() {
            let expr: LinExpr = by_target
                .get(&target.id)
                .into_iter()
                .flatten()
                .map(|id| (*id, 1.0))
                .collect();
            model.constraints.push(LinearConstraint::le(
                format!("single_obs_{}", name_token(target.id.as_str())),
                expr,
                1.0,
            ));
        }
    }

    /// Memory stock-flow recurrence over each satellite's combined-slot
    /// chain, plus a capacity row per level. The first slot is seeded by
    /// the configured initial memory; every later slot balances against
    /// its predecessor.
    fn add_memory_constraints(&self, model: &mut ScheduleModel) -> ScheduleResult<()> {
        let obs_at = group_by_slot(model.observation_vars.iter().map(|(k, v)| {
            (LevelKey::new(k.satellite.clone(), k.slot.clone()), *v)
        }));
        let vol_at = group_by_slot(model.volume_vars.iter().map(|(k, v)| {
            (LevelKey::new(k.satellite.clone(), k.slot.clone()), *v)
        }));

        let entries: Vec<(LevelKey, VarId)> = model
            .memory_vars
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        let dpo = self.config.data_per_obs_gb;
        let mut prev: Option<(SatelliteId, VarId)> = None;

        for (key, level) in entries {
            let satellite = self.catalog.satellite(&key.satellite).ok_or_else(|| {
                ScheduleError::model_construction(format!(
                    "memory level references unknown satellite {}",
                    key.satellite
                ))
            })?;
            let prev_level = match &prev {
                Some((sat, id)) if *sat == key.satellite => Some(*id),
                _ => None,
            };

            let mut expr = LinExpr::term(level, 1.0);
            if let Some(prev_id) = prev_level {
                expr.add_term(prev_id, -1.0);
            }
            for id in obs_at.get(&key).into_iter().flatten() {
                expr.add_term(*id, -dpo);
            }
            for id in vol_at.get(&key).into_iter().flatten() {
                expr.add_term(*id, 1.0);
            }

            let sat_token = name_token(key.satellite.as_str());
            let slot_token = name_token(key.slot.as_str());
            let (name, rhs) = match prev_level {
                None => (
                    format!("mem_initial_{}", sat_token),
                    self.config.initial_memory_gb,
                ),
                Some(_) => (format!("memory_balance_{}_{}", sat_token, slot_token), 0.0),
            };
            model.constraints.push(LinearConstraint::eq(name, expr, rhs));

            model.constraints.push(LinearConstraint::le(
                format!("memory_capacity_{}_{}", sat_token, slot_token),
                LinExpr::term(level, 1.0),
                satellite.memory_capacity_gb,
            ));

            prev = Some((key.satellite, level));
        }
        Ok(())
    }

    /// Power recurrence over each satellite's chain. A recharge slot adds
    /// at most `charge_per_slot_wh`: the balance row is an upper bound, so
    /// a full battery sheds surplus charge instead of overflowing the
    /// capacity row.
    fn add_power_constraints(&self, model: &mut ScheduleModel) {
        let obs_at = group_by_slot(model.observation_vars.iter().map(|(k, v)| {
            (LevelKey::new(k.satellite.clone(), k.slot.clone()), *v)
        }));
        let vol_at = group_by_slot(model.volume_vars.iter().map(|(k, v)| {
            (LevelKey::new(k.satellite.clone(), k.slot.clone()), *v)
        }));
        let recharge: BTreeSet<LevelKey> = self
            .catalog
            .recharge_windows()
            .iter()
            .map(|w| LevelKey::new(w.satellite.clone(), w.slot.clone()))
            .collect();

        let entries: Vec<(LevelKey, VarId)> = model
            .power_vars
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        let power = &self.config.power;
        let mut prev: Option<(SatelliteId, VarId)> = None;

        for (key, level) in entries {
            let prev_level = match &prev {
                Some((sat, id)) if *sat == key.satellite => Some(*id),
                _ => None,
            };

            let mut expr = LinExpr::term(level, 1.0);
            if let Some(prev_id) = prev_level {
                expr.add_term(prev_id, -1.0);
            }
            for id in obs_at.get(&key).into_iter().flatten() {
                expr.add_term(*id, power.per_observation_wh);
            }
            for id in vol_at.get(&key).into_iter().flatten() {
                expr.add_term(*id, power.per_gb_downlinked_wh);
            }

            let charge = if recharge.contains(&key) {
                power.charge_per_slot_wh
            } else {
                0.0
            };
            let sat_token = name_token(key.satellite.as_str());
            let slot_token = name_token(key.slot.as_str());
            let (name, rhs) = match prev_level {
                None => (
                    format!("power_initial_{}", sat_token),
                    power.capacity_wh + charge,
                ),
                Some(_) => (format!("power_balance_{}_{}", sat_token, slot_token), charge),
            };
            model.constraints.push(LinearConstraint::le(name, expr, rhs));

            model.constraints.push(LinearConstraint::le(
                format!("power_capacity_{}_{}", sat_token, slot_token),
                LinExpr::term(level, 1.0),
                power.capacity_wh,
            ));

            prev = Some((key.satellite, level));
        }
    }

    /// Per-pass indicator rows plus the volume-indicator linking rows.
    /// Volume is impossible without an active indicator: d ≤ cap · y.
    fn add_downlink_constraints(&self, model: &mut ScheduleModel) -> ScheduleResult<()> {
        let mut rows = Vec::with_capacity(model.volume_vars.len() * 2);
        for (key, d) in &model.volume_vars {
            let y = model.downlink_vars.get(key).copied().ok_or_else(|| {
                ScheduleError::model_construction(format!(
                    "volume variable for satellite {} station {} slot {} has no paired indicator",
                    key.satellite, key.station, key.slot
                ))
            })?;
            let suffix = format!(
                "{}_{}_{}",
                name_token(key.satellite.as_str()),
                name_token(key.station.as_str()),
                name_token(key.slot.as_str()),
            );
            rows.push(LinearConstraint::le(
                format!("downlink_window_{}", suffix),
                LinExpr::term(y, 1.0),
                1.0,
            ));
            let cap = model.variables.def(*d).upper;
            let mut link = LinExpr::term(*d, 1.0);
            link.add_term(y, -cap);
            rows.push(LinearConstraint::le(
                format!("link_downlink_amount_{}", suffix),
                link,
                0.0,
            ));
        }
        model.constraints.extend(rows);
        Ok(())
    }

    /// Station and satellite exclusivity over every (station, downlink
    /// slot) and (satellite, downlink slot) pair. Rows are emitted even for
    /// pairs with no eligible window, so the constraint set has the same
    /// shape regardless of window sparsity.
    fn add_conflict_constraints(&self, model: &mut ScheduleModel) {
        let downlink_slots: Vec<SlotLabel> = model.slots.downlink_slots().to_vec();

        let mut by_station: BTreeMap<GroundStationId, BTreeMap<SlotLabel, Vec<VarId>>> =
            BTreeMap::new();
        let mut by_satellite: BTreeMap<SatelliteId, BTreeMap<SlotLabel, Vec<VarId>>> =
            BTreeMap::new();
        for (key, y) in &model.downlink_vars {
            by_station
                .entry(key.station.clone())
                .or_default()
                .entry(key.slot.clone())
                .or_default()
                .push(*y);
            by_satellite
                .entry(key.satellite.clone())
                .or_default()
                .entry(key.slot.clone())
                .or_default()
                .push(*y);
        }

        for station in self.catalog.ground_stations() {
            let slots_for_station = by_station.get(&station.id);
            for slot in &downlink_slots {
                let expr: LinExpr = slots_for_station
                    .and_then(|slots| slots.get(slot))
                    .into_iter()
                    .flatten()
                    .map(|id| (*id, 1.0))
                    .collect();
                model.constraints.push(LinearConstraint::le(
                    format!(
                        "groundstation_conflict_{}_{}",
                        name_token(station.id.as_str()),
                        name_token(slot.as_str()),
                    ),
                    expr,
                    1.0,
                ));
            }
        }

        for satellite in self.catalog.satellites() {
            let slots_for_satellite = by_satellite.get(&satellite.id);
            for slot in &downlink_slots {
                let expr: LinExpr = slots_for_satellite
                    .and_then(|slots| slots.get(slot))
                    .into_iter()
                    .flatten()
                    .map(|id| (*id, 1.0))
                    .collect();
                model.constraints.push(LinearConstraint::le(
                    format!(
                        "satellite_downlink_exclusivity_{}_{}",
                        name_token(satellite.id.as_str()),
                        name_token(slot.as_str()),
                    ),
                    expr,
                    1.0,
                ));
            }
        }
    }

    /// Maximize covered weighted value, with the configured tie-break
    /// weight on total downlink volume.
    fn set_objective(&self, model: &mut ScheduleModel) -> ScheduleResult<()> {
        let mut expr = LinExpr::new();
        for (key, id) in &model.observation_vars {
            let target = self.catalog.target(&key.target).ok_or_else(|| {
                ScheduleError::model_construction(format!(
                    "observation variable references unknown target {}",
                    key.target
                ))
            })?;
            expr.add_term(*id, target.weighted_value());
        }
        for id in model.volume_vars.values() {
            expr.add_term(*id, self.config.downlink_weight);
        }
        model.objective = Objective::maximize(expr);
        Ok(())
    }
}

fn group_by_slot(
    entries: impl Iterator<Item = (LevelKey, VarId)>,
) -> BTreeMap<LevelKey, Vec<VarId>> {
    let mut grouped: BTreeMap<LevelKey, Vec<VarId>> = BTreeMap::new();
    for (key, id) in entries {
        grouped.entry(key).or_default().push(id);
    }
    grouped
}
