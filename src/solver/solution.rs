//! Typed read-back of an oracle solution.
//!
//! Raw variable values become assignment records and per-satellite resource
//! time series. Variables absent from the oracle payload read as zero, so a
//! partial solution extracts cleanly instead of failing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::ModelConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{GroundStationId, SatelliteId, SlotLabel, TargetId};

use super::model::ScheduleModel;
use super::oracle::{OracleSolution, VariableValues};
use super::variables::LevelKey;

/// Binary indicators are rounded at this threshold: strictly above counts
/// as scheduled.
pub fn is_active(value: f64) -> bool {
    value > 0.5
}

/// A scheduled observation of one target by one satellite in one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationAssignment {
    pub satellite: SatelliteId,
    pub target: TargetId,
    pub slot: SlotLabel,
    pub urgency: f64,
    pub importance: f64,
    pub weighted_value: f64,
    pub power_level_wh: f64,
}

/// A scheduled downlink pass with the volume actually transferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownlinkAssignment {
    pub satellite: SatelliteId,
    pub station: GroundStationId,
    pub slot: SlotLabel,
    pub volume_gb: f64,
    /// Memory level entering the slot, before the balance applies.
    pub memory_before_gb: f64,
    /// Memory level at the slot, after observation gain and downlink drain.
    pub memory_after_gb: f64,
    pub power_level_wh: f64,
}

/// One point of a satellite's resource trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub slot: SlotLabel,
    pub memory_gb: f64,
    pub power_wh: f64,
}

/// The full extracted schedule for one solved model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSolution {
    pub objective_value: f64,
    /// True when the oracle stopped on its time budget with an incumbent.
    pub degraded: bool,
    pub observations: Vec<ObservationAssignment>,
    pub downlinks: Vec<DownlinkAssignment>,
    /// Per-satellite memory/power trajectory over the combined slots.
    pub resources: BTreeMap<SatelliteId, Vec<ResourceSample>>,
}

impl ScheduleSolution {
    pub fn total_downlinked_gb(&self) -> f64 {
        self.downlinks.iter().map(|d| d.volume_gb).sum()
    }

    pub fn total_weighted_value(&self) -> f64 {
        self.observations.iter().map(|o| o.weighted_value).sum()
    }
}

/// Assembles a [`ScheduleSolution`] from raw oracle values.
///
/// Binary indicators are rounded with [`is_active`]; memory levels are read
/// from the level variables, while power levels come from a physical replay
/// of the trajectory (consumption subtracted, charge added, level clamped at
/// battery capacity). The replay keeps the reported levels meaningful even
/// though the power balance rows only bound the variables from above.
pub fn extract_solution(
    model: &ScheduleModel,
    catalog: &Catalog,
    config: &ModelConfig,
    solution: &OracleSolution,
) -> ScheduleResult<ScheduleSolution> {
    let values = &solution.values;
    let memory_levels: BTreeMap<LevelKey, f64> = model
        .memory_vars
        .iter()
        .map(|(key, id)| (key.clone(), values.value_or_zero(*id)))
        .collect();
    let power_levels = replay_power_levels(model, catalog, config, values);

    let mut observations = Vec::new();
    for (key, id) in &model.observation_vars {
        if !is_active(values.value_or_zero(*id)) {
            continue;
        }
        let target = catalog.target(&key.target).ok_or_else(|| {
            ScheduleError::model_construction(format!(
                "solution references unknown target {}",
                key.target
            ))
        })?;
        let level_key = LevelKey::new(key.satellite.clone(), key.slot.clone());
        observations.push(ObservationAssignment {
            satellite: key.satellite.clone(),
            target: key.target.clone(),
            slot: key.slot.clone(),
            urgency: target.urgency,
            importance: target.importance,
            weighted_value: target.weighted_value(),
            power_level_wh: power_levels.get(&level_key).copied().unwrap_or(0.0),
        });
    }

    let predecessor: BTreeMap<&SlotLabel, Option<&SlotLabel>> = model
        .slots
        .combined_with_predecessor()
        .map(|(prev, slot)| (slot, prev))
        .collect();

    let mut downlinks = Vec::new();
    for (key, y) in &model.downlink_vars {
        if !is_active(values.value_or_zero(*y)) {
            continue;
        }
        let volume_gb = model
            .volume_vars
            .get(key)
            .map(|d| values.value_or_zero(*d))
            .unwrap_or(0.0);
        let level_key = LevelKey::new(key.satellite.clone(), key.slot.clone());
        let memory_after_gb = memory_levels.get(&level_key).copied().unwrap_or(0.0);
        let memory_before_gb = match predecessor.get(&key.slot).copied().flatten() {
            Some(prev) => memory_levels
                .get(&LevelKey::new(key.satellite.clone(), prev.clone()))
                .copied()
                .unwrap_or(config.initial_memory_gb),
            None => config.initial_memory_gb,
        };
        downlinks.push(DownlinkAssignment {
            satellite: key.satellite.clone(),
            station: key.station.clone(),
            slot: key.slot.clone(),
            volume_gb,
            memory_before_gb,
            memory_after_gb,
            power_level_wh: power_levels.get(&level_key).copied().unwrap_or(0.0),
        });
    }

    let mut resources: BTreeMap<SatelliteId, Vec<ResourceSample>> = BTreeMap::new();
    for satellite in catalog.satellites() {
        let mut samples = Vec::with_capacity(model.slots.combined_slots().len());
        for slot in model.slots.combined_slots() {
            let key = LevelKey::new(satellite.id.clone(), slot.clone());
            samples.push(ResourceSample {
                slot: slot.clone(),
                memory_gb: memory_levels.get(&key).copied().unwrap_or(0.0),
                power_wh: power_levels
                    .get(&key)
                    .copied()
                    .unwrap_or(config.power.capacity_wh),
            });
        }
        resources.insert(satellite.id.clone(), samples);
    }

    Ok(ScheduleSolution {
        objective_value: solution.objective_value,
        degraded: solution.degraded,
        observations,
        downlinks,
        resources,
    })
}

/// Memory levels implied by the scheduled observations and downlink volumes,
/// computed by running the stock-flow recurrence forward from the configured
/// initial level. For a solution satisfying the balance rows this reproduces
/// the level variables exactly.
pub fn replay_memory_levels(
    model: &ScheduleModel,
    catalog: &Catalog,
    config: &ModelConfig,
    values: &VariableValues,
) -> BTreeMap<LevelKey, f64> {
    let mut delta: BTreeMap<LevelKey, f64> = BTreeMap::new();
    for (key, id) in &model.observation_vars {
        if is_active(values.value_or_zero(*id)) {
            *delta
                .entry(LevelKey::new(key.satellite.clone(), key.slot.clone()))
                .or_insert(0.0) += config.data_per_obs_gb;
        }
    }
    for (key, id) in &model.volume_vars {
        *delta
            .entry(LevelKey::new(key.satellite.clone(), key.slot.clone()))
            .or_insert(0.0) -= values.value_or_zero(*id);
    }

    let mut levels = BTreeMap::new();
    for satellite in catalog.satellites() {
        let mut level = config.initial_memory_gb;
        for slot in model.slots.combined_slots() {
            let key = LevelKey::new(satellite.id.clone(), slot.clone());
            level += delta.get(&key).copied().unwrap_or(0.0);
            levels.insert(key, level);
        }
    }
    levels
}

/// Power levels implied by the schedule: the battery starts full, spends
/// per-observation and per-gigabyte amounts, gains the per-slot charge in
/// recharge slots, and never leaves `[0, capacity]`. A schedule that would
/// drive the trajectory below zero is infeasible; the replayed level bottoms
/// out and the balance row reports the deficit.
pub fn replay_power_levels(
    model: &ScheduleModel,
    catalog: &Catalog,
    config: &ModelConfig,
    values: &VariableValues,
) -> BTreeMap<LevelKey, f64> {
    let mut consumption: BTreeMap<LevelKey, f64> = BTreeMap::new();
    for (key, id) in &model.observation_vars {
        if is_active(values.value_or_zero(*id)) {
            *consumption
                .entry(LevelKey::new(key.satellite.clone(), key.slot.clone()))
                .or_insert(0.0) += config.power.per_observation_wh;
        }
    }
    for (key, id) in &model.volume_vars {
        let volume = values.value_or_zero(*id);
        if volume > 0.0 {
            *consumption
                .entry(LevelKey::new(key.satellite.clone(), key.slot.clone()))
                .or_insert(0.0) += volume * config.power.per_gb_downlinked_wh;
        }
    }
    let recharge: BTreeSet<LevelKey> = catalog
        .recharge_windows()
        .iter()
        .map(|w| LevelKey::new(w.satellite.clone(), w.slot.clone()))
        .collect();

    let mut levels = BTreeMap::new();
    for satellite in catalog.satellites() {
        let mut level = config.power.capacity_wh;
        for slot in model.slots.combined_slots() {
            let key = LevelKey::new(satellite.id.clone(), slot.clone());
            level -= consumption.get(&key).copied().unwrap_or(0.0);
            if recharge.contains(&key) {
                level += config.power.charge_per_slot_wh;
            }
            level = level.min(config.power.capacity_wh).max(0.0);
            levels.insert(key, level);
        }
    }
    levels
}
