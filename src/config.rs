//! Model configuration with TOML file support.
//!
//! All stock-flow coefficients of the formulation live here rather than as
//! hardcoded constants: memory inflow per observation, the downlink volume
//! cap, the objective's downlink tie-break weight, the first-slot memory
//! seed, and the battery model.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ScheduleError, ScheduleResult};

/// Scheduling model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Memory inflow per scheduled observation, in GB.
    #[serde(default = "default_data_per_obs_gb")]
    pub data_per_obs_gb: f64,
    /// Global per-slot downlink volume cap, in GB. The effective cap of a
    /// downlink variable is the minimum of this, the window's max data and
    /// the station's max data rate.
    #[serde(default = "default_max_downlink_per_slot_gb")]
    pub max_downlink_per_slot_gb: f64,
    /// Strictly positive tie-break weight on total downlink volume. Must
    /// stay small enough that volume never outweighs a coverage trade-off.
    #[serde(default = "default_downlink_weight")]
    pub downlink_weight: f64,
    /// Memory level seeding the first combined slot, in GB.
    #[serde(default)]
    pub initial_memory_gb: f64,
    /// Planning horizon length used for utilization percentages.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default)]
    pub power: PowerConfig,
}

/// Battery model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerConfig {
    /// Battery capacity in Wh; also the initial power level.
    #[serde(default = "default_power_capacity_wh")]
    pub capacity_wh: f64,
    /// Consumption per scheduled observation, in Wh.
    #[serde(default = "default_per_observation_wh")]
    pub per_observation_wh: f64,
    /// Consumption per GB of downlinked volume, in Wh.
    #[serde(default = "default_per_gb_downlinked_wh")]
    pub per_gb_downlinked_wh: f64,
    /// Charge gained in a slot covered by a recharge window, in Wh.
    #[serde(default = "default_charge_per_slot_wh")]
    pub charge_per_slot_wh: f64,
}

fn default_data_per_obs_gb() -> f64 {
    5.0
}

fn default_max_downlink_per_slot_gb() -> f64 {
    10.0
}

fn default_downlink_weight() -> f64 {
    1e-3
}

fn default_horizon_days() -> u32 {
    7
}

fn default_power_capacity_wh() -> f64 {
    100.0
}

fn default_per_observation_wh() -> f64 {
    10.0
}

fn default_per_gb_downlinked_wh() -> f64 {
    2.0
}

fn default_charge_per_slot_wh() -> f64 {
    15.0
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            data_per_obs_gb: default_data_per_obs_gb(),
            max_downlink_per_slot_gb: default_max_downlink_per_slot_gb(),
            downlink_weight: default_downlink_weight(),
            initial_memory_gb: 0.0,
            horizon_days: default_horizon_days(),
            power: PowerConfig::default(),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            capacity_wh: default_power_capacity_wh(),
            per_observation_wh: default_per_observation_wh(),
            per_gb_downlinked_wh: default_per_gb_downlinked_wh(),
            charge_per_slot_wh: default_charge_per_slot_wh(),
        }
    }
}

impl ModelConfig {
    /// Load model configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ModelConfig)` if read, parsed and validated successfully
    /// * `Err(ScheduleError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ScheduleError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse model configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> ScheduleResult<Self> {
        let config: ModelConfig = toml::from_str(content).map_err(|e| {
            ScheduleError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges. Called on load and again before model
    /// construction, so hand-built configs are covered too.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(self.data_per_obs_gb > 0.0) {
            return Err(ScheduleError::configuration(format!(
                "data_per_obs_gb must be positive, got {}",
                self.data_per_obs_gb
            )));
        }
        if !(self.max_downlink_per_slot_gb > 0.0) {
            return Err(ScheduleError::configuration(format!(
                "max_downlink_per_slot_gb must be positive, got {}",
                self.max_downlink_per_slot_gb
            )));
        }
        if !(self.downlink_weight > 0.0 && self.downlink_weight < 1.0) {
            return Err(ScheduleError::configuration(format!(
                "downlink_weight must be in (0, 1), got {}",
                self.downlink_weight
            )));
        }
        if !(self.initial_memory_gb >= 0.0) {
            return Err(ScheduleError::configuration(format!(
                "initial_memory_gb must be non-negative, got {}",
                self.initial_memory_gb
            )));
        }
        if self.horizon_days == 0 {
            return Err(ScheduleError::configuration(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        if !(self.power.capacity_wh > 0.0) {
            return Err(ScheduleError::configuration(format!(
                "power.capacity_wh must be positive, got {}",
                self.power.capacity_wh
            )));
        }
        if !(self.power.per_observation_wh >= 0.0) {
            return Err(ScheduleError::configuration(format!(
                "power.per_observation_wh must be non-negative, got {}",
                self.power.per_observation_wh
            )));
        }
        if !(self.power.per_gb_downlinked_wh >= 0.0) {
            return Err(ScheduleError::configuration(format!(
                "power.per_gb_downlinked_wh must be non-negative, got {}",
                self.power.per_gb_downlinked_wh
            )));
        }
        if !(self.power.charge_per_slot_wh >= 0.0) {
            return Err(ScheduleError::configuration(format!(
                "power.charge_per_slot_wh must be non-negative, got {}",
                self.power.charge_per_slot_wh
            )));
        }
        Ok(())
    }
}
