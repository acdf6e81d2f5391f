use crate::error::{ScheduleError, ScheduleResult};

crate::define_id_type!(SatelliteId);

/// An imaging satellite and its onboard resource envelope.
///
/// Memory capacity bounds the running data inventory between downlink
/// passes; `max_obs_per_day` caps how many observations the platform can
/// execute per day of the planning horizon.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Satellite {
    pub id: SatelliteId,
    pub orbit: String,
    pub memory_capacity_gb: f64,
    pub max_obs_per_day: u32,
}

impl Satellite {
    /// Record-level invariants, checked at catalog insertion.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(self.memory_capacity_gb > 0.0) {
            return Err(ScheduleError::data_format(format!(
                "satellite {}: memory capacity must be positive, got {}",
                self.id, self.memory_capacity_gb
            )));
        }
        Ok(())
    }
}
