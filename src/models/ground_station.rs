use crate::error::{ScheduleError, ScheduleResult};

crate::define_id_type!(GroundStationId);

/// A receiving ground station. `max_data_rate_gb` caps the volume the
/// station can take from one satellite in a single downlink slot.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GroundStation {
    pub id: GroundStationId,
    pub location: String,
    pub max_data_rate_gb: f64,
}

impl GroundStation {
    /// Record-level invariants, checked at catalog insertion.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(self.max_data_rate_gb >= 0.0) {
            return Err(ScheduleError::data_format(format!(
                "ground station {}: max data rate must be non-negative, got {}",
                self.id, self.max_data_rate_gb
            )));
        }
        Ok(())
    }
}
