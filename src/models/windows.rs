//! Opportunity windows: the precomputed visibility, downlink and recharge
//! records the model is built from.

use super::{GroundStationId, SatelliteId, SlotInterval, SlotLabel, TargetId};

/// Satellite `satellite` can observe `target` in the slot starting at
/// `interval.start`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VisibilityWindow {
    pub satellite: SatelliteId,
    pub target: TargetId,
    pub interval: SlotInterval,
    pub duration_min: f64,
}

impl VisibilityWindow {
    /// The slot label indexing the observation decision.
    pub fn slot(&self) -> &SlotLabel {
        &self.interval.start
    }
}

/// Satellite `satellite` can transmit to `station` in the slot starting at
/// `interval.start`, up to `max_data_gb`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DownlinkWindow {
    pub satellite: SatelliteId,
    pub station: GroundStationId,
    pub interval: SlotInterval,
    pub duration_min: f64,
    pub max_data_gb: f64,
}

impl DownlinkWindow {
    /// The slot label indexing the downlink decision.
    pub fn slot(&self) -> &SlotLabel {
        &self.interval.start
    }
}

/// Satellite `satellite` is in sunlight during `slot` and charges.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RechargeWindow {
    pub satellite: SatelliteId,
    pub slot: SlotLabel,
}
