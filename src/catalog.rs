//! In-memory catalog of fleet entities and opportunity windows.
//!
//! The catalog is the read-only input of a scheduling run: entities are
//! inserted once, validated on the way in, and never mutated afterwards.
//! Window records must reference known entities; rows that do not are
//! logged and skipped so a stray id in an input table cannot leak into the
//! optimization model.

use std::collections::BTreeMap;

use crate::error::ScheduleResult;
use crate::models::{
    DownlinkWindow, GroundStation, GroundStationId, RechargeWindow, Satellite, SatelliteId,
    Target, TargetId, VisibilityWindow,
};

/// Typed collections of satellites, ground stations, targets and their
/// opportunity windows, keyed by natural identifiers.
///
/// Entity iteration is always in id order, which keeps everything built on
/// top of the catalog deterministic.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    satellites: BTreeMap<SatelliteId, Satellite>,
    stations: BTreeMap<GroundStationId, GroundStation>,
    targets: BTreeMap<TargetId, Target>,
    visibility: Vec<VisibilityWindow>,
    downlinks: Vec<DownlinkWindow>,
    recharges: Vec<RechargeWindow>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a satellite after validating its record invariants.
    /// Duplicate ids are rejected rather than overwritten.
    pub fn add_satellite(&mut self, satellite: Satellite) -> ScheduleResult<()> {
        satellite.validate()?;
        if self.satellites.contains_key(&satellite.id) {
            return Err(crate::error::ScheduleError::data_format(format!(
                "duplicate satellite id {}",
                satellite.id
            )));
        }
        self.satellites.insert(satellite.id.clone(), satellite);
        Ok(())
    }

    pub fn add_ground_station(&mut self, station: GroundStation) -> ScheduleResult<()> {
        station.validate()?;
        if self.stations.contains_key(&station.id) {
            return Err(crate::error::ScheduleError::data_format(format!(
                "duplicate ground station id {}",
                station.id
            )));
        }
        self.stations.insert(station.id.clone(), station);
        Ok(())
    }

    pub fn add_target(&mut self, target: Target) -> ScheduleResult<()> {
        target.validate()?;
        if self.targets.contains_key(&target.id) {
            return Err(crate::error::ScheduleError::data_format(format!(
                "duplicate target id {}",
                target.id
            )));
        }
        self.targets.insert(target.id.clone(), target);
        Ok(())
    }

    /// Add a visibility window. Returns `false` (and logs) when the window
    /// references an unknown satellite or target and was skipped.
    pub fn add_visibility_window(&mut self, window: VisibilityWindow) -> bool {
        if !self.satellites.contains_key(&window.satellite) {
            log::warn!(
                "skipping visibility window for unknown satellite {} (target {}, slot {})",
                window.satellite,
                window.target,
                window.slot()
            );
            return false;
        }
        if !self.targets.contains_key(&window.target) {
            log::warn!(
                "skipping visibility window for unknown target {} (satellite {}, slot {})",
                window.target,
                window.satellite,
                window.slot()
            );
            return false;
        }
        self.visibility.push(window);
        true
    }

    /// Add a downlink window. Returns `false` (and logs) when the window
    /// references an unknown satellite or station and was skipped.
    pub fn add_downlink_window(&mut self, window: DownlinkWindow) -> bool {
        if !self.satellites.contains_key(&window.satellite) {
            log::warn!(
                "skipping downlink window for unknown satellite {} (station {}, slot {})",
                window.satellite,
                window.station,
                window.slot()
            );
            return false;
        }
        if !self.stations.contains_key(&window.station) {
            log::warn!(
                "skipping downlink window for unknown ground station {} (satellite {}, slot {})",
                window.station,
                window.satellite,
                window.slot()
            );
            return false;
        }
        self.downlinks.push(window);
        true
    }

    /// Add a recharge window. Returns `false` (and logs) when the window
    /// references an unknown satellite and was skipped.
    pub fn add_recharge_window(&mut self, window: RechargeWindow) -> bool {
        if !self.satellites.contains_key(&window.satellite) {
            log::warn!(
                "skipping recharge window for unknown satellite {} (slot {})",
                window.satellite,
                window.slot
            );
            return false;
        }
        self.recharges.push(window);
        true
    }

    pub fn satellite(&self, id: &SatelliteId) -> Option<&Satellite> {
        self.satellites.get(id)
    }

    pub fn ground_station(&self, id: &GroundStationId) -> Option<&GroundStation> {
        self.stations.get(id)
    }

    pub fn target(&self, id: &TargetId) -> Option<&Target> {
        self.targets.get(id)
    }

    /// Satellites in id order.
    pub fn satellites(&self) -> impl Iterator<Item = &Satellite> {
        self.satellites.values()
    }

    /// Ground stations in id order.
    pub fn ground_stations(&self) -> impl Iterator<Item = &GroundStation> {
        self.stations.values()
    }

    /// Targets in id order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn visibility_windows(&self) -> &[VisibilityWindow] {
        &self.visibility
    }

    pub fn downlink_windows(&self) -> &[DownlinkWindow] {
        &self.downlinks
    }

    pub fn recharge_windows(&self) -> &[RechargeWindow] {
        &self.recharges
    }

    pub fn num_satellites(&self) -> usize {
        self.satellites.len()
    }

    pub fn num_ground_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn num_visibility_windows(&self) -> usize {
        self.visibility.len()
    }

    pub fn num_downlink_windows(&self) -> usize {
        self.downlinks.len()
    }

    pub fn num_recharge_windows(&self) -> usize {
        self.recharges.len()
    }
}
