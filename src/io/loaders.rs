//! CSV ingestion of fleet data.
//!
//! Six tabular inputs describe the planning problem: three entity tables
//! (satellites, ground stations, targets) and three window tables
//! (visibility, downlink, recharge). Headers are matched by name, fields
//! are trimmed, and location values may contain quoted commas.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    DownlinkWindow, GroundStation, GroundStationId, RechargeWindow, Satellite, SatelliteId,
    SlotInterval, SlotLabel, Target, TargetId, VisibilityWindow,
};

pub const SATELLITE_FILE: &str = "Satellite.csv";
pub const GROUND_STATION_FILE: &str = "GroundStation.csv";
pub const TARGET_FILE: &str = "Target.csv";
pub const VISIBILITY_FILE: &str = "VTW.csv";
pub const DOWNLINK_FILE: &str = "Downlink.csv";
pub const RECHARGE_FILE: &str = "Recharge.csv";

#[derive(Debug, Deserialize)]
struct SatelliteRow {
    #[serde(rename = "Satellite ID")]
    id: String,
    #[serde(rename = "Orbit")]
    orbit: String,
    #[serde(rename = "Memory Capacity (GB)")]
    memory_capacity_gb: f64,
    #[serde(rename = "Max Observations/Day")]
    max_obs_per_day: u32,
}

#[derive(Debug, Deserialize)]
struct GroundStationRow {
    #[serde(rename = "Station ID")]
    id: String,
    #[serde(rename = "Location (Lat, Lon)")]
    location: String,
    #[serde(rename = "Max Data Rate (GB/slot)")]
    max_data_rate_gb: f64,
}

#[derive(Debug, Deserialize)]
struct TargetRow {
    #[serde(rename = "Target ID")]
    id: String,
    #[serde(rename = "Latitude (°N)")]
    latitude_deg: f64,
    #[serde(rename = "Longitude (°E)")]
    longitude_deg: f64,
    #[serde(rename = "Urgency")]
    urgency: f64,
    #[serde(rename = "Importance")]
    importance: f64,
}

#[derive(Debug, Deserialize)]
struct VisibilityRow {
    #[serde(rename = "Satellite ID")]
    satellite_id: String,
    #[serde(rename = "Target ID")]
    target_id: String,
    #[serde(rename = "Time Slot")]
    time_slot: String,
    #[serde(rename = "Duration (min)")]
    duration_min: f64,
}

#[derive(Debug, Deserialize)]
struct DownlinkRow {
    #[serde(rename = "Satellite ID")]
    satellite_id: String,
    #[serde(rename = "Ground Station ID")]
    station_id: String,
    #[serde(rename = "Time Slot")]
    time_slot: String,
    #[serde(rename = "Duration (min)")]
    duration_min: f64,
    #[serde(rename = "Max Data (GB)")]
    max_data_gb: f64,
}

#[derive(Debug, Deserialize)]
struct RechargeRow {
    #[serde(rename = "Satellite ID")]
    satellite_id: String,
    #[serde(rename = "Time Slot")]
    time_slot: String,
}

fn csv_reader(reader: impl Read) -> csv::Reader<impl Read> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parse satellite records from CSV.
pub fn read_satellites(reader: impl Read) -> ScheduleResult<Vec<Satellite>> {
    let mut satellites = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let row: SatelliteRow = row?;
        satellites.push(Satellite {
            id: SatelliteId::from(row.id),
            orbit: row.orbit,
            memory_capacity_gb: row.memory_capacity_gb,
            max_obs_per_day: row.max_obs_per_day,
        });
    }
    Ok(satellites)
}

/// Parse ground station records from CSV.
pub fn read_ground_stations(reader: impl Read) -> ScheduleResult<Vec<GroundStation>> {
    let mut stations = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let row: GroundStationRow = row?;
        stations.push(GroundStation {
            id: GroundStationId::from(row.id),
            location: row.location,
            max_data_rate_gb: row.max_data_rate_gb,
        });
    }
    Ok(stations)
}

/// Parse target records from CSV.
pub fn read_targets(reader: impl Read) -> ScheduleResult<Vec<Target>> {
    let mut targets = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let row: TargetRow = row?;
        targets.push(Target {
            id: TargetId::from(row.id),
            latitude_deg: row.latitude_deg,
            longitude_deg: row.longitude_deg,
            urgency: row.urgency,
            importance: row.importance,
        });
    }
    Ok(targets)
}

/// Parse visibility time windows from CSV. The "Time Slot" cell holds a
/// "`start – end`" interval.
pub fn read_visibility_windows(reader: impl Read) -> ScheduleResult<Vec<VisibilityWindow>> {
    let mut windows = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let row: VisibilityRow = row?;
        windows.push(VisibilityWindow {
            satellite: SatelliteId::from(row.satellite_id),
            target: TargetId::from(row.target_id),
            interval: SlotInterval::parse(&row.time_slot)?,
            duration_min: row.duration_min,
        });
    }
    Ok(windows)
}

/// Parse downlink windows from CSV.
pub fn read_downlink_windows(reader: impl Read) -> ScheduleResult<Vec<DownlinkWindow>> {
    let mut windows = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let row: DownlinkRow = row?;
        windows.push(DownlinkWindow {
            satellite: SatelliteId::from(row.satellite_id),
            station: GroundStationId::from(row.station_id),
            interval: SlotInterval::parse(&row.time_slot)?,
            duration_min: row.duration_min,
            max_data_gb: row.max_data_gb,
        });
    }
    Ok(windows)
}

/// Parse recharge windows from CSV. The slot cell is either a bare label
/// or an interval, in which case the start label is used. A bare hyphen
/// inside a label (a date, say) does not make it an interval.
pub fn read_recharge_windows(reader: impl Read) -> ScheduleResult<Vec<RechargeWindow>> {
    let mut windows = Vec::new();
    for row in csv_reader(reader).deserialize() {
        let row: RechargeRow = row?;
        windows.push(RechargeWindow {
            satellite: SatelliteId::from(row.satellite_id),
            slot: recharge_slot(&row.time_slot)?,
        });
    }
    Ok(windows)
}

fn recharge_slot(cell: &str) -> ScheduleResult<SlotLabel> {
    if cell.contains('–') || cell.contains(" - ") {
        return Ok(SlotInterval::parse(cell)?.start);
    }
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::data_format("empty Time Slot in recharge row"));
    }
    Ok(SlotLabel::from(trimmed))
}

/// Loads a full catalog from a directory holding the six CSV files.
/// `Recharge.csv` is optional; all other files are required. Window rows
/// that reference unknown entities are logged and skipped.
pub fn load_catalog_from_dir(dir: impl AsRef<Path>) -> ScheduleResult<Catalog> {
    let dir = dir.as_ref();

    let satellites = read_satellites(open(dir, SATELLITE_FILE)?)
        .map_err(|e| with_file_context(e, SATELLITE_FILE))?;
    let stations = read_ground_stations(open(dir, GROUND_STATION_FILE)?)
        .map_err(|e| with_file_context(e, GROUND_STATION_FILE))?;
    let targets =
        read_targets(open(dir, TARGET_FILE)?).map_err(|e| with_file_context(e, TARGET_FILE))?;
    let visibility = read_visibility_windows(open(dir, VISIBILITY_FILE)?)
        .map_err(|e| with_file_context(e, VISIBILITY_FILE))?;
    let downlinks = read_downlink_windows(open(dir, DOWNLINK_FILE)?)
        .map_err(|e| with_file_context(e, DOWNLINK_FILE))?;

    let recharge_path = dir.join(RECHARGE_FILE);
    let recharges = if recharge_path.exists() {
        read_recharge_windows(open(dir, RECHARGE_FILE)?)
            .map_err(|e| with_file_context(e, RECHARGE_FILE))?
    } else {
        log::info!("no {} found, satellites never recharge", RECHARGE_FILE);
        Vec::new()
    };

    let mut catalog = Catalog::new();
    for satellite in satellites {
        catalog.add_satellite(satellite)?;
    }
    for station in stations {
        catalog.add_ground_station(station)?;
    }
    for target in targets {
        catalog.add_target(target)?;
    }

    let mut skipped = 0usize;
    for window in visibility {
        if !catalog.add_visibility_window(window) {
            skipped += 1;
        }
    }
    for window in downlinks {
        if !catalog.add_downlink_window(window) {
            skipped += 1;
        }
    }
    for window in recharges {
        if !catalog.add_recharge_window(window) {
            skipped += 1;
        }
    }

    log::info!(
        "catalog loaded from {}: {} satellites, {} stations, {} targets, {} visibility windows, {} downlink windows, {} recharge windows ({} window rows skipped)",
        dir.display(),
        catalog.num_satellites(),
        catalog.num_ground_stations(),
        catalog.num_targets(),
        catalog.num_visibility_windows(),
        catalog.num_downlink_windows(),
        catalog.num_recharge_windows(),
        skipped,
    );
    Ok(catalog)
}

fn open(dir: &Path, name: &str) -> ScheduleResult<File> {
    let path = dir.join(name);
    File::open(&path).map_err(|e| {
        ScheduleError::Io(io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

fn with_file_context(err: ScheduleError, file: &str) -> ScheduleError {
    match err {
        ScheduleError::DataFormat(msg) => ScheduleError::data_format(format!("{}: {}", file, msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_satellites_parses_rows() {
        let csv = "Satellite ID, Orbit, Memory Capacity (GB), Max Observations/Day\n\
                   SAT1, LEO, 25, 4\n\
                   SAT2, SSO, 40.5, 6\n";
        let satellites = read_satellites(csv.as_bytes()).unwrap();
        assert_eq!(satellites.len(), 2);
        assert_eq!(satellites[0].id.as_str(), "SAT1");
        assert_eq!(satellites[0].orbit, "LEO");
        assert_eq!(satellites[1].memory_capacity_gb, 40.5);
        assert_eq!(satellites[1].max_obs_per_day, 6);
    }

    #[test]
    fn test_quoted_location_keeps_its_comma() {
        // quotes must open at the field start, so no space after the comma
        let csv = "Station ID,\"Location (Lat, Lon)\",Max Data Rate (GB/slot)\n\
                   GS1,\"(40.4168, -3.7038)\",8\n";
        let stations = read_ground_stations(csv.as_bytes()).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].location, "(40.4168, -3.7038)");
        assert_eq!(stations[0].max_data_rate_gb, 8.0);
    }

    #[test]
    fn test_header_whitespace_is_trimmed() {
        // trailing space after the last header name, spaces after commas
        let csv = "Satellite ID, Target ID, Time Slot , Duration (min)\n\
                   SAT1, TGT1, T1 – T2, 12.5\n";
        let windows = read_visibility_windows(csv.as_bytes()).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].interval.start.as_str(), "T1");
        assert_eq!(windows[0].interval.end.as_str(), "T2");
        assert_eq!(windows[0].duration_min, 12.5);
    }

    #[test]
    fn test_malformed_interval_is_a_data_format_error() {
        let csv = "Satellite ID, Ground Station ID, Time Slot, Duration (min), Max Data (GB)\n\
                   SAT1, GS1, T1T2, 10, 5\n";
        let err = read_downlink_windows(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::DataFormat(_)));
    }

    #[test]
    fn test_unparseable_number_is_a_data_format_error() {
        let csv = "Target ID, Latitude (°N), Longitude (°E), Urgency, Importance\n\
                   TGT1, 41.0, 2.0, high, 5\n";
        let err = read_targets(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::DataFormat(_)));
    }

    #[test]
    fn test_recharge_accepts_bare_labels_and_intervals() {
        let csv = "Satellite ID, Time Slot\n\
                   SAT1, T4\n\
                   SAT1, 2025-03-02\n\
                   SAT2, T5 – T6\n";
        let windows = read_recharge_windows(csv.as_bytes()).unwrap();
        assert_eq!(windows[0].slot.as_str(), "T4");
        // a date is a label, not an interval
        assert_eq!(windows[1].slot.as_str(), "2025-03-02");
        assert_eq!(windows[2].slot.as_str(), "T5");
    }
}
