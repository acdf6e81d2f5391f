//! Loading fleet data and configuration from disk.

mod support;

use std::fs;
use std::path::Path;

use eos_sched::config::ModelConfig;
use eos_sched::error::ScheduleError;
use eos_sched::io::{
    load_catalog_from_dir, DOWNLINK_FILE, GROUND_STATION_FILE, RECHARGE_FILE, SATELLITE_FILE,
    TARGET_FILE, VISIBILITY_FILE,
};
use eos_sched::models::{GroundStationId, SatelliteId};
use eos_sched::planner::plan;

use support::{test_config, ExhaustiveOracle};

/// Writes the five required tables. Window tables include one row with an
/// unknown id each, which the loader must skip rather than reject.
fn write_required_files(dir: &Path) {
    fs::write(
        dir.join(SATELLITE_FILE),
        "Satellite ID, Orbit, Memory Capacity (GB), Max Observations/Day\n\
         SAT1, LEO, 25, 4\n\
         SAT2, SSO, 30, 4\n",
    )
    .unwrap();
    fs::write(
        dir.join(GROUND_STATION_FILE),
        "Station ID,\"Location (Lat, Lon)\",Max Data Rate (GB/slot)\n\
         GS1,\"(40.4168, -3.7038)\",8\n",
    )
    .unwrap();
    fs::write(
        dir.join(TARGET_FILE),
        "Target ID, Latitude (°N), Longitude (°E), Urgency, Importance\n\
         TGT1, 41.0, 2.0, 5, 6\n\
         TGT2, 12.0, 7.0, 2, 3\n",
    )
    .unwrap();
    fs::write(
        dir.join(VISIBILITY_FILE),
        "Satellite ID, Target ID, Time Slot, Duration (min)\n\
         SAT1, TGT1, T1 – T1, 12.5\n\
         SAT2, TGT2, T2 – T3, 10\n\
         GHOST, TGT1, T1 – T1, 10\n",
    )
    .unwrap();
    fs::write(
        dir.join(DOWNLINK_FILE),
        "Satellite ID, Ground Station ID, Time Slot, Duration (min), Max Data (GB)\n\
         SAT1, GS1, T4 – T4, 10, 12\n\
         SAT2, GS9, T4 – T4, 10, 12\n",
    )
    .unwrap();
}

fn write_recharge_file(dir: &Path) {
    fs::write(
        dir.join(RECHARGE_FILE),
        "Satellite ID, Time Slot\n\
         SAT1, T5\n\
         SAT2, T5 – T6\n",
    )
    .unwrap();
}

#[test]
fn loads_a_full_catalog_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_required_files(dir.path());
    write_recharge_file(dir.path());

    let catalog = load_catalog_from_dir(dir.path()).unwrap();

    assert_eq!(catalog.num_satellites(), 2);
    assert_eq!(catalog.num_ground_stations(), 1);
    assert_eq!(catalog.num_targets(), 2);
    // the GHOST visibility row and the GS9 downlink row are skipped
    assert_eq!(catalog.num_visibility_windows(), 2);
    assert_eq!(catalog.num_downlink_windows(), 1);
    assert_eq!(catalog.num_recharge_windows(), 2);

    let sat = catalog.satellite(&SatelliteId::from("SAT1")).unwrap();
    assert_eq!(sat.orbit, "LEO");
    assert_eq!(sat.memory_capacity_gb, 25.0);

    let station = catalog
        .ground_station(&GroundStationId::from("GS1"))
        .unwrap();
    assert_eq!(station.location, "(40.4168, -3.7038)");

    assert_eq!(catalog.visibility_windows()[1].slot().as_str(), "T2");
    assert_eq!(catalog.visibility_windows()[1].interval.end.as_str(), "T3");
    // interval-form recharge cells resolve to their start label
    assert_eq!(catalog.recharge_windows()[1].slot.as_str(), "T5");
}

#[test]
fn recharge_data_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    write_required_files(dir.path());

    let catalog = load_catalog_from_dir(dir.path()).unwrap();
    assert_eq!(catalog.num_recharge_windows(), 0);
    assert_eq!(catalog.num_satellites(), 2);
}

#[test]
fn a_missing_required_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    write_required_files(dir.path());
    fs::remove_file(dir.path().join(GROUND_STATION_FILE)).unwrap();

    let err = load_catalog_from_dir(dir.path()).unwrap_err();
    match err {
        ScheduleError::Io(e) => assert!(e.to_string().contains(GROUND_STATION_FILE)),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn a_malformed_window_interval_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_required_files(dir.path());
    fs::write(
        dir.path().join(VISIBILITY_FILE),
        "Satellite ID, Target ID, Time Slot, Duration (min)\n\
         SAT1, TGT1, T1T2, 10\n",
    )
    .unwrap();

    let err = load_catalog_from_dir(dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ScheduleError::DataFormat(_)));
    assert!(message.contains(VISIBILITY_FILE));
    assert!(message.contains("malformed slot interval"));
}

#[test]
fn bad_numbers_surface_as_data_format_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_required_files(dir.path());
    fs::write(
        dir.path().join(TARGET_FILE),
        "Target ID, Latitude (°N), Longitude (°E), Urgency, Importance\n\
         TGT1, 41.0, 2.0, high, 5\n",
    )
    .unwrap();

    let err = load_catalog_from_dir(dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ScheduleError::DataFormat(_)));
    assert!(message.contains(TARGET_FILE));
}

#[test]
fn model_config_loads_from_toml_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.toml");
    fs::write(
        &path,
        "data_per_obs_gb = 3.0\n\n[power]\ncapacity_wh = 80.0\n",
    )
    .unwrap();

    let config = ModelConfig::from_file(&path).unwrap();
    assert_eq!(config.data_per_obs_gb, 3.0);
    assert_eq!(config.power.capacity_wh, 80.0);
    // everything not in the file keeps its default
    assert_eq!(config.max_downlink_per_slot_gb, 10.0);

    let err = ModelConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ScheduleError::Configuration(_)));

    fs::write(&path, "downlink_weight = 1.5\n").unwrap();
    let err = ModelConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ScheduleError::Configuration(_)));
}

#[test]
fn a_catalog_loaded_from_disk_plans_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    write_required_files(dir.path());
    write_recharge_file(dir.path());

    let catalog = load_catalog_from_dir(dir.path()).unwrap();
    let config = test_config();
    let mut oracle = ExhaustiveOracle::for_fixture(&catalog, &config);
    let outcome = plan(&catalog, config, &mut oracle).unwrap();

    // SAT2 lost its downlink window to the unknown-station row, so only
    // SAT1's observation can come back down
    assert_eq!(outcome.solution.observations.len(), 2);
    assert_eq!(outcome.solution.downlinks.len(), 1);
    assert_eq!(outcome.solution.downlinks[0].volume_gb, 5.0);
    assert_eq!(outcome.report.num_slots, 3);
    assert!((outcome.solution.objective_value - 36.005).abs() < 1e-9);
}
