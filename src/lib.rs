//! # eos-sched
//!
//! Observation and downlink planning for small Earth-observation fleets.
//!
//! Given a catalog of satellites, ground stations, targets and their time
//! windows, the crate builds a sparse mixed-integer model of one planning
//! horizon, hands it to a pluggable solver back end, and turns the returned
//! values into typed schedules and operator-facing reports.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Identifier newtypes and fleet entity records
//! - [`catalog`]: The validated, cross-referenced input snapshot
//! - [`slots`]: Slot-label unification into an ordered planning timeline
//! - [`config`]: TOML-backed model parameters
//! - [`solver`]: Model construction, the oracle seam, extraction and validation
//! - [`report`]: Utilization, coverage and timeline aggregation
//! - [`planner`]: One-call end-to-end planning service
//! - [`io`]: CSV ingestion of the six input tables
//!
//! ## Determinism
//!
//! Model construction is deterministic: the same catalog and configuration
//! produce the same variable order, the same constraint order and the same
//! content fingerprint, which makes solver behavior reproducible and model
//! diffs meaningful.

pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod planner;
pub mod report;
pub mod slots;
pub mod solver;
