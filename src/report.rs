//! Reporting over an extracted schedule.
//!
//! Aggregates the solution into fleet utilization, target coverage and
//! per-slot timelines, and renders a plain-text executive summary for
//! operators who never look at the JSON.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::ModelConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{PriorityTier, SatelliteId, SlotLabel, TargetId};
use crate::solver::ScheduleSolution;

/// The dominant activity of a satellite in one slot. When several apply the
/// first in declaration order wins: observing over downlinking over
/// recharging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotActivity {
    Observing,
    Downlinking,
    Recharging,
    Idle,
}

impl SlotActivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotActivity::Observing => "Observing",
            SlotActivity::Downlinking => "Downlinking",
            SlotActivity::Recharging => "Recharging",
            SlotActivity::Idle => "Idle",
        }
    }
}

/// Per-satellite activity summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteUtilization {
    pub satellite: SatelliteId,
    pub observations: usize,
    /// `max_obs_per_day` times the configured horizon.
    pub max_possible_obs: u32,
    pub utilization_pct: f64,
    /// Distinct slots with any scheduled activity.
    pub slots_used: usize,
    pub downlinked_gb: f64,
    pub peak_memory_gb: f64,
}

/// Per-target coverage outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCoverage {
    pub target: TargetId,
    pub tier: PriorityTier,
    pub weighted_value: f64,
    pub observed: bool,
    pub satellite: Option<SatelliteId>,
    pub slot: Option<SlotLabel>,
}

/// Coverage counts for one priority tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub tier: PriorityTier,
    pub total: usize,
    pub observed: usize,
}

/// One satellite-slot cell of the fleet timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub satellite: SatelliteId,
    pub slot: SlotLabel,
    pub activity: SlotActivity,
    pub memory_gb: f64,
    pub power_wh: f64,
}

/// The full report for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub generated_at: DateTime<Utc>,
    pub degraded: bool,
    pub objective_value: f64,
    pub num_satellites: usize,
    pub num_stations: usize,
    pub num_targets: usize,
    pub num_slots: usize,
    pub total_observations: usize,
    pub total_downlinked_gb: f64,
    pub total_weighted_value: f64,
    pub coverage_pct: f64,
    pub tiers: Vec<TierBreakdown>,
    pub utilization: Vec<SatelliteUtilization>,
    pub coverage: Vec<TargetCoverage>,
    pub timeline: Vec<TimelineEntry>,
}

impl ScheduleReport {
    /// Aggregates a solution against the catalog it was planned from.
    pub fn from_solution(
        catalog: &Catalog,
        config: &ModelConfig,
        solution: &ScheduleSolution,
    ) -> Self {
        let num_slots = solution
            .resources
            .values()
            .map(|samples| samples.len())
            .max()
            .unwrap_or(0);
        let (coverage, coverage_pct, tiers) = compute_coverage(catalog, solution);

        ScheduleReport {
            generated_at: Utc::now(),
            degraded: solution.degraded,
            objective_value: solution.objective_value,
            num_satellites: catalog.num_satellites(),
            num_stations: catalog.num_ground_stations(),
            num_targets: catalog.num_targets(),
            num_slots,
            total_observations: solution.observations.len(),
            total_downlinked_gb: solution.total_downlinked_gb(),
            total_weighted_value: solution.total_weighted_value(),
            coverage_pct,
            tiers,
            utilization: compute_utilization(catalog, config, solution),
            coverage,
            timeline: compute_timeline(catalog, solution),
        }
    }

    /// Plain-text block suitable for logs or a terminal.
    pub fn executive_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Schedule report generated {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if self.degraded {
            let _ = writeln!(out, "NOTE: best schedule found within the time budget");
        }
        let _ = writeln!(
            out,
            "Fleet: {} satellites, {} ground stations, {} targets, {} slots",
            self.num_satellites, self.num_stations, self.num_targets, self.num_slots
        );
        let _ = writeln!(out, "Objective value: {:.3}", self.objective_value);
        let _ = writeln!(
            out,
            "Observations: {} scheduled, total weighted value {:.1}",
            self.total_observations, self.total_weighted_value
        );
        let _ = writeln!(
            out,
            "Coverage: {:.1}% of targets observed",
            self.coverage_pct
        );
        for tier in &self.tiers {
            let _ = writeln!(
                out,
                "  {:<6} {} of {} observed",
                tier.tier.as_str(),
                tier.observed,
                tier.total
            );
        }
        let _ = writeln!(out, "Downlinked: {:.2} GB", self.total_downlinked_gb);
        for util in &self.utilization {
            let _ = writeln!(
                out,
                "  {}: {} obs ({:.1}% of {}), {:.2} GB down, peak memory {:.1} GB",
                util.satellite,
                util.observations,
                util.utilization_pct,
                util.max_possible_obs,
                util.downlinked_gb,
                util.peak_memory_gb
            );
        }
        out
    }

    pub fn to_json(&self) -> ScheduleResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScheduleError::data_format(format!("Serialization failed: {}", e)))
    }
}

fn compute_utilization(
    catalog: &Catalog,
    config: &ModelConfig,
    solution: &ScheduleSolution,
) -> Vec<SatelliteUtilization> {
    let mut utilization = Vec::with_capacity(catalog.num_satellites());
    for satellite in catalog.satellites() {
        let observations = solution
            .observations
            .iter()
            .filter(|o| o.satellite == satellite.id)
            .count();
        let downlinked_gb: f64 = solution
            .downlinks
            .iter()
            .filter(|d| d.satellite == satellite.id)
            .map(|d| d.volume_gb)
            .sum();
        let slots_used: BTreeSet<&SlotLabel> = solution
            .observations
            .iter()
            .filter(|o| o.satellite == satellite.id)
            .map(|o| &o.slot)
            .chain(
                solution
                    .downlinks
                    .iter()
                    .filter(|d| d.satellite == satellite.id)
                    .map(|d| &d.slot),
            )
            .collect();
        let peak_memory_gb = solution
            .resources
            .get(&satellite.id)
            .into_iter()
            .flatten()
            .map(|s| s.memory_gb)
            .fold(0.0, f64::max);

        let max_possible_obs = satellite.max_obs_per_day * config.horizon_days;
        let utilization_pct = if max_possible_obs > 0 {
            observations as f64 / f64::from(max_possible_obs) * 100.0
        } else {
            0.0
        };
        utilization.push(SatelliteUtilization {
            satellite: satellite.id.clone(),
            observations,
            max_possible_obs,
            utilization_pct,
            slots_used: slots_used.len(),
            downlinked_gb,
            peak_memory_gb,
        });
    }
    utilization
}

fn compute_coverage(
    catalog: &Catalog,
    solution: &ScheduleSolution,
) -> (Vec<TargetCoverage>, f64, Vec<TierBreakdown>) {
    let mut coverage = Vec::with_capacity(catalog.num_targets());
    for target in catalog.targets() {
        let assignment = solution
            .observations
            .iter()
            .find(|o| o.target == target.id);
        coverage.push(TargetCoverage {
            target: target.id.clone(),
            tier: target.priority_tier(),
            weighted_value: target.weighted_value(),
            observed: assignment.is_some(),
            satellite: assignment.map(|o| o.satellite.clone()),
            slot: assignment.map(|o| o.slot.clone()),
        });
    }

    let observed = coverage.iter().filter(|c| c.observed).count();
    let coverage_pct = if coverage.is_empty() {
        0.0
    } else {
        observed as f64 / coverage.len() as f64 * 100.0
    };

    let tiers = [PriorityTier::High, PriorityTier::Medium, PriorityTier::Low]
        .into_iter()
        .map(|tier| TierBreakdown {
            tier,
            total: coverage.iter().filter(|c| c.tier == tier).count(),
            observed: coverage
                .iter()
                .filter(|c| c.tier == tier && c.observed)
                .count(),
        })
        .collect();

    (coverage, coverage_pct, tiers)
}

fn compute_timeline(catalog: &Catalog, solution: &ScheduleSolution) -> Vec<TimelineEntry> {
    let observing: BTreeSet<(&SatelliteId, &SlotLabel)> = solution
        .observations
        .iter()
        .map(|o| (&o.satellite, &o.slot))
        .collect();
    let downlinking: BTreeSet<(&SatelliteId, &SlotLabel)> = solution
        .downlinks
        .iter()
        .map(|d| (&d.satellite, &d.slot))
        .collect();
    let recharging: BTreeSet<(&SatelliteId, &SlotLabel)> = catalog
        .recharge_windows()
        .iter()
        .map(|w| (&w.satellite, &w.slot))
        .collect();

    let mut timeline = Vec::new();
    for (satellite, samples) in &solution.resources {
        for sample in samples {
            let cell = (satellite, &sample.slot);
            let activity = if observing.contains(&cell) {
                SlotActivity::Observing
            } else if downlinking.contains(&cell) {
                SlotActivity::Downlinking
            } else if recharging.contains(&cell) {
                SlotActivity::Recharging
            } else {
                SlotActivity::Idle
            };
            timeline.push(TimelineEntry {
                satellite: satellite.clone(),
                slot: sample.slot.clone(),
                activity,
                memory_gb: sample.memory_gb,
                power_wh: sample.power_wh,
            });
        }
    }
    timeline
}
