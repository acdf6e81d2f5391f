//! Unification of the observation and downlink slot universes.
//!
//! Visibility windows and downlink windows are sampled on independent time
//! axes. Resource recurrences need one consistent timeline, so both label
//! sets are deduplicated, sorted, and merged into the combined sequence.

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::models::{DownlinkWindow, SlotLabel, VisibilityWindow};

/// The three sorted slot sequences of a scheduling run: observation slots,
/// downlink slots, and their strictly increasing union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUniverse {
    observation: Vec<SlotLabel>,
    downlink: Vec<SlotLabel>,
    combined: Vec<SlotLabel>,
}

impl SlotUniverse {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::unify(catalog.visibility_windows(), catalog.downlink_windows())
    }

    /// Collect the distinct start labels of both window kinds and merge
    /// them into the combined sequence.
    pub fn unify(visibility: &[VisibilityWindow], downlinks: &[DownlinkWindow]) -> Self {
        let observation: BTreeSet<SlotLabel> =
            visibility.iter().map(|w| w.slot().clone()).collect();
        let downlink: BTreeSet<SlotLabel> = downlinks.iter().map(|w| w.slot().clone()).collect();
        let combined: Vec<SlotLabel> = observation.union(&downlink).cloned().collect();

        Self {
            observation: observation.into_iter().collect(),
            downlink: downlink.into_iter().collect(),
            combined,
        }
    }

    pub fn observation_slots(&self) -> &[SlotLabel] {
        &self.observation
    }

    pub fn downlink_slots(&self) -> &[SlotLabel] {
        &self.downlink
    }

    pub fn combined_slots(&self) -> &[SlotLabel] {
        &self.combined
    }

    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }

    /// Combined slots in order, each paired with its predecessor. The first
    /// slot has no predecessor and seeds the resource recurrences.
    pub fn combined_with_predecessor(
        &self,
    ) -> impl Iterator<Item = (Option<&SlotLabel>, &SlotLabel)> + '_ {
        self.combined.iter().enumerate().map(|(i, slot)| {
            let prev = if i == 0 { None } else { Some(&self.combined[i - 1]) };
            (prev, slot)
        })
    }
}
