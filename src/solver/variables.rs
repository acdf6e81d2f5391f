//! Decision-variable arena and the composite keys that index it.
//!
//! Variables are owned by one model and addressed by dense `VarId`s rather
//! than ambient maps keyed on tuples. The keyed lookup maps on the model
//! hold only sparse, materialized entries: a key exists exactly when a
//! window record made the combination eligible.

use serde::{Deserialize, Serialize};

use crate::models::{GroundStationId, SatelliteId, SlotLabel, TargetId};

/// Index of a variable in its model's arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VarId(pub u32);

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Binary,
    Continuous,
}

/// A single decision variable: name, kind and bounds. Continuous variables
/// may carry `f64::INFINITY` as their upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

/// Arena of variables. Ids are assigned in insertion order, so a model
/// built the same way twice assigns the same ids.
#[derive(Debug, Clone, Default)]
pub struct VariablePool {
    defs: Vec<VariableDef>,
}

impl VariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, kind: VarKind, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.defs.len() as u32);
        self.defs.push(VariableDef {
            name: name.into(),
            kind,
            lower,
            upper,
        });
        id
    }

    pub fn binary(&mut self, name: impl Into<String>) -> VarId {
        self.add(name, VarKind::Binary, 0.0, 1.0)
    }

    pub fn continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add(name, VarKind::Continuous, lower, upper)
    }

    pub fn get(&self, id: VarId) -> Option<&VariableDef> {
        self.defs.get(id.0 as usize)
    }

    /// Definition of an id minted by this pool. Ids never outlive their
    /// pool, so the lookup is infallible for well-formed callers.
    pub fn def(&self, id: VarId) -> &VariableDef {
        &self.defs[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &VariableDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (VarId(i as u32), def))
    }
}

/// Key of an observation indicator: (satellite, target, slot).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObservationKey {
    pub satellite: SatelliteId,
    pub target: TargetId,
    pub slot: SlotLabel,
}

impl ObservationKey {
    pub fn new(
        satellite: impl Into<SatelliteId>,
        target: impl Into<TargetId>,
        slot: impl Into<SlotLabel>,
    ) -> Self {
        Self {
            satellite: satellite.into(),
            target: target.into(),
            slot: slot.into(),
        }
    }
}

/// Key of a downlink indicator and its paired volume variable:
/// (satellite, station, slot).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DownlinkKey {
    pub satellite: SatelliteId,
    pub station: GroundStationId,
    pub slot: SlotLabel,
}

impl DownlinkKey {
    pub fn new(
        satellite: impl Into<SatelliteId>,
        station: impl Into<GroundStationId>,
        slot: impl Into<SlotLabel>,
    ) -> Self {
        Self {
            satellite: satellite.into(),
            station: station.into(),
            slot: slot.into(),
        }
    }
}

/// Key of a memory or power level variable: (satellite, combined slot).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LevelKey {
    pub satellite: SatelliteId,
    pub slot: SlotLabel,
}

impl LevelKey {
    pub fn new(satellite: impl Into<SatelliteId>, slot: impl Into<SlotLabel>) -> Self {
        Self {
            satellite: satellite.into(),
            slot: slot.into(),
        }
    }
}

/// Sanitize an id or slot label for use inside a variable or constraint
/// name: colons are dropped, dash and space variants become underscores.
pub fn name_token(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            ':' => None,
            '-' | '–' | ' ' => Some('_'),
            other => Some(other),
        })
        .collect()
}
