use crate::error::{ScheduleError, ScheduleResult};

crate::define_id_type!(TargetId);

/// Priority tier derived from a target's weighted value, used by coverage
/// reporting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// Tier thresholds on weighted value: ≥ 30 is High, ≥ 15 is Medium.
    pub fn from_weighted_value(value: f64) -> Self {
        if value >= 30.0 {
            PriorityTier::High
        } else if value >= 15.0 {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        }
    }
}

/// An observation target on the ground.
///
/// Urgency and importance are both positive weights; their product is the
/// weighted value the objective maximizes per covered target.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub urgency: f64,
    pub importance: f64,
}

impl Target {
    pub fn weighted_value(&self) -> f64 {
        self.urgency * self.importance
    }

    pub fn priority_tier(&self) -> PriorityTier {
        PriorityTier::from_weighted_value(self.weighted_value())
    }

    /// Record-level invariants, checked at catalog insertion.
    pub fn validate(&self) -> ScheduleResult<()> {
        if !(self.urgency > 0.0) {
            return Err(ScheduleError::data_format(format!(
                "target {}: urgency must be positive, got {}",
                self.id, self.urgency
            )));
        }
        if !(self.importance > 0.0) {
            return Err(ScheduleError::data_format(format!(
                "target {}: importance must be positive, got {}",
                self.id, self.importance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(urgency: f64, importance: f64) -> Target {
        Target {
            id: TargetId::from("TGT-9"),
            latitude_deg: 41.2,
            longitude_deg: 2.1,
            urgency,
            importance,
        }
    }

    #[test]
    fn weighted_value_is_the_product_of_weights() {
        assert_eq!(target(4.0, 7.5).weighted_value(), 30.0);
    }

    #[test]
    fn tier_thresholds_cover_boundaries() {
        let cases = [
            (30.0, PriorityTier::High),
            (29.9, PriorityTier::Medium),
            (15.0, PriorityTier::Medium),
            (14.9, PriorityTier::Low),
            (1.0, PriorityTier::Low),
        ];
        for (value, expected) in cases {
            assert_eq!(PriorityTier::from_weighted_value(value), expected);
        }
    }

    #[test]
    fn rejects_non_positive_weights() {
        assert!(target(0.0, 5.0).validate().is_err());
        assert!(target(5.0, -1.0).validate().is_err());
        assert!(target(5.0, 5.0).validate().is_ok());
    }
}
