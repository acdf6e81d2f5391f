//! Time-slot labels and the interval strings that carry them.
//!
//! Slots are opaque labels with a total lexical order after trimming. Window
//! records encode them as "`start – end`" interval strings; the en-dash is
//! the canonical separator, a hyphen is accepted as a fallback.

use crate::error::{ScheduleError, ScheduleResult};

crate::define_id_type!(SlotLabel);

/// A parsed slot interval: the start label indexes the scheduling decision,
/// the end label bounds the opportunity.
///
/// # Examples
///
/// ```
/// use eos_sched::models::SlotInterval;
///
/// let interval = SlotInterval::parse("08:00 – 09:00").unwrap();
/// assert_eq!(interval.start.as_str(), "08:00");
/// assert_eq!(interval.end.as_str(), "09:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SlotInterval {
    pub start: SlotLabel,
    pub end: SlotLabel,
}

impl SlotInterval {
    pub fn new(start: impl Into<SlotLabel>, end: impl Into<SlotLabel>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Split an interval string into its trimmed start and end labels.
    ///
    /// A missing separator or an empty side is a data-format error; it is
    /// never coerced into a one-sided interval.
    pub fn parse(raw: &str) -> ScheduleResult<Self> {
        match split_interval(raw) {
            Some((start, end)) => Ok(Self::new(start, end)),
            None => Err(ScheduleError::data_format(format!(
                "malformed slot interval '{}': expected 'start – end'",
                raw.trim()
            ))),
        }
    }
}

impl std::fmt::Display for SlotInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

/// Try the en-dash first: it is unambiguous, while a hyphen may also appear
/// inside date-like labels. The spaced hyphen form " - " is preferred over a
/// bare hyphen for the same reason.
fn split_interval(raw: &str) -> Option<(&str, &str)> {
    let candidates = [
        raw.split_once('–'),
        raw.split_once(" - "),
        raw.split_once('-'),
    ];
    for candidate in candidates {
        if let Some((lhs, rhs)) = candidate {
            let lhs = lhs.trim();
            let rhs = rhs.trim();
            if !lhs.is_empty() && !rhs.is_empty() {
                return Some((lhs, rhs));
            }
        }
    }
    None
}
