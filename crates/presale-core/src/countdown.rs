//! Presale countdown

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time remaining until a target instant, split into display units.
///
/// All fields are zero once less than a second remains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_millis((target - now).num_milliseconds())
    }

    /// Floor a millisecond difference into units; non-positive input yields zero
    pub fn from_millis(diff_ms: i64) -> Self {
        if diff_ms <= 0 {
            return Self::default();
        }

        Self {
            days: diff_ms / MS_PER_DAY,
            hours: (diff_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (diff_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (diff_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn is_expired(&self) -> bool {
        *self == Self::default()
    }
}
