//! Aging filter: decides whether a file is old enough to act on.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::StatError;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Age threshold of a folder policy. All components default to 0.
///
/// An all-zero threshold makes every matching file eligible immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeThreshold {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl AgeThreshold {
    pub fn new(days: u64, hours: u64, minutes: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    /// Total threshold as a duration, saturating on overflow.
    pub fn as_duration(&self) -> Duration {
        let secs = self
            .days
            .saturating_mul(SECS_PER_DAY)
            .saturating_add(self.hours.saturating_mul(SECS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECS_PER_MINUTE));
        Duration::from_secs(secs)
    }
}

impl fmt::Display for AgeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

/// Whether a file modified at `modified` is stale at `now`.
///
/// Strict: a file exactly `threshold` old is not yet stale. A modification
/// time later than `now` is never stale.
pub fn is_stale(modified: SystemTime, now: SystemTime, threshold: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age > threshold,
        Err(_) => false,
    }
}

/// Current modification time of `path`.
pub fn modification_time(path: &Path) -> Result<SystemTime, StatError> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|source| StatError {
            path: path.to_path_buf(),
            source,
        })
}
