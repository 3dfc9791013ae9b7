// Schedule model for worker triggers

use crate::errors::ScheduleError;
use serde::{Deserialize, Serialize};

/// Interval used by traffic driver triggers
pub const TRAFFIC_TICK_SECONDS: u32 = 60;

/// Schedule defines when a trigger fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    FixedRate { interval_seconds: u32 },
}

impl Schedule {
    /// Fixed-rate schedule ticking once a minute
    pub fn every_minute() -> Self {
        Schedule::FixedRate {
            interval_seconds: TRAFFIC_TICK_SECONDS,
        }
    }

    pub fn interval_seconds(&self) -> u32 {
        match self {
            Schedule::FixedRate { interval_seconds } => *interval_seconds,
        }
    }

    /// Render the schedule as a rate expression, e.g. `rate(1 minute)`
    ///
    /// Rate expressions have minute granularity, so the interval must be a
    /// positive whole number of minutes.
    pub fn rate_expression(&self) -> Result<String, ScheduleError> {
        let seconds = self.interval_seconds();
        if seconds == 0 {
            return Err(ScheduleError::InvalidConfiguration(
                "interval_seconds must be greater than 0".to_string(),
            ));
        }
        if seconds % 60 != 0 {
            return Err(ScheduleError::InvalidConfiguration(format!(
                "interval_seconds must be a whole number of minutes, got {}",
                seconds
            )));
        }

        let minutes = seconds / 60;
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        Ok(format!("rate({} {})", minutes, unit))
    }
}
