//! Tunable constants of the interval scheduler.
//!
//! Configuration is passed on every call; nothing is kept between calls. Every field may
//! be omitted when deserializing, in which case the default applies:
//!
//! ```json
//! { "unit": "hour", "minAddOnCorrect": 3600, "scalerOnTwoCorrect": 2.5 }
//! ```

use super::TimeUnit;
use crate::error::{Result, ScheduleError};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Unit in which gaps are measured and scaled intervals are floored.
    pub unit: TimeUnit,
    /// Smallest interval added after a correct answer. Serialized as whole seconds.
    #[serde(with = "duration_seconds")]
    pub min_add_on_correct: TimeDelta,
    /// Multiplier for the gap between two consecutive correct answers.
    pub scaler_on_two_correct: f64,
    /// Multiplier for the retained gap before a correct, wrong, correct recovery.
    pub scaler_on_correct_wrong_correct: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            unit: TimeUnit::Day,
            min_add_on_correct: TimeDelta::days(1),
            scaler_on_two_correct: 2.0,
            scaler_on_correct_wrong_correct: 0.5,
        }
    }
}

impl SchedulerConfig {
    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_min_add_on_correct(mut self, min: TimeDelta) -> Self {
        self.min_add_on_correct = min;
        self
    }

    pub fn with_scaler_on_two_correct(mut self, scaler: f64) -> Self {
        self.scaler_on_two_correct = scaler;
        self
    }

    pub fn with_scaler_on_correct_wrong_correct(mut self, scaler: f64) -> Self {
        self.scaler_on_correct_wrong_correct = scaler;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_add_on_correct < TimeDelta::zero() {
            return Err(ScheduleError::InvalidConfig(
                "minAddOnCorrect must not be negative".to_string(),
            ));
        }
        if !self.scaler_on_two_correct.is_finite() {
            return Err(ScheduleError::InvalidConfig(format!(
                "scalerOnTwoCorrect must be finite, got {}",
                self.scaler_on_two_correct
            )));
        }
        if !self.scaler_on_correct_wrong_correct.is_finite() {
            return Err(ScheduleError::InvalidConfig(format!(
                "scalerOnCorrectWrongCorrect must be finite, got {}",
                self.scaler_on_correct_wrong_correct
            )));
        }
        Ok(())
    }
}

mod duration_seconds {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(delta.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(seconds)
            .ok_or_else(|| D::Error::custom(format!("{seconds} seconds is out of range")))
    }
}
