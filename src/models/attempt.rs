//! A single recorded answer for a card.
use crate::error::{Result, ScheduleError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format used when writing attempt timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const ACCEPTED_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// One answer event. Attempts are never mutated once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub card_id: String,
    /// Civil date-time without a timezone, as recorded.
    pub date: String,
    pub correct: bool,
}

impl Attempt {
    pub fn at(
        id: impl Into<String>,
        card_id: impl Into<String>,
        date: NaiveDateTime,
        correct: bool,
    ) -> Self {
        Self {
            id: id.into(),
            card_id: card_id.into(),
            date: format_timestamp(date),
            correct,
        }
    }

    /// Parses the recorded date.
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        parse_timestamp(&self.date).ok_or_else(|| ScheduleError::MalformedTimestamp {
            attempt_id: self.id.clone(),
            value: self.date.clone(),
        })
    }
}

pub fn format_timestamp(date: NaiveDateTime) -> String {
    date.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses an ISO-8601-like civil date-time. A bare date means midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
