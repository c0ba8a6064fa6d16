//! Error types for scheduling, the card store and seed loading.

use thiserror::Error;

/// Errors that can occur while computing next attempt times.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// An attempt carries a timestamp that is not a civil date-time.
    #[error("malformed timestamp {value:?} on attempt {attempt_id}")]
    MalformedTimestamp { attempt_id: String, value: String },

    /// The attempt history matches none of the scheduling rules.
    #[error("no scheduling rule matches a history of {count} attempts")]
    UnscheduledPattern { count: usize },

    /// The scheduler configuration cannot be used.
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    /// The computed interval or timestamp is outside chrono's range.
    #[error("next attempt time is out of range")]
    OutOfRange,

    /// The card store failed to deliver cards or attempts.
    #[error("card store error: {0}")]
    Collaborator(#[from] StoreError),
}

/// Errors raised by the key-value card store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key already exists: {0}")]
    AlreadyExists(String),

    #[error("stored value at {key} could not be decoded: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Errors raised while loading seed files.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
