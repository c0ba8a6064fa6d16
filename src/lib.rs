pub mod database;
pub mod error;
pub mod models;
pub mod seed;

pub use database::{CardStore, DueCard, KvStore, get_due_cards};
pub use error::{ScheduleError, SeedError, StoreError};
pub use models::scheduler::next_attempt_date_time;
pub use models::{Attempt, AttemptHistory, Card, SchedulerConfig, TimeUnit, User};
