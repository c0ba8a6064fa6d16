pub mod attempt;
pub mod attempt_history;
pub mod card;
pub mod config;
pub mod scheduler;
pub mod time_unit;
pub mod user;

pub use attempt::Attempt;
pub use attempt_history::{AttemptHistory, Pattern};
pub use card::{Card, CardType};
pub use config::SchedulerConfig;
pub use time_unit::TimeUnit;
pub use user::User;
