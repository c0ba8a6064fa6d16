pub mod json;

pub use json::{Seed, SeedAttempt, SeedCard, import_json, parse_seed};
