//! JSON seed files for the card store.
//! A seed describes one user with their cards and each card's attempts.

use crate::database::KvStore;
use crate::error::{ScheduleError, SeedError};
use crate::models::attempt::parse_timestamp;
use crate::models::{Attempt, Card, User};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Seed {
    pub user: User,
    #[serde(default)]
    pub cards: Vec<SeedCard>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedCard {
    #[serde(flatten)]
    pub card: Card,
    #[serde(default)]
    pub attempts: Vec<SeedAttempt>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedAttempt {
    #[serde(default)]
    pub id: String,
    pub date: String,
    pub correct: bool,
}

impl SeedAttempt {
    fn timestamp(&self) -> Result<NaiveDateTime, ScheduleError> {
        parse_timestamp(&self.date).ok_or_else(|| ScheduleError::MalformedTimestamp {
            attempt_id: self.id.clone(),
            value: self.date.clone(),
        })
    }
}

impl Seed {
    /// Creates the user, cards and attempts in `store`. Dates are checked before anything
    /// is written, so a seed with a malformed date leaves the store untouched.
    pub fn load_into(&self, store: &KvStore) -> Result<User, SeedError> {
        let dates = self
            .cards
            .iter()
            .map(|seed_card| {
                seed_card
                    .attempts
                    .iter()
                    .map(SeedAttempt::timestamp)
                    .collect::<Result<Vec<NaiveDateTime>, _>>()
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;

        let user = store.create_user(self.user.clone())?;
        for (seed_card, dates) in self.cards.iter().zip(dates) {
            let card = store.create_card(&user.id, seed_card.card.clone())?;
            for (attempt, date) in seed_card.attempts.iter().zip(dates) {
                let attempt =
                    Attempt::at(attempt.id.clone(), card.id.clone(), date, attempt.correct);
                store.create_attempt(&user.id, attempt)?;
            }
        }

        tracing::info!(user = %user.name, cards = self.cards.len(), "seed loaded");
        Ok(user)
    }
}

pub fn parse_seed(json: &str) -> Result<Seed, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a seed from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(path: impl AsRef<Path>) -> Result<Seed, SeedError> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let seed = parse_seed(&contents)?;
    tracing::debug!(path = %path.as_ref().display(), cards = seed.cards.len(), "seed imported");
    Ok(seed)
}
