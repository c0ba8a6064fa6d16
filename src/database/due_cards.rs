//! Finding cards due for review
//!
//! Every card is scheduled from its own attempts, the results are sorted by next attempt
//! time (oldest first) and cut off at a reference time. The first card that cannot be
//! scheduled fails the whole batch.

use super::CardStore;
use crate::error::Result;
use crate::models::scheduler::{next_attempt_date_time, now};
use crate::models::{Attempt, Card, SchedulerConfig};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCard {
    pub card: Card,
    pub next_attempt: NaiveDateTime,
}

/// Schedules every card and sorts by next attempt time. Ties keep input order.
pub fn next_attempts_for_cards<I>(
    cards_with_attempts: I,
    config: &SchedulerConfig,
    now: NaiveDateTime,
) -> Result<Vec<DueCard>>
where
    I: IntoIterator<Item = (Card, Vec<Attempt>)>,
{
    let mut scheduled = Vec::new();
    for (card, attempts) in cards_with_attempts {
        let next_attempt = match next_attempt_date_time(&attempts, config, now) {
            Ok(next_attempt) => next_attempt,
            Err(e) => {
                tracing::warn!(card_id = %card.id, "failed to schedule card: {}", e);
                return Err(e);
            }
        };
        scheduled.push(DueCard { card, next_attempt });
    }

    scheduled.sort_by_key(|due| due.next_attempt);
    Ok(scheduled)
}

/// Cards due at or before `reference_time` (defaults to `now`), oldest first,
/// scheduled with the default configuration.
pub fn find_due<I>(
    cards_with_attempts: I,
    reference_time: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<Vec<DueCard>>
where
    I: IntoIterator<Item = (Card, Vec<Attempt>)>,
{
    find_due_with_config(
        cards_with_attempts,
        &SchedulerConfig::default(),
        reference_time,
        now,
    )
}

pub fn find_due_with_config<I>(
    cards_with_attempts: I,
    config: &SchedulerConfig,
    reference_time: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<Vec<DueCard>>
where
    I: IntoIterator<Item = (Card, Vec<Attempt>)>,
{
    let reference_time = reference_time.unwrap_or(now);
    let mut due = next_attempts_for_cards(cards_with_attempts, config, now)?;
    due.retain(|card| card.next_attempt <= reference_time);
    Ok(due)
}

/// Retrieves a user's cards due for review
///
/// Cards and attempts are read from the store on every call.
pub fn get_due_cards<S: CardStore>(
    store: &S,
    user_id: &str,
    reference_time: Option<NaiveDateTime>,
) -> Result<Vec<DueCard>> {
    let cards = store.read_all_cards(user_id)?;
    let mut cards_with_attempts = Vec::with_capacity(cards.len());
    for card in cards {
        let attempts = store.read_all_attempts_for_card(user_id, &card.id)?;
        cards_with_attempts.push((card, attempts));
    }

    let due = find_due(cards_with_attempts, reference_time, now())?;
    tracing::debug!(user_id, due = due.len(), "found due cards");
    Ok(due)
}
