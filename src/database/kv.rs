//! Card store operations
//!
//! Users, cards and attempts live in an in-memory key-value map. Keys are path segments,
//! values are JSON documents:
//! - `users/<user>`
//! - `users/<user>/cards/<card>`
//! - `users/<user>/cardAttempts/<attempt>`
//!
//! Deleting a user removes their cards, deleting a card removes its attempts.

use crate::error::StoreError;
use crate::models::{Attempt, Card, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

type Key = Vec<String>;
type Result<T> = std::result::Result<T, StoreError>;

/// What the due-card finder needs from storage.
pub trait CardStore {
    fn read_all_cards(&self, user_id: &str) -> Result<Vec<Card>>;

    fn read_all_attempts_for_card(&self, user_id: &str, card_id: &str) -> Result<Vec<Attempt>>;
}

#[derive(Default)]
pub struct KvStore {
    entries: Mutex<BTreeMap<Key, Value>>,
}

fn users_path() -> Key {
    vec!["users".to_string()]
}

fn user_path(user_id: &str) -> Key {
    let mut key = users_path();
    key.push(user_id.to_string());
    key
}

fn cards_path(user_id: &str) -> Key {
    let mut key = user_path(user_id);
    key.push("cards".to_string());
    key
}

fn card_path(user_id: &str, card_id: &str) -> Key {
    let mut key = cards_path(user_id);
    key.push(card_id.to_string());
    key
}

fn attempts_path(user_id: &str) -> Key {
    let mut key = user_path(user_id);
    key.push("cardAttempts".to_string());
    key
}

fn attempt_path(user_id: &str, attempt_id: &str) -> Key {
    let mut key = attempts_path(user_id);
    key.push(attempt_id.to_string());
    key
}

fn new_id(id: &str) -> String {
    if id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

fn decode<T: DeserializeOwned>(key: &Key, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|source| StoreError::Corrupt {
        key: key.join("/"),
        source,
    })
}

fn encode<T: Serialize>(key: &Key, value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|source| StoreError::Corrupt {
        key: key.join("/"),
        source,
    })
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<Key, Value>>> {
        self.entries.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Stores `value` under `key` unless the key is already taken.
    fn insert_new<T: Serialize>(&self, key: Key, value: &T) -> Result<()> {
        let encoded = encode(&key, value)?;
        let mut entries = self.lock()?;
        if entries.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key.join("/")));
        }
        entries.insert(key, encoded);
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &Key) -> Result<Option<T>> {
        let entries = self.lock()?;
        entries.get(key).map(|value| decode(key, value)).transpose()
    }

    /// Values directly below `prefix`. Deeper keys (a user's cards under the user
    /// prefix, for example) are skipped.
    fn list<T: DeserializeOwned>(&self, prefix: &Key) -> Result<Vec<(Key, T)>> {
        self.list_matching(prefix, |_| true)
    }

    /// Like [`KvStore::list`], but only decodes the raw documents `keep` accepts.
    fn list_matching<T: DeserializeOwned>(
        &self,
        prefix: &Key,
        keep: impl Fn(&Value) -> bool,
    ) -> Result<Vec<(Key, T)>> {
        let entries = self.lock()?;
        entries
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(key, value)| key.len() == prefix.len() + 1 && keep(*value))
            .map(|(key, value)| decode(key, value).map(|decoded| (key.clone(), decoded)))
            .collect()
    }

    fn delete_prefix(&self, prefix: &Key) -> Result<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }

    /// Creates a user; an empty id is replaced with a fresh UUID.
    pub fn create_user(&self, user: User) -> Result<User> {
        let user = User {
            id: new_id(&user.id),
            ..user
        };
        self.insert_new(user_path(&user.id), &user)?;
        tracing::debug!(user_id = %user.id, "created user");
        Ok(user)
    }

    pub fn read_user(&self, user_id: &str) -> Result<Option<User>> {
        self.get(&user_path(user_id))
    }

    pub fn read_all_users(&self) -> Result<Vec<User>> {
        Ok(self
            .list(&users_path())?
            .into_iter()
            .map(|(_, user)| user)
            .collect())
    }

    /// Deletes a user with all their cards and attempts.
    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        let removed = self.delete_prefix(&user_path(user_id))?;
        tracing::debug!(user_id, removed, "deleted user");
        Ok(())
    }

    /// Creates a card for a user. Fails if a card with the same id exists.
    pub fn create_card(&self, user_id: &str, card: Card) -> Result<Card> {
        let card = Card {
            id: new_id(&card.id),
            ..card
        };
        self.insert_new(card_path(user_id, &card.id), &card)?;
        Ok(card)
    }

    pub fn read_card(&self, user_id: &str, card_id: &str) -> Result<Option<Card>> {
        self.get(&card_path(user_id, card_id))
    }

    /// Deletes a card and its attempts.
    pub fn delete_card(&self, user_id: &str, card_id: &str) -> Result<()> {
        self.delete_prefix(&card_path(user_id, card_id))?;
        self.delete_all_attempts_for_card(user_id, card_id)
    }

    pub fn delete_all_cards(&self, user_id: &str) -> Result<()> {
        for card in self.read_all_cards(user_id)? {
            self.delete_card(user_id, &card.id)?;
        }
        Ok(())
    }

    /// Records an attempt; an empty id is replaced with a fresh UUID.
    pub fn create_attempt(&self, user_id: &str, attempt: Attempt) -> Result<Attempt> {
        let attempt = Attempt {
            id: new_id(&attempt.id),
            ..attempt
        };
        self.insert_new(attempt_path(user_id, &attempt.id), &attempt)?;
        Ok(attempt)
    }

    pub fn read_attempt(&self, user_id: &str, attempt_id: &str) -> Result<Option<Attempt>> {
        self.get(&attempt_path(user_id, attempt_id))
    }

    /// All of a user's attempts, newest first.
    ///
    /// Attempts whose date does not parse are still listed, after the others, so they
    /// can be found and deleted. Scheduling reports them as `MalformedTimestamp`.
    pub fn read_all_attempts(&self, user_id: &str) -> Result<Vec<Attempt>> {
        let mut attempts: Vec<Attempt> = self
            .list(&attempts_path(user_id))?
            .into_iter()
            .map(|(_, attempt)| attempt)
            .collect();
        attempts.sort_by_key(|a| a.timestamp().ok());
        attempts.reverse();
        Ok(attempts)
    }

    pub fn delete_attempt(&self, user_id: &str, attempt_id: &str) -> Result<()> {
        self.delete_prefix(&attempt_path(user_id, attempt_id))?;
        Ok(())
    }

    pub fn delete_all_attempts(&self, user_id: &str) -> Result<()> {
        self.delete_prefix(&attempts_path(user_id))?;
        Ok(())
    }

    pub fn delete_all_attempts_for_card(&self, user_id: &str, card_id: &str) -> Result<()> {
        for attempt in self.read_all_attempts_for_card(user_id, card_id)? {
            self.delete_attempt(user_id, &attempt.id)?;
        }
        Ok(())
    }

    /// Removes every entry.
    pub fn reset(&self) -> Result<()> {
        let removed = self.delete_prefix(&Vec::new())?;
        tracing::info!(removed, "store reset");
        Ok(())
    }
}

impl CardStore for KvStore {
    fn read_all_cards(&self, user_id: &str) -> Result<Vec<Card>> {
        Ok(self
            .list(&cards_path(user_id))?
            .into_iter()
            .map(|(_, card)| card)
            .collect())
    }

    fn read_all_attempts_for_card(&self, user_id: &str, card_id: &str) -> Result<Vec<Attempt>> {
        let for_card = |value: &Value| value.get("cardId").and_then(Value::as_str) == Some(card_id);
        Ok(self
            .list_matching::<Attempt>(&attempts_path(user_id), for_card)?
            .into_iter()
            .map(|(_, attempt)| attempt)
            .collect())
    }
}
