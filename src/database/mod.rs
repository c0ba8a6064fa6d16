pub mod due_cards;
pub mod kv;

pub use due_cards::{
    DueCard, find_due, find_due_with_config, get_due_cards, next_attempts_for_cards,
};
pub use kv::{CardStore, KvStore};
