//! Newest-first view over one card's attempts.
//!
//! The history is rebuilt from scratch for every scheduling call:
//! - Attempts are sorted ascending by timestamp with a stable sort, then reversed
//! - Gaps between neighbouring attempts are measured in the configured unit
//! - Positional features are `None` whenever the history is too short to define them

use super::{Attempt, TimeUnit};
use crate::error::Result;
use chrono::NaiveDateTime;

#[derive(Clone, Copy, Debug)]
struct Entry<'a> {
    attempt: &'a Attempt,
    timestamp: NaiveDateTime,
}

/// Which scheduling rule an attempt history falls under, derived once per history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pattern {
    /// No attempts have been recorded.
    NoHistory,
    /// The most recent attempt was answered incorrectly.
    LastIncorrect { at: NaiveDateTime },
    /// A single attempt, answered correctly.
    SingleCorrect { at: NaiveDateTime },
    /// The two most recent attempts were correct, `gap` apart.
    TwoCorrect { at: NaiveDateTime, gap: f64 },
    /// Correct, wrong, correct (newest first). `gap` is how long the item was retained
    /// before the lapse.
    Recovery { at: NaiveDateTime, gap: f64 },
    /// Latest attempt correct, but the history before it fits no rule.
    Unmatched { count: usize },
}

#[derive(Clone, Debug)]
pub struct AttemptHistory<'a> {
    entries: Vec<Entry<'a>>,
    gaps: Vec<f64>,
    unit: TimeUnit,
}

impl<'a> AttemptHistory<'a> {
    /// Sorts `attempts` newest-first and derives the gaps between them in `unit`.
    pub fn build(attempts: &'a [Attempt], unit: TimeUnit) -> Result<Self> {
        let entries = sorted_entries(attempts)?;
        let timestamps: Vec<NaiveDateTime> = entries.iter().map(|e| e.timestamp).collect();
        let gaps = gaps_between(&timestamps, unit);

        Ok(Self {
            entries,
            gaps,
            unit,
        })
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gaps between neighbouring attempts, newest pair first.
    pub fn gaps(&self) -> &[f64] {
        &self.gaps
    }

    /// Attempts, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Attempt> + '_ {
        self.entries.iter().map(|e| e.attempt)
    }

    pub fn most_recent_timestamp(&self) -> Option<NaiveDateTime> {
        self.entries.first().map(|e| e.timestamp)
    }

    pub fn most_recent_correct(&self) -> Option<bool> {
        self.entries.first().map(|e| e.attempt.correct)
    }

    pub fn gap_between_two_most_recent(&self) -> Option<f64> {
        self.gaps.first().copied()
    }

    pub fn last_two_both_correct(&self) -> Option<bool> {
        match self.entries.as_slice() {
            [first, second, ..] => Some(first.attempt.correct && second.attempt.correct),
            _ => None,
        }
    }

    pub fn last_three_correct_wrong_correct(&self) -> Option<bool> {
        match self.entries.as_slice() {
            [first, second, third, ..] => {
                Some(first.attempt.correct && !second.attempt.correct && third.attempt.correct)
            }
            _ => None,
        }
    }

    /// Gap between the wrong answer and the correct one before it, when the three most
    /// recent attempts are correct, wrong, correct.
    pub fn gap_before_recovery_wrong(&self) -> Option<f64> {
        match self.last_three_correct_wrong_correct() {
            Some(true) => self.gaps.get(1).copied(),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Pattern {
        let (at, correct) = match self.entries.first() {
            None => return Pattern::NoHistory,
            Some(entry) => (entry.timestamp, entry.attempt.correct),
        };

        if !correct {
            return Pattern::LastIncorrect { at };
        }
        if self.len() == 1 {
            return Pattern::SingleCorrect { at };
        }

        if let (Some(true), Some(gap)) =
            (self.last_two_both_correct(), self.gap_between_two_most_recent())
        {
            return Pattern::TwoCorrect { at, gap };
        }

        match self.gap_before_recovery_wrong() {
            Some(gap) => Pattern::Recovery { at, gap },
            None => Pattern::Unmatched { count: self.len() },
        }
    }
}

fn sorted_entries(attempts: &[Attempt]) -> Result<Vec<Entry<'_>>> {
    let mut entries = attempts
        .iter()
        .map(|attempt| {
            attempt
                .timestamp()
                .map(|timestamp| Entry { attempt, timestamp })
        })
        .collect::<Result<Vec<_>>>()?;

    // Stable ascending sort, then reverse: ties come out in reverse input order.
    entries.sort_by_key(|e| e.timestamp);
    entries.reverse();
    Ok(entries)
}

/// Returns `attempts` ordered newest first without touching the input.
pub fn sort_attempts(attempts: &[Attempt]) -> Result<Vec<&Attempt>> {
    Ok(sorted_entries(attempts)?
        .into_iter()
        .map(|e| e.attempt)
        .collect())
}

/// Gaps between neighbouring timestamps of a newest-first sequence, in `unit`.
pub fn gaps_between(timestamps: &[NaiveDateTime], unit: TimeUnit) -> Vec<f64> {
    timestamps
        .windows(2)
        .map(|pair| unit.total(pair[0] - pair[1]))
        .collect()
}
