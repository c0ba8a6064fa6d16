//! Pattern-based interval scheduler.
//!
//! The next attempt time depends only on the most recent answers:
//! - No attempts yet: due now
//! - Latest answer wrong: due again at the time of that answer
//! - A single correct answer: due after the minimum interval
//! - Two correct answers in a row: the gap between them, scaled up
//! - Correct after a lapse (correct, wrong, correct): the gap held before the lapse, scaled down
//! - Anything else is reported as an unscheduled pattern rather than guessed
//!
//! Scaled gaps are floored to whole units and never drop below the minimum interval.

use super::attempt_history::{AttemptHistory, Pattern};
use super::{Attempt, SchedulerConfig};
use crate::error::{Result, ScheduleError};
use chrono::{Local, NaiveDateTime, TimeDelta};

/// Current local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Calculates when a card with these attempts should next be presented.
/// `now` is returned for cards that were never attempted.
pub fn next_attempt_date_time(
    attempts: &[Attempt],
    config: &SchedulerConfig,
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    config.validate()?;
    let history = AttemptHistory::build(attempts, config.unit)?;
    let pattern = history.pattern();
    tracing::debug!(?pattern, attempts = history.len(), "scheduling card");

    match pattern {
        Pattern::NoHistory => Ok(now),
        Pattern::LastIncorrect { at } => Ok(at),
        Pattern::SingleCorrect { at } => add(at, config.min_add_on_correct),
        Pattern::TwoCorrect { at, gap } => {
            let interval = scaled_interval(gap, config.scaler_on_two_correct, config)?;
            add(at, interval)
        }
        Pattern::Recovery { at, gap } => {
            let interval = scaled_interval(gap, config.scaler_on_correct_wrong_correct, config)?;
            add(at, interval)
        }
        Pattern::Unmatched { count } => Err(ScheduleError::UnscheduledPattern { count }),
    }
}

/// `floor(gap * factor)` units, but at least `min_add_on_correct`.
fn scaled_interval(gap: f64, factor: f64, config: &SchedulerConfig) -> Result<TimeDelta> {
    let units = (gap * factor).floor();
    if !units.is_finite() || units < i64::MIN as f64 || units > i64::MAX as f64 {
        return Err(ScheduleError::OutOfRange);
    }
    let scaled = config
        .unit
        .duration(units as i64)
        .ok_or(ScheduleError::OutOfRange)?;

    Ok(scaled.max(config.min_add_on_correct))
}

fn add(at: NaiveDateTime, interval: TimeDelta) -> Result<NaiveDateTime> {
    at.checked_add_signed(interval)
        .ok_or(ScheduleError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeUnit;
    use chrono::NaiveDate;

    fn today() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap()
    }

    fn day(n: i64) -> NaiveDateTime {
        today() + TimeDelta::days(n)
    }

    /// Builds attempts from chronological `(day, correct)` pairs.
    fn history(days: &[(i64, bool)]) -> Vec<Attempt> {
        days.iter()
            .enumerate()
            .map(|(i, &(d, correct))| Attempt::at((i + 1).to_string(), "1", day(d), correct))
            .collect()
    }

    fn schedule(attempts: &[Attempt]) -> Result<NaiveDateTime> {
        next_attempt_date_time(attempts, &SchedulerConfig::default(), today())
    }

    #[test]
    fn test_no_attempts_is_due_now() {
        assert_eq!(schedule(&[]).unwrap(), today());
    }

    #[test]
    fn test_no_attempts_with_wall_clock() {
        let before = now();
        let next = next_attempt_date_time(&[], &SchedulerConfig::default(), now()).unwrap();
        assert!((next - before).num_seconds().abs() <= 1);
    }

    #[test]
    fn test_one_correct_attempt() {
        let attempts = history(&[(0, true)]);
        assert_eq!(schedule(&attempts).unwrap(), day(1));
    }

    #[test]
    fn test_one_incorrect_attempt() {
        let attempts = history(&[(1, false)]);
        assert_eq!(schedule(&attempts).unwrap(), day(1));
    }

    #[test]
    fn test_two_correct_attempts() {
        assert_eq!(schedule(&history(&[(0, true), (1, true)])).unwrap(), day(3));
        assert_eq!(schedule(&history(&[(0, true), (2, true)])).unwrap(), day(6));
    }

    #[test]
    fn test_two_incorrect_attempts() {
        let attempts = history(&[(0, false), (1, false)]);
        assert_eq!(schedule(&attempts).unwrap(), day(1));
    }

    #[test]
    fn test_correct_then_incorrect() {
        let attempts = history(&[(0, true), (1, false)]);
        assert_eq!(schedule(&attempts).unwrap(), day(1));
    }

    #[test]
    fn test_correct_incorrect_correct() {
        let attempts = history(&[(0, true), (2, false), (3, true)]);
        assert_eq!(schedule(&attempts).unwrap(), day(4));
    }

    #[test]
    fn test_correct_correct_incorrect() {
        let attempts = history(&[(0, true), (2, true), (3, false)]);
        assert_eq!(schedule(&attempts).unwrap(), day(3));
    }

    #[test]
    fn test_correct_incorrect_incorrect() {
        let attempts = history(&[(0, true), (2, false), (3, false)]);
        assert_eq!(schedule(&attempts).unwrap(), day(3));
    }

    #[test]
    fn test_incorrect_correct_correct() {
        let attempts = history(&[(0, false), (2, true), (3, true)]);
        assert_eq!(schedule(&attempts).unwrap(), day(5));
    }

    #[test]
    fn test_five_attempts_alternating() {
        let attempts = history(&[(0, true), (2, false), (3, true), (4, false), (5, true)]);
        assert_eq!(schedule(&attempts).unwrap(), day(6));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut attempts = history(&[(0, true), (2, false), (3, true)]);
        attempts.reverse();
        assert_eq!(schedule(&attempts).unwrap(), day(4));
    }

    #[test]
    fn test_floor_never_goes_below_minimum() {
        let attempts = vec![
            Attempt::at("1", "1", today(), true),
            Attempt::at("2", "1", today() + TimeDelta::hours(9) + TimeDelta::minutes(36), true),
        ];
        let config = SchedulerConfig::default().with_scaler_on_two_correct(1.0);
        let last = today() + TimeDelta::hours(9) + TimeDelta::minutes(36);

        let next = next_attempt_date_time(&attempts, &config, today()).unwrap();
        assert_eq!(next, last + TimeDelta::days(1));
    }

    #[test]
    fn test_floor_happens_after_scaling() {
        // 1.5 day gap * 3 = 4.5 days, floored to 4
        let attempts = vec![
            Attempt::at("1", "1", today(), true),
            Attempt::at("2", "1", today() + TimeDelta::hours(36), true),
        ];
        let config = SchedulerConfig::default().with_scaler_on_two_correct(3.0);
        let last = today() + TimeDelta::hours(36);

        let next = next_attempt_date_time(&attempts, &config, today()).unwrap();
        assert_eq!(next, last + TimeDelta::days(4));
    }

    #[test]
    fn test_hour_unit_compares_against_day_minimum() {
        // 10 hours * 2 = 20 hours, still under the 1 day minimum
        let attempts = vec![
            Attempt::at("1", "1", today(), true),
            Attempt::at("2", "1", today() + TimeDelta::hours(10), true),
        ];
        let config = SchedulerConfig::default().with_unit(TimeUnit::Hour);
        let last = today() + TimeDelta::hours(10);
        let next = next_attempt_date_time(&attempts, &config, today()).unwrap();
        assert_eq!(next, last + TimeDelta::days(1));

        // 20 hours * 2 = 40 hours
        let attempts = vec![
            Attempt::at("1", "1", today(), true),
            Attempt::at("2", "1", today() + TimeDelta::hours(20), true),
        ];
        let last = today() + TimeDelta::hours(20);
        let next = next_attempt_date_time(&attempts, &config, today()).unwrap();
        assert_eq!(next, last + TimeDelta::hours(40));
    }

    #[test]
    fn test_millisecond_gap_is_not_shortened_by_flooring() {
        let last = today() + TimeDelta::milliseconds(43);
        let attempts = vec![
            Attempt::at("1", "1", today(), true),
            Attempt::at("2", "1", last, true),
        ];
        let config = SchedulerConfig::default()
            .with_unit(TimeUnit::Millisecond)
            .with_scaler_on_two_correct(1.0)
            .with_min_add_on_correct(TimeDelta::zero());

        let next = next_attempt_date_time(&attempts, &config, today()).unwrap();
        assert_eq!(next, last + TimeDelta::milliseconds(43));
    }

    #[test]
    fn test_incorrect_ignores_config() {
        let attempts = history(&[(0, true), (4, false)]);
        let config = SchedulerConfig::default()
            .with_unit(TimeUnit::Minute)
            .with_scaler_on_two_correct(10.0)
            .with_min_add_on_correct(TimeDelta::weeks(2));
        assert_eq!(
            next_attempt_date_time(&attempts, &config, today()).unwrap(),
            day(4)
        );
    }

    #[test]
    fn test_incorrect_then_correct_is_unscheduled() {
        let attempts = history(&[(0, false), (1, true)]);
        assert!(matches!(
            schedule(&attempts),
            Err(ScheduleError::UnscheduledPattern { count: 2 })
        ));
    }

    #[test]
    fn test_wrong_wrong_correct_is_unscheduled() {
        let attempts = history(&[(0, false), (1, false), (2, true)]);
        assert!(matches!(
            schedule(&attempts),
            Err(ScheduleError::UnscheduledPattern { count: 3 })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SchedulerConfig::default().with_scaler_on_two_correct(f64::NAN);
        assert!(matches!(
            next_attempt_date_time(&[], &config, today()),
            Err(ScheduleError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        let attempts = history(&[(0, true), (1, true)]);
        let config = SchedulerConfig::default().with_scaler_on_two_correct(1e300);
        assert!(matches!(
            next_attempt_date_time(&attempts, &config, today()),
            Err(ScheduleError::OutOfRange)
        ));
    }
}
