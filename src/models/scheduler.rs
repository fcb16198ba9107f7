//! Spaced repetition scheduling.
//!
//! A simplified SM-2 style formula over each card's interval and ease factor:
//! - `Fail`/`Hard`: reset the interval and requeue the card after a short
//!   relearn delay (5 or 10 minutes), lowering the ease factor
//! - `Good`/`Easy`: grow the interval, first through a fixed graduation step
//!   (1 or 4 days), afterwards by multiplying with the ease factor
//! - The ease factor never drops below 1.3, however often a card fails.
//!   There is no upper bound.

use chrono::{DateTime, Duration, Utc};

use super::{Card, Rating, due_date};

/// Ease factor assigned to new cards, and assumed for corrupt ones.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
/// Floor the ease factor is clamped to after every penalty.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Interval assigned to new cards, in days.
pub const INITIAL_INTERVAL_DAYS: i64 = 1;

const FAIL_RELEARN_MINUTES: i64 = 5;
const HARD_RELEARN_MINUTES: i64 = 10;
const FAIL_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.1;
const EASY_GRADUATION_DAYS: i64 = 4;

/// Reschedules `card` according to how well it was recalled at `now`.
///
/// Accepts any card: corrupt scheduling fields are replaced with their
/// defaults before the formula runs. The relearn delays deliberately land
/// minutes from `now` so a failed card comes back within the same session.
pub fn apply_rating(card: &mut Card, rating: Rating, now: DateTime<Utc>) {
    let ease = if card.ease_factor.is_finite() && card.ease_factor > 0.0 {
        card.ease_factor
    } else {
        INITIAL_EASE_FACTOR
    };
    let interval = card.interval_days.max(INITIAL_INTERVAL_DAYS);

    match rating {
        Rating::Fail | Rating::Hard => {
            let (delay_minutes, penalty) = if rating == Rating::Fail {
                (FAIL_RELEARN_MINUTES, FAIL_EASE_PENALTY)
            } else {
                (HARD_RELEARN_MINUTES, HARD_EASE_PENALTY)
            };

            card.interval_days = INITIAL_INTERVAL_DAYS;
            card.ease_factor = (ease - penalty).max(MIN_EASE_FACTOR);
            card.due_at = due_date::format(now + Duration::minutes(delay_minutes));
        }
        Rating::Good | Rating::Easy => {
            card.interval_days = if interval == INITIAL_INTERVAL_DAYS {
                // Graduation step out of the initial/relearn state: fixed,
                // not ease-scaled.
                if rating == Rating::Easy {
                    EASY_GRADUATION_DAYS
                } else {
                    INITIAL_INTERVAL_DAYS
                }
            } else {
                ((interval as f64 * ease).round() as i64).max(1)
            };
            card.ease_factor = if rating == Rating::Easy { ease + EASY_EASE_BONUS } else { ease };
            card.due_at = due_date::format(now + Duration::days(card.interval_days));

            // A successfully recalled card must land strictly in the future.
            // The relearn delay above is exempt: sitting near `now` is the
            // point of it.
            match due_date::parse(&card.due_at) {
                Some(due) if due > now => {}
                _ => card.due_at = due_date::format(now + Duration::days(1)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn card_with(interval_days: i64, ease_factor: f64) -> Card {
        Card {
            id: 1,
            front: "front".to_string(),
            back: "back".to_string(),
            due_at: String::new(),
            interval_days,
            ease_factor,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn due(card: &Card) -> DateTime<Utc> {
        due_date::parse(&card.due_at).expect("scheduler always writes a readable due time")
    }

    #[test]
    fn test_fail_resets_interval_and_requeues_in_five_minutes() {
        let now = noon();
        let mut card = card_with(10, 2.5);

        apply_rating(&mut card, Rating::Fail, now);

        assert_eq!(card.interval_days, 1);
        assert_eq!(due(&card), now + Duration::minutes(5));
        assert_eq!(card.ease_factor, 2.3);
    }

    #[test]
    fn test_hard_requeues_in_ten_minutes_with_smaller_penalty() {
        let now = noon();
        let mut card = card_with(10, 2.5);

        apply_rating(&mut card, Rating::Hard, now);

        assert_eq!(card.interval_days, 1);
        assert_eq!(due(&card), now + Duration::minutes(10));
        assert_eq!(card.ease_factor, 2.35);
    }

    #[test]
    fn test_ease_factor_never_drops_below_floor() {
        let now = noon();
        let mut card = card_with(1, 1.3);

        for _ in 0..5 {
            apply_rating(&mut card, Rating::Fail, now);
            assert!(card.ease_factor >= 1.3);
        }
        assert_eq!(card.ease_factor, 1.3);

        // A penalty that would cross the floor is clamped, not skipped.
        let mut card = card_with(1, 1.4);
        apply_rating(&mut card, Rating::Hard, now);
        assert_eq!(card.ease_factor, 1.3);
    }

    #[test]
    fn test_first_good_keeps_one_day_interval() {
        let now = noon();
        let mut card = card_with(1, 2.5);

        apply_rating(&mut card, Rating::Good, now);

        assert_eq!(card.interval_days, 1);
        assert_eq!(due(&card), now + Duration::days(1));
        assert_eq!(card.ease_factor, 2.5);
    }

    #[test]
    fn test_first_easy_graduates_to_four_days() {
        let now = noon();
        let mut card = card_with(1, 2.5);

        apply_rating(&mut card, Rating::Easy, now);

        assert_eq!(card.interval_days, 4);
        assert_eq!(due(&card), now + Duration::days(4));
        assert_eq!(card.ease_factor, 2.6);
    }

    #[test]
    fn test_established_good_scales_interval_by_ease() {
        let now = noon();
        let mut card = card_with(4, 2.5);

        apply_rating(&mut card, Rating::Good, now);

        assert_eq!(card.interval_days, 10);
        assert_eq!(due(&card), now + Duration::days(10));
        assert_eq!(card.ease_factor, 2.5);
    }

    #[test]
    fn test_easy_bumps_ease_after_scaling_interval() {
        let now = noon();
        let mut card = card_with(6, 2.5);

        apply_rating(&mut card, Rating::Easy, now);

        // Interval uses the ease before the bonus.
        assert_eq!(card.interval_days, 15);
        assert_eq!(card.ease_factor, 2.6);
    }

    #[test]
    fn test_corrupt_fields_fall_back_to_defaults() {
        let now = noon();

        let mut card = card_with(4, f64::NAN);
        apply_rating(&mut card, Rating::Good, now);
        assert_eq!(card.interval_days, 10);
        assert_eq!(card.ease_factor, 2.5);

        let mut card = card_with(0, -1.0);
        apply_rating(&mut card, Rating::Easy, now);
        assert_eq!(card.interval_days, 4);
        assert_eq!(card.ease_factor, 2.6);
    }

    #[test]
    fn test_progression_always_lands_strictly_in_the_future() {
        let now = noon();

        // Degenerate ease rounds the interval down to zero days; the result
        // is still pushed at least a day out.
        let mut card = card_with(2, 0.2);
        apply_rating(&mut card, Rating::Good, now);
        assert!(card.interval_days >= 1);
        assert!(due(&card) > now);
    }

    #[test]
    fn test_relearn_delay_stays_within_the_session() {
        let now = noon();

        let mut card = card_with(30, 2.0);
        apply_rating(&mut card, Rating::Fail, now);
        let due_at = due(&card);
        assert!(due_at > now && due_at <= now + Duration::minutes(5));

        let mut card = card_with(30, 2.0);
        apply_rating(&mut card, Rating::Hard, now);
        let due_at = due(&card);
        assert!(due_at > now && due_at <= now + Duration::minutes(10));
    }
}
