//! Review ratings.
use serde::{Deserialize, Serialize};

/// How well a card was recalled, from worst to best.
///
/// `Fail` and `Hard` send the card into a short relearn delay; `Good` and
/// `Easy` push it out on a day-scale interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    Fail = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Fail, Rating::Hard, Rating::Good, Rating::Easy];

    /// Numeric quality grade, as recorded in the review log.
    pub fn quality(self) -> u8 {
        self as u8
    }

    pub fn from_quality(quality: u8) -> Option<Rating> {
        match quality {
            0 => Some(Rating::Fail),
            1 => Some(Rating::Hard),
            2 => Some(Rating::Good),
            3 => Some(Rating::Easy),
            _ => None,
        }
    }

    /// Button label shown on the review screen.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Fail => "Fail",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratings_are_ordered_worst_to_best() {
        assert!(Rating::Fail < Rating::Hard);
        assert!(Rating::Hard < Rating::Good);
        assert!(Rating::Good < Rating::Easy);
    }

    #[test]
    fn test_quality_grades_match_log_values() {
        for (index, rating) in Rating::ALL.iter().enumerate() {
            assert_eq!(rating.quality() as usize, index);
            assert_eq!(Rating::from_quality(rating.quality()), Some(*rating));
        }
        assert_eq!(Rating::from_quality(4), None);
    }
}
