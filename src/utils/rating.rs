use serde::Serialize;

/// Sentinel shown when a user has no ratings. Never rendered as 0.
pub const NO_RATINGS: &str = "No ratings yet";
/// Sentinel shown when the aggregate could not be computed.
pub const RATING_ERROR: &str = "Error";

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Arithmetic mean of the raw values; `None` for an empty set.
pub fn average(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: i64 = values.iter().map(|&v| v as i64).sum();
    Some(total as f64 / values.len() as f64)
}

/// Two-decimal display form of an aggregate, or the no-ratings sentinel.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.2}", avg),
        None => NO_RATINGS.to_string(),
    }
}

/// Fill state of one of the five display glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StarFill {
    Full,
    Half,
    Empty,
}

/// Break an average into five glyphs: the integer part fills whole stars, a
/// fractional remainder of at least 0.5 fills a half star, the rest stay
/// empty.
pub fn star_breakdown(average: f64) -> [StarFill; 5] {
    let full = average.floor() as usize;
    let has_half = average.fract() >= 0.5;

    let mut stars = [StarFill::Empty; 5];
    for (i, star) in stars.iter_mut().enumerate() {
        if i < full {
            *star = StarFill::Full;
        } else if i == full && has_half {
            *star = StarFill::Half;
        }
    }
    stars
}

#[cfg(test)]
mod tests {
    use super::*;
    use StarFill::{Empty, Full, Half};

    #[test]
    fn empty_set_has_no_average() {
        assert_eq!(average(&[]), None);
        assert_eq!(format_average(None), NO_RATINGS);
    }

    #[test]
    fn mean_is_formatted_to_two_decimals() {
        assert_eq!(format_average(average(&[4, 5, 3])), "4.00");
        assert_eq!(format_average(average(&[4, 5])), "4.50");
        assert_eq!(format_average(average(&[1, 1, 2])), "1.33");
    }

    #[test]
    fn single_rating_is_its_own_average() {
        assert_eq!(format_average(average(&[5])), "5.00");
    }

    #[test]
    fn whole_values_fill_whole_stars() {
        assert_eq!(star_breakdown(3.0), [Full, Full, Full, Empty, Empty]);
        assert_eq!(star_breakdown(5.0), [Full; 5]);
    }

    #[test]
    fn remainder_of_half_or_more_fills_a_half_star() {
        assert_eq!(star_breakdown(3.5), [Full, Full, Full, Half, Empty]);
        assert_eq!(star_breakdown(4.75), [Full, Full, Full, Full, Half]);
    }

    #[test]
    fn remainder_below_half_leaves_the_star_empty() {
        assert_eq!(star_breakdown(3.49), [Full, Full, Full, Empty, Empty]);
        assert_eq!(star_breakdown(0.2), [Empty; 5]);
    }
}
