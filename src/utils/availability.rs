use chrono::{DateTime, Utc};

/// Two half-open ranges overlap when each starts before the other ends.
pub fn ranges_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether `[inner_start, inner_end]` lies entirely inside `[outer_start, outer_end]`.
pub fn range_contains(
    outer_start: DateTime<Utc>,
    outer_end: DateTime<Utc>,
    inner_start: DateTime<Utc>,
    inner_end: DateTime<Utc>,
) -> bool {
    outer_start <= inner_start && inner_end <= outer_end
}

/// Validate the availability set submitted with a new spot.
///
/// Rules: the set must be non-empty, every range must have start < end, start
/// in the future relative to `now`, and no two ranges may overlap. A range
/// with a missing endpoint never reaches this function; the request type
/// requires both instants.
pub fn validate_ranges(
    now: DateTime<Utc>,
    ranges: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Result<(), String> {
    if ranges.is_empty() {
        return Err("At least one availability range is required".to_string());
    }

    for &(start, end) in ranges {
        if start >= end {
            return Err("Availability range start must be before its end".to_string());
        }
        if start < now {
            return Err("Availability ranges must start in the future".to_string());
        }
    }

    for (i, &(a_start, a_end)) in ranges.iter().enumerate() {
        for &(b_start, b_end) in &ranges[i + 1..] {
            if ranges_overlap(a_start, a_end, b_start, b_end) {
                return Err("Availability ranges must not overlap".to_string());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn overlap_detection() {
        assert!(ranges_overlap(t(1), t(3), t(2), t(4)));
        assert!(ranges_overlap(t(2), t(4), t(1), t(3)));
        // Touching endpoints do not overlap
        assert!(!ranges_overlap(t(1), t(2), t(2), t(3)));
        assert!(!ranges_overlap(t(1), t(2), t(3), t(4)));
    }

    #[test]
    fn containment() {
        assert!(range_contains(t(1), t(5), t(2), t(4)));
        assert!(range_contains(t(1), t(5), t(1), t(5)));
        assert!(!range_contains(t(1), t(5), t(0), t(4)));
        assert!(!range_contains(t(1), t(5), t(2), t(6)));
    }

    #[test]
    fn empty_set_is_rejected() {
        assert!(validate_ranges(t(0), &[]).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(validate_ranges(t(0), &[(t(3), t(2))]).is_err());
    }

    #[test]
    fn past_start_is_rejected() {
        assert!(validate_ranges(t(2), &[(t(1), t(3))]).is_err());
    }

    #[test]
    fn overlapping_ranges_are_rejected() {
        assert!(validate_ranges(t(0), &[(t(1), t(3)), (t(2), t(4))]).is_err());
    }

    #[test]
    fn disjoint_future_ranges_are_accepted() {
        assert!(validate_ranges(t(0), &[(t(1), t(2)), (t(3), t(4))]).is_ok());
    }
}
