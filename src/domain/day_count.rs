use chrono::NaiveDate;

/// Inclusive day count between two calendar dates.
///
/// Magnitude-based: `inclusive_day_count(a, b) == inclusive_day_count(b, a)`
/// and a single day counts as 1. Date-only arithmetic, so the result never
/// drifts with timezones. Rejecting inverted ranges is the caller's job;
/// this function never errors.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_day_counts_as_one() {
        assert_eq!(inclusive_day_count(d(2024, 6, 10), d(2024, 6, 10)), 1);
    }

    #[test]
    fn span_is_inclusive_of_both_endpoints() {
        assert_eq!(inclusive_day_count(d(2024, 6, 10), d(2024, 6, 12)), 3);
    }

    #[test]
    fn magnitude_based_for_inverted_input() {
        assert_eq!(inclusive_day_count(d(2024, 6, 12), d(2024, 6, 10)), 3);
        assert_eq!(
            inclusive_day_count(d(2024, 6, 10), d(2024, 6, 12)),
            inclusive_day_count(d(2024, 6, 12), d(2024, 6, 10)),
        );
    }

    #[test]
    fn spans_month_and_year_boundaries() {
        assert_eq!(inclusive_day_count(d(2024, 1, 31), d(2024, 2, 1)), 2);
        assert_eq!(inclusive_day_count(d(2023, 12, 30), d(2024, 1, 2)), 4);
    }

    #[test]
    fn counts_leap_day() {
        assert_eq!(inclusive_day_count(d(2024, 2, 28), d(2024, 3, 1)), 3);
        assert_eq!(inclusive_day_count(d(2023, 2, 28), d(2023, 3, 1)), 2);
    }
}
