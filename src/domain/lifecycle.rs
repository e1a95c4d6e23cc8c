use chrono::NaiveDate;

use crate::domain::day_count::inclusive_day_count;
use crate::error::ApiError;

/// Validates the user-supplied part of a new leave request and returns the
/// derived inclusive day count. Nothing is persisted on failure.
pub fn validate_new_request(
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
) -> Result<i64, ApiError> {
    if reason.trim().is_empty() {
        return Err(ApiError::validation("Reason must not be empty"));
    }

    if end_date < start_date {
        return Err(ApiError::validation("end_date cannot precede start_date"));
    }

    Ok(inclusive_day_count(start_date, end_date))
}

/// Decides whether a fetched leave type may back a new request. `fetched`
/// is `(is_active, max_days_per_year)` or None when the id matched no row.
/// Returns the cap for the yearly-cap rule.
pub fn check_leave_type(fetched: Option<(bool, Option<i64>)>) -> Result<Option<i64>, ApiError> {
    let (is_active, cap) = fetched.ok_or_else(|| ApiError::validation("Leave type not found"))?;

    if !is_active {
        return Err(ApiError::validation("Leave type is inactive"));
    }

    Ok(cap)
}

/// Yearly-cap rule, applied only when enabled in config and the leave type
/// carries a cap. `days_used` is the sum of pending + approved days the
/// employee already holds for this leave type in the calendar year.
pub fn check_yearly_cap(cap: i64, days_used: i64, requested: i64) -> Result<(), ApiError> {
    if days_used + requested > cap {
        return Err(ApiError::validation(format!(
            "Request exceeds the yearly cap of {cap} days ({days_used} already used, {requested} requested)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn valid_request_yields_inclusive_day_count() {
        let days = validate_new_request(d(2024, 6, 10), d(2024, 6, 12), "trip").unwrap();
        assert_eq!(days, 3);
    }

    #[test]
    fn single_day_request_is_valid() {
        let days = validate_new_request(d(2024, 6, 10), d(2024, 6, 10), "appointment").unwrap();
        assert_eq!(days, 1);
    }

    #[test]
    fn empty_reason_is_rejected() {
        let err = validate_new_request(d(2024, 6, 10), d(2024, 6, 12), "").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn whitespace_reason_is_rejected() {
        let err = validate_new_request(d(2024, 6, 10), d(2024, 6, 12), "   ").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn inverted_range_is_rejected_here_not_in_the_calculator() {
        let err = validate_new_request(d(2024, 6, 12), d(2024, 6, 10), "trip").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn missing_leave_type_is_rejected() {
        let err = check_leave_type(None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn inactive_leave_type_is_rejected() {
        let err = check_leave_type(Some((false, Some(20)))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn active_leave_type_yields_its_cap() {
        assert_eq!(check_leave_type(Some((true, Some(20)))).unwrap(), Some(20));
        assert_eq!(check_leave_type(Some((true, None))).unwrap(), None);
    }

    #[test]
    fn cap_allows_exact_fit() {
        assert!(check_yearly_cap(20, 17, 3).is_ok());
    }

    #[test]
    fn cap_rejects_overflow() {
        let err = check_yearly_cap(20, 18, 3).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
