use crate::model::leave_request::{LeaveRequestDetail, LeaveStatus};

/// Other approved requests in the target's department whose date range
/// overlaps the target's (closed intervals). Advisory only; it is shown to
/// a reviewing manager and never blocks a decision.
pub fn find_conflicts<'a>(
    target: &LeaveRequestDetail,
    candidates: &'a [LeaveRequestDetail],
) -> Vec<&'a LeaveRequestDetail> {
    candidates
        .iter()
        .filter(|other| {
            other.id != target.id
                && other.status == LeaveStatus::Approved
                && other.department == target.department
                && other.start_date <= target.end_date
                && other.end_date >= target.start_date
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn approved(id: u64, dept: Option<&str>, start: NaiveDate, end: NaiveDate) -> LeaveRequestDetail {
        LeaveRequestDetail::fixture(id, id, dept, LeaveStatus::Approved, start, end)
    }

    #[test]
    fn overlapping_approved_same_department_conflicts() {
        let a = approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12));
        let b = approved(2, Some("Eng"), d(2024, 6, 11), d(2024, 6, 15));
        let set = vec![
            approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12)),
            approved(2, Some("Eng"), d(2024, 6, 11), d(2024, 6, 15)),
        ];

        let for_a: Vec<u64> = find_conflicts(&a, &set).iter().map(|r| r.id).collect();
        let for_b: Vec<u64> = find_conflicts(&b, &set).iter().map(|r| r.id).collect();
        assert_eq!(for_a, vec![2]);
        assert_eq!(for_b, vec![1]);
    }

    #[test]
    fn touching_endpoints_still_overlap() {
        let a = approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12));
        let set = vec![approved(2, Some("Eng"), d(2024, 6, 12), d(2024, 6, 14))];
        assert_eq!(find_conflicts(&a, &set).len(), 1);
    }

    #[test]
    fn disjoint_ranges_do_not_conflict() {
        let a = approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12));
        let set = vec![approved(2, Some("Eng"), d(2024, 6, 13), d(2024, 6, 14))];
        assert!(find_conflicts(&a, &set).is_empty());
    }

    #[test]
    fn different_department_does_not_conflict() {
        let a = approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12));
        let set = vec![approved(2, Some("Sales"), d(2024, 6, 10), d(2024, 6, 12))];
        assert!(find_conflicts(&a, &set).is_empty());
    }

    #[test]
    fn non_approved_candidates_are_ignored() {
        let a = approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12));
        let set = vec![LeaveRequestDetail::fixture(
            2,
            2,
            Some("Eng"),
            LeaveStatus::Pending,
            d(2024, 6, 10),
            d(2024, 6, 12),
        )];
        assert!(find_conflicts(&a, &set).is_empty());
    }

    #[test]
    fn target_itself_is_excluded() {
        let a = approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12));
        let set = vec![approved(1, Some("Eng"), d(2024, 6, 10), d(2024, 6, 12))];
        assert!(find_conflicts(&a, &set).is_empty());
    }
}
