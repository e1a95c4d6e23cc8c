use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequestDetail, LeaveStatus};

/// Dashboard aggregates over a (already role-scoped) request set.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[schema(example = json!({
    "total": 12,
    "pending": 3,
    "approved": 7,
    "rejected": 2,
    "total_approved_days": 21,
    "employees": 5
}))]
pub struct LeaveStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Sum of total_days over approved requests only.
    pub total_approved_days: i64,
    /// Distinct employees appearing in the set.
    pub employees: usize,
}

pub fn compute(rows: &[LeaveRequestDetail]) -> LeaveStats {
    let mut stats = LeaveStats {
        total: rows.len(),
        pending: 0,
        approved: 0,
        rejected: 0,
        total_approved_days: 0,
        employees: 0,
    };

    let mut seen = HashSet::new();
    for row in rows {
        seen.insert(row.employee_id);
        match row.status {
            LeaveStatus::Pending => stats.pending += 1,
            LeaveStatus::Approved => {
                stats.approved += 1;
                stats.total_approved_days += row.total_days;
            }
            LeaveStatus::Rejected => stats.rejected += 1,
            LeaveStatus::Cancelled => {}
        }
    }
    stats.employees = seen.len();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_set_yields_zeroes() {
        let stats = compute(&[]);
        assert_eq!(
            stats,
            LeaveStats {
                total: 0,
                pending: 0,
                approved: 0,
                rejected: 0,
                total_approved_days: 0,
                employees: 0,
            }
        );
    }

    #[test]
    fn counts_statuses_and_distinct_employees() {
        let rows = vec![
            LeaveRequestDetail::fixture(
                1,
                1,
                Some("Eng"),
                LeaveStatus::Approved,
                d(2024, 6, 10),
                d(2024, 6, 12),
            ),
            LeaveRequestDetail::fixture(
                2,
                1,
                Some("Eng"),
                LeaveStatus::Pending,
                d(2024, 7, 1),
                d(2024, 7, 1),
            ),
            LeaveRequestDetail::fixture(
                3,
                2,
                Some("Eng"),
                LeaveStatus::Approved,
                d(2024, 6, 11),
                d(2024, 6, 15),
            ),
            LeaveRequestDetail::fixture(
                4,
                3,
                Some("Eng"),
                LeaveStatus::Cancelled,
                d(2024, 8, 1),
                d(2024, 8, 2),
            ),
        ];

        let stats = compute(&rows);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 0);
        // 3 days + 5 days, approved rows only
        assert_eq!(stats.total_approved_days, 8);
        assert_eq!(stats.employees, 3);
    }
}
