use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::model::leave_request::{LeaveRequestDetail, LeaveStatus};

/// Fixed column order of the CSV export.
const COLUMNS: [&str; 9] = [
    "Employee Name",
    "Email",
    "Department",
    "Leave Type",
    "Start Date",
    "End Date",
    "Total Days",
    "Status",
    "Applied On",
];

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportFilter {
    /// Filter by department
    pub department: Option<String>,
    /// Filter by request status
    pub status: Option<LeaveStatus>,
    /// Keep requests starting on or after this date
    #[param(example = "2024-06-01", format = "date", value_type = String)]
    pub from: Option<NaiveDate>,
    /// Keep requests ending on or before this date
    #[param(example = "2024-06-30", format = "date", value_type = String)]
    pub to: Option<NaiveDate>,
}

/// In-memory filter over detail rows. The date range is a containment
/// test: the request's span must lie inside [from, to].
pub fn filter_requests<'a>(
    rows: &'a [LeaveRequestDetail],
    filter: &ReportFilter,
) -> Vec<&'a LeaveRequestDetail> {
    rows.iter()
        .filter(|row| {
            let department_ok = filter
                .department
                .as_deref()
                .map_or(true, |dept| row.department.as_deref() == Some(dept));
            let status_ok = filter.status.map_or(true, |status| row.status == status);
            let from_ok = filter.from.map_or(true, |from| row.start_date >= from);
            let to_ok = filter.to.map_or(true, |to| row.end_date <= to);
            department_ok && status_ok && from_ok && to_ok
        })
        .collect()
}

/// Serializes rows in the fixed column order. An empty input yields a
/// header-only document, never an error.
pub fn render_csv(rows: &[&LeaveRequestDetail]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');

    for row in rows {
        let applied_on = row
            .created_at
            .map(|ts| ts.date_naive().to_string())
            .unwrap_or_default();
        let fields = [
            csv_field(&row.employee_name),
            csv_field(&row.employee_email),
            csv_field(row.department.as_deref().unwrap_or("N/A")),
            csv_field(&row.leave_type_name),
            row.start_date.to_string(),
            row.end_date.to_string(),
            row.total_days.to_string(),
            row.status.to_string(),
            applied_on,
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// `leave-report-<ISO date>.csv`
pub fn report_file_name(today: NaiveDate) -> String {
    format!("leave-report-{today}.csv")
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(
        id: u64,
        dept: Option<&str>,
        status: LeaveStatus,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LeaveRequestDetail {
        LeaveRequestDetail::fixture(id, id, dept, status, start, end)
    }

    #[test]
    fn empty_input_yields_header_only() {
        let csv = render_csv(&[]);
        assert_eq!(
            csv,
            "Employee Name,Email,Department,Leave Type,Start Date,End Date,Total Days,Status,Applied On\n"
        );
    }

    #[test]
    fn rows_follow_the_fixed_column_order() {
        let r = row(
            1,
            Some("Eng"),
            LeaveStatus::Approved,
            d(2024, 6, 10),
            d(2024, 6, 12),
        );
        let csv = render_csv(&[&r]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "Employee 1,employee1@company.com,Eng,Annual Leave,2024-06-10,2024-06-12,3,approved,"
        );
    }

    #[test]
    fn missing_department_renders_as_na() {
        let r = row(
            1,
            None,
            LeaveStatus::Pending,
            d(2024, 6, 10),
            d(2024, 6, 10),
        );
        let csv = render_csv(&[&r]);
        assert!(csv.lines().nth(1).unwrap().contains(",N/A,"));
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        let mut r = row(
            1,
            Some("Eng"),
            LeaveStatus::Pending,
            d(2024, 6, 10),
            d(2024, 6, 10),
        );
        r.employee_name = "Doe, Jane \"JD\"".to_owned();
        let csv = render_csv(&[&r]);
        assert!(csv.contains("\"Doe, Jane \"\"JD\"\"\""));
    }

    #[test]
    fn filter_matches_department_status_and_range() {
        let rows = vec![
            row(
                1,
                Some("Eng"),
                LeaveStatus::Approved,
                d(2024, 6, 10),
                d(2024, 6, 12),
            ),
            row(
                2,
                Some("Eng"),
                LeaveStatus::Pending,
                d(2024, 6, 10),
                d(2024, 6, 12),
            ),
            row(
                3,
                Some("Sales"),
                LeaveStatus::Approved,
                d(2024, 6, 10),
                d(2024, 6, 12),
            ),
            row(
                4,
                Some("Eng"),
                LeaveStatus::Approved,
                d(2024, 7, 1),
                d(2024, 7, 3),
            ),
        ];

        let filter = ReportFilter {
            department: Some("Eng".to_owned()),
            status: Some(LeaveStatus::Approved),
            from: Some(d(2024, 6, 1)),
            to: Some(d(2024, 6, 30)),
        };
        let matched: Vec<u64> = filter_requests(&rows, &filter).iter().map(|r| r.id).collect();
        assert_eq!(matched, vec![1]);
    }

    #[test]
    fn range_fully_outside_all_requests_matches_nothing() {
        let rows = vec![row(
            1,
            Some("Eng"),
            LeaveStatus::Approved,
            d(2024, 6, 10),
            d(2024, 6, 12),
        )];
        let filter = ReportFilter {
            department: Some("Eng".to_owned()),
            status: Some(LeaveStatus::Approved),
            from: Some(d(2025, 1, 1)),
            to: Some(d(2025, 1, 31)),
        };
        let matched = filter_requests(&rows, &filter);
        assert!(matched.is_empty());
        assert_eq!(render_csv(&matched).lines().count(), 1);
    }

    #[test]
    fn file_name_embeds_the_iso_date() {
        assert_eq!(report_file_name(d(2024, 6, 9)), "leave-report-2024-06-09.csv");
    }
}
