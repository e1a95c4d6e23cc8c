use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a leave request: pending -> approved | rejected (manager
/// decision) or pending -> cancelled (owner). All three outcomes are
/// terminal.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Outcome recorded by a single manager decision.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Approved,
    Rejected,
}

impl From<ApprovalStatus> for LeaveStatus {
    fn from(decision: ApprovalStatus) -> Self {
        match decision {
            ApprovalStatus::Approved => LeaveStatus::Approved,
            ApprovalStatus::Rejected => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApproval {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 10)]
    pub leave_request_id: u64,
    #[schema(example = 7)]
    pub approver_id: u64,
    #[schema(example = "approved")]
    pub status: ApprovalStatus,
    #[schema(example = "ok", nullable = true)]
    pub comments: Option<String>,
    #[schema(example = "2024-06-09T12:00:00Z", format = "date-time", value_type = String)]
    pub approved_at: Option<DateTime<Utc>>,
}

/// A leave request row joined with its employee profile and leave type.
/// This is the shape the domain computations (conflicts, stats, reports)
/// and the list/detail endpoints work over.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 10,
        "employee_id": 1,
        "employee_name": "Jane Doe",
        "employee_email": "jane.doe@company.com",
        "department": "Engineering",
        "manager_id": 7,
        "leave_type_id": 1,
        "leave_type_name": "Annual Leave",
        "start_date": "2024-06-10",
        "end_date": "2024-06-12",
        "total_days": 3,
        "reason": "trip",
        "status": "pending",
        "document_url": null,
        "created_at": "2024-06-01T00:00:00Z",
        "updated_at": "2024-06-01T00:00:00Z"
    })
)]
pub struct LeaveRequestDetail {
    #[schema(example = 10)]
    pub id: u64,
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    #[schema(example = "jane.doe@company.com")]
    pub employee_email: String,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "Annual Leave")]
    pub leave_type_name: String,
    #[schema(example = "2024-06-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Always recomputed server-side from the date pair, never taken
    /// from the caller.
    #[schema(example = 3)]
    pub total_days: i64,
    #[schema(example = "trip")]
    pub reason: String,
    #[schema(example = "pending")]
    pub status: LeaveStatus,
    #[schema(example = "/uploads/1/1717934000000.pdf", nullable = true)]
    pub document_url: Option<String>,
    #[schema(example = "2024-06-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(example = "2024-06-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl LeaveRequestDetail {
    /// Bare-bones row for domain tests.
    pub fn fixture(
        id: u64,
        employee_id: u64,
        department: Option<&str>,
        status: LeaveStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            employee_id,
            employee_name: format!("Employee {employee_id}"),
            employee_email: format!("employee{employee_id}@company.com"),
            department: department.map(str::to_owned),
            manager_id: None,
            leave_type_id: 1,
            leave_type_name: "Annual Leave".to_owned(),
            start_date,
            end_date,
            total_days: (end_date - start_date).num_days().abs() + 1,
            reason: "fixture".to_owned(),
            status,
            document_url: None,
            created_at: None,
            updated_at: None,
        }
    }
}
