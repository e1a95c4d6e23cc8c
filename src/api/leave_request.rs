use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::{authz, authz::RequestScope, conflict, lifecycle, stats};
use crate::error::ApiError;
use crate::model::leave_request::{
    ApprovalStatus, LeaveApproval, LeaveRequestDetail, LeaveStatus,
};
use crate::model::role::Role;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// Joined projection used by every read path.
const DETAIL_SELECT: &str = r#"
SELECT
    lr.id,
    lr.employee_id,
    p.full_name AS employee_name,
    p.email AS employee_email,
    p.department,
    p.manager_id,
    lr.leave_type_id,
    lt.name AS leave_type_name,
    lr.start_date,
    lr.end_date,
    lr.total_days,
    lr.reason,
    lr.status,
    lr.document_url,
    lr.created_at,
    lr.updated_at
FROM leave_requests lr
JOIN profiles p ON p.id = lr.employee_id
JOIN leave_types lt ON lt.id = lr.leave_type_id
"#;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2024-06-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "trip")]
    pub reason: String,
    /// URL returned by the document upload endpoint, if a form was attached
    #[schema(example = "/uploads/1/1717934000000.pdf", nullable = true)]
    pub document_url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    #[schema(example = "ok", nullable = true)]
    pub comments: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveFilter {
    /// Filter by leave status
    pub status: Option<LeaveStatus>,
    /// Filter by department (HR/Admin scope)
    pub department: Option<String>,
    /// Keep requests starting on or after this date
    #[param(example = "2024-06-01", format = "date", value_type = String)]
    pub from: Option<NaiveDate>,
    /// Keep requests ending on or before this date
    #[param(example = "2024-06-30", format = "date", value_type = String)]
    pub to: Option<NaiveDate>,
    /// Pagination page number (1-based)
    pub page: Option<u64>,
    /// Items per page
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequestDetail>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveDetailResponse {
    pub request: LeaveRequestDetail,
    pub approvals: Vec<LeaveApproval>,
    /// Approved, same-department, overlapping requests. Advisory only;
    /// populated for reviewers looking at a pending request.
    pub conflicts: Vec<LeaveRequestDetail>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

/// Clamped pagination window: (page, per_page, offset).
fn page_window(page: Option<u64>, per_page: Option<u64>) -> (u64, u64, u64) {
    let per_page = per_page.unwrap_or(10).clamp(1, 100);
    let page = page.unwrap_or(1).max(1);
    (page, per_page, (page - 1) * per_page)
}

/// WHERE clause for the viewer's visibility scope.
fn scope_condition(scope: RequestScope, conditions: &mut Vec<&'static str>, args: &mut Vec<FilterValue>) {
    match scope {
        RequestScope::Own(id) => {
            conditions.push("lr.employee_id = ?");
            args.push(FilterValue::U64(id));
        }
        RequestScope::DirectReports(id) => {
            conditions.push("p.manager_id = ?");
            args.push(FilterValue::U64(id));
        }
        RequestScope::All => {}
    }
}

async fn fetch_detail(pool: &MySqlPool, leave_id: u64) -> Result<LeaveRequestDetail, ApiError> {
    let sql = format!("{} WHERE lr.id = ?", DETAIL_SELECT);

    sqlx::query_as::<_, LeaveRequestDetail>(&sql)
        .bind(leave_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ApiError::Backend
        })?
        .ok_or_else(|| ApiError::not_found("Leave request not found"))
}

/// All approved requests sharing the target's department; candidate set
/// for the conflict detector. `<=>` keeps two NULL departments equal,
/// matching how profiles without a department are grouped.
async fn fetch_conflict_candidates(
    pool: &MySqlPool,
    department: Option<&str>,
) -> Result<Vec<LeaveRequestDetail>, ApiError> {
    let sql = format!(
        "{} WHERE p.department <=> ? AND lr.status = 'approved' ORDER BY lr.created_at DESC, lr.id DESC",
        DETAIL_SELECT
    );

    sqlx::query_as::<_, LeaveRequestDetail>(&sql)
        .bind(department)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch conflict candidates");
            ApiError::Backend
        })
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created", body = LeaveRequestDetail),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_create(auth.role)?;

    // Validation happens before any write; total_days is always derived
    // here, never taken from the caller.
    let total_days =
        lifecycle::validate_new_request(payload.start_date, payload.end_date, &payload.reason)?;

    let leave_type = sqlx::query_as::<_, (bool, Option<i64>)>(
        "SELECT is_active, max_days_per_year FROM leave_types WHERE id = ?",
    )
    .bind(payload.leave_type_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_type_id = payload.leave_type_id, "Failed to fetch leave type");
        ApiError::Backend
    })?;

    let max_days_per_year = lifecycle::check_leave_type(leave_type)?;

    if config.enforce_yearly_cap {
        if let Some(cap) = max_days_per_year {
            let days_used = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COALESCE(SUM(total_days), 0)
                FROM leave_requests
                WHERE employee_id = ?
                  AND leave_type_id = ?
                  AND status IN ('pending', 'approved')
                  AND YEAR(start_date) = YEAR(?)
                "#,
            )
            .bind(auth.user_id)
            .bind(payload.leave_type_id)
            .bind(payload.start_date)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to sum yearly leave days");
                ApiError::Backend
            })?;

            lifecycle::check_yearly_cap(cap, days_used, total_days)?;
        }
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type_id, start_date, end_date, total_days, reason, document_url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.leave_type_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(total_days)
    .bind(payload.reason.trim())
    .bind(payload.document_url.as_deref())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = auth.user_id, "Failed to create leave request");
        ApiError::Backend
    })?;

    let created = fetch_detail(pool.get_ref(), result.last_insert_id()).await?;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
List leave requests (role-scoped)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated, role-scoped leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    // -------------------------
    // Pagination
    // -------------------------
    let (page, per_page, offset) = page_window(query.page, query.per_page);

    // -------------------------
    // WHERE clause: visibility scope first, then filters
    // -------------------------
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut args: Vec<FilterValue> = Vec::new();

    scope_condition(
        authz::request_scope(auth.user_id, auth.role),
        &mut conditions,
        &mut args,
    );

    if let Some(status) = query.status {
        conditions.push("lr.status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(department) = &query.department {
        conditions.push("p.department = ?");
        args.push(FilterValue::Str(department.clone()));
    }

    if let Some(from) = query.from {
        conditions.push("lr.start_date >= ?");
        args.push(FilterValue::Date(from));
    }

    if let Some(to) = query.to {
        conditions.push("lr.end_date <= ?");
        args.push(FilterValue::Date(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!(
        r#"
        SELECT COUNT(*)
        FROM leave_requests lr
        JOIN profiles p ON p.id = lr.employee_id
        JOIN leave_types lt ON lt.id = lr.leave_type_id
        {}
        "#,
        where_clause
    );

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.as_str()),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        ApiError::Backend
    })?;

    // -------------------------
    // DATA query; the tiebreak on id keeps identical queries returning
    // identical ordered results
    // -------------------------
    let data_sql = format!(
        "{} {} ORDER BY lr.created_at DESC, lr.id DESC LIMIT ? OFFSET ?",
        DETAIL_SELECT, where_clause
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequestDetail>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(*v),
            FilterValue::Str(s) => data_q.bind(s.as_str()),
            FilterValue::Date(d) => data_q.bind(*d),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            ApiError::Backend
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}

/* =========================
Get one leave request
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request with approvals and advisory conflicts", body = LeaveDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let request = fetch_detail(pool.get_ref(), leave_id).await?;
    authz::ensure_can_view(auth.user_id, auth.role, &request)?;

    let approvals = sqlx::query_as::<_, LeaveApproval>(
        r#"
        SELECT id, leave_request_id, approver_id, status, comments, approved_at
        FROM leave_approvals
        WHERE leave_request_id = ?
        ORDER BY approved_at DESC, id DESC
        "#,
    )
    .bind(leave_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch approvals");
        ApiError::Backend
    })?;

    // Conflicts are a reviewer's signal on a pending request; employees
    // looking at their own request don't see team data.
    let conflicts = if request.status == LeaveStatus::Pending && auth.role != Role::Employee {
        let candidates =
            fetch_conflict_candidates(pool.get_ref(), request.department.as_deref()).await?;
        conflict::find_conflicts(&request, &candidates)
            .into_iter()
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    Ok(HttpResponse::Ok().json(LeaveDetailResponse {
        request,
        approvals,
        conflicts,
    }))
}

/* =========================
Approve / reject (manager of the employee)
========================= */
async fn decide_leave(
    auth: AuthUser,
    pool: &MySqlPool,
    leave_id: u64,
    decision: ApprovalStatus,
    comments: Option<&str>,
) -> Result<HttpResponse, ApiError> {
    let request = fetch_detail(pool, leave_id).await?;

    // Gate before any write: manager role + direct report.
    authz::ensure_can_decide(auth.user_id, auth.role, request.manager_id)?;

    if request.status != LeaveStatus::Pending {
        return Err(ApiError::validation(
            "Leave request not found or already processed",
        ));
    }

    // Decision record and status change happen together or not at all.
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to open transaction");
        ApiError::Backend
    })?;

    sqlx::query(
        r#"
        INSERT INTO leave_approvals (leave_request_id, approver_id, status, comments)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(leave_id)
    .bind(auth.user_id)
    .bind(decision)
    .bind(comments)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to insert approval record");
        ApiError::Backend
    })?;

    let new_status = LeaveStatus::from(decision);
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(new_status)
    .bind(leave_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to update leave status");
        ApiError::Backend
    })?;

    // The guard lost a race with another decision; roll the approval
    // record back too.
    if result.rows_affected() == 0 {
        tx.rollback().await.map_err(|e| {
            tracing::error!(error = %e, leave_id, "Rollback failed");
            ApiError::Backend
        })?;
        return Err(ApiError::validation(
            "Leave request not found or already processed",
        ));
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Commit failed");
        ApiError::Backend
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Leave {}", new_status),
        "status": new_status
    })))
}

#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = DecideLeave, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave approved"),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> Result<HttpResponse, ApiError> {
    decide_leave(
        auth,
        pool.get_ref(),
        path.into_inner(),
        ApprovalStatus::Approved,
        payload.comments.as_deref(),
    )
    .await
}

#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = DecideLeave, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 400, description = "Leave request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> Result<HttpResponse, ApiError> {
    decide_leave(
        auth,
        pool.get_ref(),
        path.into_inner(),
        ApprovalStatus::Rejected,
        payload.comments.as_deref(),
    )
    .await
}

/* =========================
Cancel (owner only, pending only)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled"),
        (status = 400, description = "Leave request already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let row = sqlx::query_as::<_, (u64, LeaveStatus)>(
        "SELECT employee_id, status FROM leave_requests WHERE id = ?",
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        ApiError::Backend
    })?;

    let (employee_id, status) = row.ok_or_else(|| ApiError::not_found("Leave request not found"))?;

    authz::ensure_can_cancel(auth.user_id, auth.role, employee_id)?;

    if status != LeaveStatus::Pending {
        return Err(ApiError::validation("Only pending requests can be cancelled"));
    }

    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'cancelled'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Cancel leave failed");
        ApiError::Backend
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::validation("Only pending requests can be cancelled"));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave cancelled",
        "status": LeaveStatus::Cancelled
    })))
}

/* =========================
Dashboard stats (role-scoped)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/stats",
    responses(
        (status = 200, description = "Aggregates over the viewer's visible requests", body = crate::domain::stats::LeaveStats),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_stats(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut args: Vec<FilterValue> = Vec::new();

    scope_condition(
        authz::request_scope(auth.user_id, auth.role),
        &mut conditions,
        &mut args,
    );

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "{} {} ORDER BY lr.created_at DESC, lr.id DESC",
        DETAIL_SELECT, where_clause
    );

    let mut rows_q = sqlx::query_as::<_, LeaveRequestDetail>(&sql);
    for arg in &args {
        rows_q = match arg {
            FilterValue::U64(v) => rows_q.bind(*v),
            FilterValue::Str(s) => rows_q.bind(s.as_str()),
            FilterValue::Date(d) => rows_q.bind(*d),
        };
    }

    let rows = rows_q
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch requests for stats");
            ApiError::Backend
        })?;

    Ok(HttpResponse::Ok().json(stats::compute(&rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults() {
        assert_eq!(page_window(None, None), (1, 10, 0));
    }

    #[test]
    fn page_window_clamps_per_page_to_at_least_one() {
        assert_eq!(page_window(Some(1), Some(0)), (1, 1, 0));
    }

    #[test]
    fn page_window_caps_per_page_at_one_hundred() {
        assert_eq!(page_window(Some(2), Some(5000)), (2, 100, 100));
    }

    #[test]
    fn page_window_treats_page_zero_as_first() {
        assert_eq!(page_window(Some(0), Some(20)), (1, 20, 0));
    }
}
