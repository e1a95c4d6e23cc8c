use crate::auth::auth::AuthUser;
use crate::domain::{authz, report, report::ReportFilter};
use crate::error::ApiError;
use crate::model::leave_request::LeaveRequestDetail;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use sqlx::MySqlPool;

/// CSV export of the filtered leave records (HR/Admin).
///
/// Filtering runs over the full joined set in memory, so the export and
/// the on-screen records always agree on filter semantics.
#[utoipa::path(
    get,
    path = "/api/reports/leave.csv",
    params(ReportFilter),
    responses(
        (status = 200, description = "CSV report, header-only when nothing matches", content_type = "text/csv"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn export_leave_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportFilter>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_export(auth.role)?;

    let rows = sqlx::query_as::<_, LeaveRequestDetail>(
        r#"
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
        ORDER BY lr.created_at DESC, lr.id DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave records for report");
        ApiError::Backend
    })?;

    let filtered = report::filter_requests(&rows, &query);
    let csv = report::render_csv(&filtered);
    let file_name = report::report_file_name(Utc::now().date_naive());

    tracing::info!(
        rows = filtered.len(),
        file_name = %file_name,
        "Generated leave report"
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(csv))
}
