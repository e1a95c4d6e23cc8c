use crate::auth::auth::AuthUser;
use crate::domain::authz;
use crate::error::ApiError;
use crate::model::leave_type::LeaveType;
use crate::model::role::Role;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveType {
    #[schema(example = "Annual Leave")]
    pub name: String,
    #[schema(example = "Paid vacation days", nullable = true)]
    pub description: Option<String>,
    #[schema(example = 20, nullable = true)]
    pub max_days_per_year: Option<i64>,
    #[schema(example = false)]
    pub requires_document: Option<bool>,
    #[schema(example = true)]
    pub is_active: Option<bool>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeaveType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_days_per_year: Option<i64>,
    pub requires_document: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveTypeQuery {
    /// Admins may pass true to include inactive types
    pub include_inactive: Option<bool>,
}

/// List leave types. Everyone sees active types; only admins may ask for
/// the inactive ones too.
#[utoipa::path(
    get,
    path = "/api/leave-types",
    params(LeaveTypeQuery),
    responses(
        (status = 200, description = "Leave types", body = [LeaveType]),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn list_leave_types(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveTypeQuery>,
) -> Result<HttpResponse, ApiError> {
    let include_inactive = query.include_inactive.unwrap_or(false) && auth.role == Role::Admin;

    let sql = if include_inactive {
        r#"
        SELECT id, name, description, max_days_per_year, requires_document, is_active, created_at
        FROM leave_types
        ORDER BY name
        "#
    } else {
        r#"
        SELECT id, name, description, max_days_per_year, requires_document, is_active, created_at
        FROM leave_types
        WHERE is_active = TRUE
        ORDER BY name
        "#
    };

    let types = sqlx::query_as::<_, LeaveType>(sql)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave types");
            ApiError::Backend
        })?;

    Ok(HttpResponse::Ok().json(types))
}

/// Create a leave type (admin).
#[utoipa::path(
    post,
    path = "/api/leave-types",
    request_body = CreateLeaveType,
    responses(
        (status = 201, description = "Leave type created", body = LeaveType),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveType>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_manage_leave_types(auth.role)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name must not be empty"));
    }

    if payload.max_days_per_year.is_some_and(|cap| cap <= 0) {
        return Err(ApiError::validation("max_days_per_year must be positive"));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO leave_types (name, description, max_days_per_year, requires_document, is_active)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(payload.description.as_deref())
    .bind(payload.max_days_per_year)
    .bind(payload.requires_document.unwrap_or(false))
    .bind(payload.is_active.unwrap_or(true))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to create leave type");
        ApiError::Backend
    })?;

    let created = sqlx::query_as::<_, LeaveType>(
        r#"
        SELECT id, name, description, max_days_per_year, requires_document, is_active, created_at
        FROM leave_types
        WHERE id = ?
        "#,
    )
    .bind(result.last_insert_id())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch created leave type");
        ApiError::Backend
    })?;

    Ok(HttpResponse::Created().json(created))
}

/// Partially update a leave type (admin).
#[utoipa::path(
    put,
    path = "/api/leave-types/{type_id}",
    params(
        ("type_id" = u64, Path, description = "Leave type ID")
    ),
    request_body = UpdateLeaveType,
    responses(
        (status = 200, description = "Leave type updated"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave type not found")
    ),
    security(("bearer_auth" = [])),
    tag = "LeaveType"
)]
pub async fn update_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeaveType>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_manage_leave_types(auth.role)?;

    let type_id = path.into_inner();

    if payload.max_days_per_year.is_some_and(|cap| cap <= 0) {
        return Err(ApiError::validation("max_days_per_year must be positive"));
    }

    let mut fields = Map::new();
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Name must not be empty"));
        }
        fields.insert("name".into(), Value::String(name.trim().to_owned()));
    }
    if let Some(description) = &payload.description {
        fields.insert("description".into(), Value::String(description.clone()));
    }
    if let Some(cap) = payload.max_days_per_year {
        fields.insert("max_days_per_year".into(), Value::from(cap));
    }
    if let Some(requires_document) = payload.requires_document {
        fields.insert("requires_document".into(), Value::Bool(requires_document));
    }
    if let Some(is_active) = payload.is_active {
        fields.insert("is_active".into(), Value::Bool(is_active));
    }

    if fields.is_empty() {
        return Err(ApiError::validation("No fields provided for update"));
    }

    let update = build_update_sql(
        "leave_types",
        &Value::Object(fields),
        &[
            "name",
            "description",
            "max_days_per_year",
            "requires_document",
            "is_active",
        ],
        "id",
        type_id as i64,
    )
    .map_err(|e| ApiError::validation(e.to_string()))?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        tracing::error!(error = %e, type_id, "Failed to update leave type");
        ApiError::Backend
    })?;

    if affected == 0 {
        return Err(ApiError::not_found("Leave type not found"));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Leave type updated" })))
}
