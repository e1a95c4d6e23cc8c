use crate::auth::auth::AuthUser;
use crate::domain::authz;
use crate::error::ApiError;
use crate::model::profile::Profile;
use crate::model::role::Role;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::email_filter;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

const PROFILE_SELECT: &str = r#"
SELECT id, email, full_name, role, department, manager_id, created_at, updated_at
FROM profiles
"#;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProfileQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filter by role
    pub role: Option<Role>,
    /// Filter by department
    pub department: Option<String>,
    /// Search by name or email
    pub search: Option<String>,
}

#[derive(serde::Serialize, ToSchema)]
pub struct ProfileListResponse {
    pub data: Vec<Profile>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Admin edit surface; absent fields are left untouched.
#[derive(Deserialize, ToSchema)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    /// Empty string clears the department
    pub department: Option<String>,
    pub manager_id: Option<u64>,
}

/// List profiles (HR/Admin).
#[utoipa::path(
    get,
    path = "/api/profiles",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Paginated profile list", body = ProfileListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn list_profiles(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_view_profiles(auth.role)?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(role) = query.role {
        conditions.push("role = ?");
        bindings.push(role.to_string());
    }

    if let Some(department) = &query.department {
        conditions.push("department = ?");
        bindings.push(department.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(full_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM profiles {}", where_clause);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_q = count_q.bind(b);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count profiles");
        ApiError::Backend
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "{} {} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        PROFILE_SELECT, where_clause
    );

    let mut data_q = sqlx::query_as::<_, Profile>(&data_sql);
    for b in &bindings {
        data_q = data_q.bind(b);
    }

    let profiles = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch profiles");
            ApiError::Backend
        })?;

    Ok(HttpResponse::Ok().json(ProfileListResponse {
        data: profiles,
        page,
        per_page,
        total,
    }))
}

/// Fetch one profile (HR/Admin, or the viewer's own).
#[utoipa::path(
    get,
    path = "/api/profiles/{profile_id}",
    params(
        ("profile_id" = u64, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let profile_id = path.into_inner();

    if profile_id != auth.user_id {
        authz::ensure_can_view_profiles(auth.role)?;
    }

    let sql = format!("{} WHERE id = ?", PROFILE_SELECT);
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(profile_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, profile_id, "Failed to fetch profile");
            ApiError::Backend
        })?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Update a profile's name, role, department or manager link (admin).
#[utoipa::path(
    put,
    path = "/api/profiles/{profile_id}",
    params(
        ("profile_id" = u64, Path, description = "Profile ID")
    ),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_manage_users(auth.role)?;

    let profile_id = path.into_inner();

    let mut fields = Map::new();

    if let Some(full_name) = &payload.full_name {
        if full_name.trim().is_empty() {
            return Err(ApiError::validation("Full name must not be empty"));
        }
        fields.insert("full_name".into(), Value::String(full_name.trim().to_owned()));
    }

    if let Some(role) = payload.role {
        fields.insert("role".into(), Value::String(role.to_string()));

        // The manager link is meaningful only for employees.
        if role != Role::Employee && payload.manager_id.is_none() {
            fields.insert("manager_id".into(), Value::Null);
        }
    }

    if let Some(department) = &payload.department {
        let department = department.trim();
        fields.insert(
            "department".into(),
            if department.is_empty() {
                Value::Null
            } else {
                Value::String(department.to_owned())
            },
        );
    }

    if let Some(manager_id) = payload.manager_id {
        if manager_id == profile_id {
            return Err(ApiError::validation("A profile cannot be its own manager"));
        }

        // manager_id must reference a manager-role profile.
        let manager_role =
            sqlx::query_scalar::<_, Role>("SELECT role FROM profiles WHERE id = ?")
                .bind(manager_id)
                .fetch_optional(pool.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, manager_id, "Failed to fetch manager profile");
                    ApiError::Backend
                })?;

        match manager_role {
            Some(Role::Manager) => {}
            Some(_) => {
                return Err(ApiError::validation(
                    "manager_id must reference a profile with the manager role",
                ));
            }
            None => return Err(ApiError::validation("Manager profile not found")),
        }

        fields.insert("manager_id".into(), Value::from(manager_id));
    }

    if fields.is_empty() {
        return Err(ApiError::validation("No fields provided for update"));
    }

    let update = build_update_sql(
        "profiles",
        &Value::Object(fields),
        &["full_name", "role", "department", "manager_id"],
        "id",
        profile_id as i64,
    )
    .map_err(|e| ApiError::validation(e.to_string()))?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        tracing::error!(error = %e, profile_id, "Failed to update profile");
        ApiError::Backend
    })?;

    if affected == 0 {
        return Err(ApiError::not_found("Profile not found"));
    }

    let sql = format!("{} WHERE id = ?", PROFILE_SELECT);
    let profile = sqlx::query_as::<_, Profile>(&sql)
        .bind(profile_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, profile_id, "Failed to fetch updated profile");
            ApiError::Backend
        })?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Delete a profile (admin). Foreign-key violations surface as validation
/// errors; the schema decides what cascades.
#[utoipa::path(
    delete,
    path = "/api/profiles/{profile_id}",
    params(
        ("profile_id" = u64, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile deleted"),
        (status = 400, description = "Profile still referenced"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Profile not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn delete_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    authz::ensure_can_manage_users(auth.role)?;

    let profile_id = path.into_inner();

    if profile_id == auth.user_id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    let email = sqlx::query_scalar::<_, String>("SELECT email FROM profiles WHERE id = ?")
        .bind(profile_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, profile_id, "Failed to fetch profile");
            ApiError::Backend
        })?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
        .bind(profile_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            // Free the email for re-registration.
            email_filter::remove(&email);
            crate::utils::email_cache::EMAIL_CACHE.invalidate(&email.to_lowercase()).await;

            Ok(HttpResponse::Ok().json(json!({ "message": "Profile deleted" })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code() == Some("23000".into()) {
                    return Err(ApiError::validation(
                        "Profile is still referenced by other records",
                    ));
                }
            }

            tracing::error!(error = %e, profile_id, "Failed to delete profile");
            Err(ApiError::Backend)
        }
    }
}
