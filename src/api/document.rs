use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::document;
use crate::error::ApiError;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Original file name; only the extension is kept
    pub filename: String,
}

/// Upload a supporting document (PDF/DOC/DOCX, max 5 MB) ahead of
/// submitting a leave request. The returned URL goes into the request's
/// document_url. Files are keyed by employee id and timestamp so uploads
/// never collide.
#[utoipa::path(
    post,
    path = "/api/documents",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored; response carries the document URL"),
        (status = 400, description = "Wrong type or too large"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Document"
)]
pub async fn upload_document(
    auth: AuthUser,
    config: web::Data<Config>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    // Type and size are checked before any byte hits the disk.
    let ext = document::validate_upload(&query.filename, body.len())?;

    let file_name = format!("{}.{}", Utc::now().timestamp_millis(), ext);
    let dir: PathBuf = [config.upload_dir.as_str(), &auth.user_id.to_string()]
        .iter()
        .collect();
    let path = dir.join(&file_name);

    let write_path = path.clone();
    let bytes = body.clone();
    web::block(move || {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&write_path, &bytes)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Upload worker failed");
        ApiError::Backend
    })?
    .map_err(|e| {
        tracing::error!(error = %e, path = %path.display(), "Failed to store document");
        ApiError::Backend
    })?;

    let document_url = format!("/uploads/{}/{}", auth.user_id, file_name);

    tracing::info!(employee_id = auth.user_id, url = %document_url, "Document stored");

    Ok(HttpResponse::Created().json(json!({ "document_url": document_url })))
}

#[cfg(test)]
mod tests {
    use crate::auth::jwt::generate_access_token;
    use crate::config::Config;
    use crate::model::role::Role;
    use crate::routes;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web::Data};

    fn test_config(upload_dir: &str) -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: "test-secret".to_owned(),
            server_addr: String::new(),
            access_token_ttl: 300,
            refresh_token_ttl: 300,
            rate_login_per_min: 60,
            rate_register_per_min: 60,
            rate_refresh_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_owned(),
            upload_dir: upload_dir.to_owned(),
            enforce_yearly_cap: false,
        }
    }

    #[actix_web::test]
    async fn accepts_a_megabyte_upload_through_the_route_tree() {
        let dir = std::env::temp_dir().join(format!("leavedesk-upload-{}", std::process::id()));
        let config = test_config(dir.to_str().unwrap());
        let token = generate_access_token(
            1,
            "jane.doe@company.com".to_owned(),
            Role::Employee,
            &config.jwt_secret,
            300,
        );

        let app = test::init_service(
            App::new()
                .app_data(Data::new(config.clone()))
                .configure(|cfg| routes::configure(cfg, config.clone())),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/documents?filename=form.pdf")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .peer_addr("127.0.0.1:8080".parse().unwrap())
            .set_payload(vec![0u8; 1024 * 1024])
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
