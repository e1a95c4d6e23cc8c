use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

/// Service-wide error taxonomy.
///
/// Validation and authorization failures are corrective (the caller fixes
/// the input); backend failures are transient (the caller may retry).
/// Backend details are logged at the call site and never leak into the
/// response body.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    Authorization(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "Internal Server Error")]
    Backend,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        ApiError::Authorization(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Backend => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::validation("bad dates").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::authorization("not your report").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("no such request").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Backend.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn backend_error_hides_details() {
        assert_eq!(ApiError::Backend.to_string(), "Internal Server Error");
    }
}
