use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    #[schema(example = "s3cret")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub full_name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

/// Credential row fetched at login.
#[derive(FromRow)]
pub struct ProfileCredentials {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
