use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "email": "jane.doe@company.com",
        "full_name": "Jane Doe",
        "role": "employee",
        "department": "Engineering",
        "manager_id": 7,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
)]
pub struct Profile {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    #[schema(example = "employee")]
    pub role: Role,

    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,

    /// Set only for employees; must point at a manager-role profile.
    #[schema(example = 7, nullable = true)]
    pub manager_id: Option<u64>,

    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: Option<DateTime<Utc>>,
}
