use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Annual Leave",
        "description": "Paid vacation days",
        "max_days_per_year": 20,
        "requires_document": false,
        "is_active": true,
        "created_at": "2024-01-01T00:00:00Z"
    })
)]
pub struct LeaveType {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Annual Leave")]
    pub name: String,

    #[schema(example = "Paid vacation days", nullable = true)]
    pub description: Option<String>,

    /// Yearly cap; enforced at creation only when the cap rule is enabled.
    #[schema(example = 20, nullable = true)]
    pub max_days_per_year: Option<i64>,

    #[schema(example = false)]
    pub requires_document: bool,

    #[schema(example = true)]
    pub is_active: bool,

    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
