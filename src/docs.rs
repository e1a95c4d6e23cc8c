use crate::api::leave_request::{
    CreateLeave, DecideLeave, LeaveDetailResponse, LeaveListResponse,
};
use crate::api::leave_type::{CreateLeaveType, UpdateLeaveType};
use crate::api::profile::{ProfileListResponse, UpdateProfile};
use crate::domain::stats::LeaveStats;
use crate::model::leave_request::{ApprovalStatus, LeaveApproval, LeaveRequestDetail, LeaveStatus};
use crate::model::leave_type::LeaveType;
use crate::model::profile::Profile;
use crate::model::role::Role;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeaveDesk API",
        version = "1.0.0",
        description = r#"
## Leave Management System

This API powers a role-based **leave management** system.

### Key Features
- **Leave Requests**
  - Employees apply for leave, managers approve or reject their direct
    reports' requests, owners cancel pending requests
- **Conflict Warnings**
  - Reviewers see which approved, same-department leaves overlap a
    pending request
- **Reports**
  - HR filters all records by department, status and date range and
    exports CSV reports
- **Administration**
  - Admins manage profiles (role, department, manager) and leave types

### Security
Endpoints are protected using **JWT Bearer authentication**. What a
viewer can see and do depends on their role: employee, manager, hr or
admin.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,
        crate::api::leave_request::leave_stats,

        crate::api::leave_type::list_leave_types,
        crate::api::leave_type::create_leave_type,
        crate::api::leave_type::update_leave_type,

        crate::api::profile::list_profiles,
        crate::api::profile::get_profile,
        crate::api::profile::update_profile,
        crate::api::profile::delete_profile,

        crate::api::report::export_leave_report,

        crate::api::document::upload_document
    ),
    components(
        schemas(
            Role,
            LeaveStatus,
            ApprovalStatus,
            Profile,
            LeaveType,
            LeaveApproval,
            LeaveRequestDetail,
            CreateLeave,
            DecideLeave,
            LeaveListResponse,
            LeaveDetailResponse,
            LeaveStats,
            CreateLeaveType,
            UpdateLeaveType,
            ProfileListResponse,
            UpdateProfile
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request lifecycle APIs"),
        (name = "LeaveType", description = "Leave type registry APIs"),
        (name = "Profile", description = "Profile administration APIs"),
        (name = "Report", description = "Reporting and export APIs"),
        (name = "Document", description = "Supporting document APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
