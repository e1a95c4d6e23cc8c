use crate::error::ApiError;
use crate::model::leave_request::LeaveRequestDetail;
use crate::model::role::Role;

/// Which leave-request rows a viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    /// Only the viewer's own requests.
    Own(u64),
    /// Requests of profiles whose manager_id is the viewer.
    DirectReports(u64),
    /// Every request.
    All,
}

pub fn request_scope(viewer_id: u64, role: Role) -> RequestScope {
    match role {
        Role::Employee => RequestScope::Own(viewer_id),
        Role::Manager => RequestScope::DirectReports(viewer_id),
        Role::Hr | Role::Admin => RequestScope::All,
    }
}

/// Only employees submit leave requests.
pub fn ensure_can_create(role: Role) -> Result<(), ApiError> {
    match role {
        Role::Employee => Ok(()),
        Role::Manager | Role::Hr | Role::Admin => Err(ApiError::authorization(
            "Only employees can submit leave requests",
        )),
    }
}

/// A decision requires the manager role and the request's employee to be a
/// direct report of the viewer.
pub fn ensure_can_decide(
    viewer_id: u64,
    role: Role,
    employee_manager_id: Option<u64>,
) -> Result<(), ApiError> {
    match role {
        Role::Manager if employee_manager_id == Some(viewer_id) => Ok(()),
        Role::Manager => Err(ApiError::authorization(
            "You can only decide requests of your direct reports",
        )),
        Role::Employee | Role::Hr | Role::Admin => Err(ApiError::authorization(
            "Only the employee's manager can approve or reject",
        )),
    }
}

/// Cancellation belongs to the request's owner alone.
pub fn ensure_can_cancel(viewer_id: u64, role: Role, employee_id: u64) -> Result<(), ApiError> {
    match role {
        Role::Employee if viewer_id == employee_id => Ok(()),
        Role::Employee | Role::Manager | Role::Hr | Role::Admin => Err(ApiError::authorization(
            "Only the requesting employee can cancel a request",
        )),
    }
}

/// Row-level visibility for a single fetched request.
pub fn ensure_can_view(
    viewer_id: u64,
    role: Role,
    request: &LeaveRequestDetail,
) -> Result<(), ApiError> {
    let visible = match request_scope(viewer_id, role) {
        RequestScope::Own(id) => request.employee_id == id,
        RequestScope::DirectReports(id) => request.manager_id == Some(id),
        RequestScope::All => true,
    };

    if visible {
        Ok(())
    } else {
        Err(ApiError::authorization(
            "You are not allowed to view this leave request",
        ))
    }
}

pub fn ensure_can_export(role: Role) -> Result<(), ApiError> {
    match role {
        Role::Hr | Role::Admin => Ok(()),
        Role::Employee | Role::Manager => {
            Err(ApiError::authorization("HR/Admin only"))
        }
    }
}

pub fn ensure_can_view_profiles(role: Role) -> Result<(), ApiError> {
    match role {
        Role::Hr | Role::Admin => Ok(()),
        Role::Employee | Role::Manager => Err(ApiError::authorization("HR/Admin only")),
    }
}

pub fn ensure_can_manage_users(role: Role) -> Result<(), ApiError> {
    match role {
        Role::Admin => Ok(()),
        Role::Employee | Role::Manager | Role::Hr => {
            Err(ApiError::authorization("Admin only"))
        }
    }
}

pub fn ensure_can_manage_leave_types(role: Role) -> Result<(), ApiError> {
    match role {
        Role::Admin => Ok(()),
        Role::Employee | Role::Manager | Role::Hr => {
            Err(ApiError::authorization("Admin only"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveStatus;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(request_scope(1, Role::Employee), RequestScope::Own(1));
        assert_eq!(
            request_scope(7, Role::Manager),
            RequestScope::DirectReports(7)
        );
        assert_eq!(request_scope(2, Role::Hr), RequestScope::All);
        assert_eq!(request_scope(3, Role::Admin), RequestScope::All);
    }

    #[test]
    fn only_employees_create() {
        assert!(ensure_can_create(Role::Employee).is_ok());
        for role in [Role::Manager, Role::Hr, Role::Admin] {
            assert!(matches!(
                ensure_can_create(role),
                Err(ApiError::Authorization(_))
            ));
        }
    }

    #[test]
    fn manager_decides_only_for_direct_reports() {
        assert!(ensure_can_decide(7, Role::Manager, Some(7)).is_ok());
        assert!(matches!(
            ensure_can_decide(7, Role::Manager, Some(8)),
            Err(ApiError::Authorization(_))
        ));
        assert!(matches!(
            ensure_can_decide(7, Role::Manager, None),
            Err(ApiError::Authorization(_))
        ));
    }

    #[test]
    fn hr_and_admin_cannot_decide() {
        for role in [Role::Employee, Role::Hr, Role::Admin] {
            assert!(matches!(
                ensure_can_decide(7, role, Some(7)),
                Err(ApiError::Authorization(_))
            ));
        }
    }

    #[test]
    fn owner_alone_cancels() {
        assert!(ensure_can_cancel(1, Role::Employee, 1).is_ok());
        assert!(matches!(
            ensure_can_cancel(2, Role::Employee, 1),
            Err(ApiError::Authorization(_))
        ));
        assert!(matches!(
            ensure_can_cancel(1, Role::Admin, 1),
            Err(ApiError::Authorization(_))
        ));
    }

    #[test]
    fn visibility_matches_scope() {
        let mut row = LeaveRequestDetail::fixture(
            10,
            1,
            Some("Eng"),
            LeaveStatus::Pending,
            d(2024, 6, 10),
            d(2024, 6, 12),
        );
        row.manager_id = Some(7);

        assert!(ensure_can_view(1, Role::Employee, &row).is_ok());
        assert!(ensure_can_view(7, Role::Manager, &row).is_ok());
        assert!(ensure_can_view(99, Role::Hr, &row).is_ok());
        assert!(matches!(
            ensure_can_view(2, Role::Employee, &row),
            Err(ApiError::Authorization(_))
        ));
        assert!(matches!(
            ensure_can_view(8, Role::Manager, &row),
            Err(ApiError::Authorization(_))
        ));
    }

    #[test]
    fn export_and_admin_surfaces_are_gated() {
        assert!(ensure_can_export(Role::Hr).is_ok());
        assert!(ensure_can_export(Role::Admin).is_ok());
        assert!(ensure_can_export(Role::Manager).is_err());

        assert!(ensure_can_manage_users(Role::Admin).is_ok());
        assert!(ensure_can_manage_users(Role::Hr).is_err());

        assert!(ensure_can_manage_leave_types(Role::Admin).is_ok());
        assert!(ensure_can_manage_leave_types(Role::Employee).is_err());
    }
}
