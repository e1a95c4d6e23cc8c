pub mod leave_request;
pub mod leave_type;
pub mod profile;
pub mod role;
