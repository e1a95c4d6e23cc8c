pub mod document;
pub mod leave_request;
pub mod leave_type;
pub mod profile;
pub mod report;
