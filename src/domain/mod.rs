pub mod authz;
pub mod conflict;
pub mod day_count;
pub mod document;
pub mod lifecycle;
pub mod report;
pub mod stats;
