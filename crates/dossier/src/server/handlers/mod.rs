pub mod api;
pub mod dashboard;
pub mod logs;
pub mod status;
