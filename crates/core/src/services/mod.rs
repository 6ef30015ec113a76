pub mod catalog_service;
pub mod poll_service;
pub mod report_service;
