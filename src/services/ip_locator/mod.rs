pub mod ip_locator_service;
pub mod types;
