pub mod ip_locator_error;
pub mod ipinfo_response;
