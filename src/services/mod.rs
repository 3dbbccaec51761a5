pub mod ip_locator;
pub mod maps_client;
pub mod speech_client;
