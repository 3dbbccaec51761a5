pub mod speech_service;
pub mod types;
