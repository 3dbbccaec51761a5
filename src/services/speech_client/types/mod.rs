pub mod google_recognize_request;
pub mod google_recognize_response;
pub mod speech_service_error;
