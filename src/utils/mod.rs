pub mod answer;
pub mod app_error;
pub mod console;
pub mod logging;
