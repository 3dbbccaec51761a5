mod app;
mod audio;
mod flows;
mod services;
mod types;
mod utils;

use std::{path::PathBuf, process::ExitCode};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use app::AppConfig;
use utils::{
    app_error::FinderError,
    console::StdConsole,
    logging::{LogGuard, DEFAULT_LOG_FILE, LOG_FILE_VAR},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let log_path = std::env::var(LOG_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "service_finder=debug".into());

    let _log_guard = match LogGuard::init(&log_path, filter) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Unable to open log file {}: {}", log_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting app...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = match app::gen_app(&config, audio::default_source()) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut console = StdConsole::new(config.prompt_pacing);
    let result = tokio::select! {
        result = app.run(&mut console) => result,
        _ = tokio::signal::ctrl_c() => Err(FinderError::Cancelled),
    };

    app::conclude(result, &mut console)
}
