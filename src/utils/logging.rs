use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

const LOG_HEADER: &str = "Note: This log will be cleared for each run.";

/// Environment variable overriding where the run log is written.
pub const LOG_FILE_VAR: &str = "FINDER_LOG_FILE";
pub const DEFAULT_LOG_FILE: &str = "output.log";

/// Owns the run's log file and the subscriber writing to it. Logging stops
/// and the file is flushed when this is dropped.
pub struct LogGuard {
    file: Arc<File>,
    _subscriber: DefaultGuard,
}

impl LogGuard {
    /// Truncates `path` and routes this thread's `tracing` events into it.
    pub fn init(path: &Path, filter: EnvFilter) -> io::Result<Self> {
        let mut file = File::create(path)?;
        writeln!(file, "{}\n", LOG_HEADER)?;

        let file = Arc::new(file);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(file.clone())
            .with_ansi(false)
            .with_target(false)
            .with_env_filter(filter)
            .finish();

        Ok(LogGuard {
            file,
            _subscriber: tracing::subscriber::set_default(subscriber),
        })
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let mut file: &File = &self.file;
        let _ = file.flush();
    }
}
