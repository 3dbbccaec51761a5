use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapsServiceError {
    #[error("Internal error: {0}")]
    Internal(String),

    /// Google answered, but with a status other than `OK`/`ZERO_RESULTS`.
    #[error("Maps API returned {status}: {message}")]
    Api { status: String, message: String },
}
