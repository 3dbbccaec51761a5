use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechServiceError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Speech API returned {status}: {message}")]
    Api { status: String, message: String },

    /// The service understood the request but heard nothing it could
    /// transcribe.
    #[error("No speech could be recognized")]
    NoTranscript,
}
