use std::process::ExitCode;

use thiserror::Error;

use crate::services::maps_client::types::maps_service_error::MapsServiceError;

/// Everything that ends a run early. Recoverable problems (bad menu input,
/// a misheard address) are handled in place and never become one of these.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("User rejected terms and conditions.")]
    TermsRejected,

    #[error("Unable to recognize user address: {0}")]
    AddressNotRecognized(String),

    #[error("No open {0} services nearby")]
    NoNearbyServices(String),

    #[error("No route from {from} to {to}")]
    NoRoute { from: String, to: String },

    #[error("Map service failure: {0}")]
    Maps(#[from] MapsServiceError),

    #[error("Console failure: {0}")]
    Console(#[from] std::io::Error),

    #[error("User terminated.")]
    Cancelled,
}

impl FinderError {
    /// The line shown to the user before exiting, if any.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            FinderError::AddressNotRecognized(_) => Some("Unable to identify address"),
            FinderError::NoNearbyServices(_) => Some("No nearby services."),
            FinderError::NoRoute { .. } => Some("Unable to locate services near you."),
            FinderError::Maps(_) => Some("Unable to reach the map service."),
            FinderError::TermsRejected | FinderError::Console(_) | FinderError::Cancelled => None,
        }
    }

    /// Declining the terms and interrupting are the user's call, not failures.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            FinderError::TermsRejected | FinderError::Cancelled => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    }
}
