use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpLocatorError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("No usable location in response: {0:?}")]
    MissingLocation(Option<String>),
}
