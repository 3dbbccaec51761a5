use std::time::Duration;

use tracing::debug;

use super::types::{ip_locator_error::IpLocatorError, ipinfo_response::IpInfoResponse};
use crate::types::coordinate::Coordinate;

#[derive(Clone)]
pub struct IpLocatorConfig {
    pub host: String,
    pub timeout: Duration,
}

/// Approximates the caller's position from the public IP the request
/// leaves from.
#[derive(Clone)]
pub struct IpLocatorService {
    config: IpLocatorConfig,
    client: reqwest::Client,
}

impl IpLocatorService {
    pub fn new(config: IpLocatorConfig) -> Result<Self, IpLocatorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IpLocatorError::Internal(format!("Failed to build client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub async fn locate(&self) -> Result<Coordinate, IpLocatorError> {
        let url = format!("{}/json", self.config.host);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IpLocatorError::Internal(format!("Failed to send request: {}", e)))?
            .json::<IpInfoResponse>()
            .await
            .map_err(|e| IpLocatorError::Internal(format!("Failed to get response body: {}", e)))?;

        debug!("Public IP {} resolves to {:?}", body.ip, body.loc);

        match body.loc.as_deref().and_then(Coordinate::parse_pair) {
            Some(location) => Ok(location),
            None => Err(IpLocatorError::MissingLocation(body.loc)),
        }
    }
}
