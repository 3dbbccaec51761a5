use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;
use urlencoding::encode;

use super::types::{
    google_directions_response::GoogleDirectionsResponse,
    google_geocode_response::GoogleGeocodeResponse,
    google_place_details_response::GooglePlaceDetailsResponse,
    google_places_nearby_response::GooglePlacesNearbyResponse,
    maps_service_error::MapsServiceError,
};
use crate::types::{
    coordinate::{Coordinate, ResolvedLocation},
    direction_summary::DirectionSummary,
};

const PLACE_DETAIL_FIELDS: &str = "name,formatted_phone_number,formatted_address";

#[derive(Clone)]
pub struct MapsServiceConfig {
    pub api_key: String,
    pub host: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct MapsService {
    config: MapsServiceConfig,
    client: reqwest::Client,
}

pub struct NearbySearchInput<'a> {
    pub location: Coordinate,
    pub category: &'a str,
}

pub struct NearbySearchOutput {
    pub place_id: String,
    pub name: String,
}

#[derive(Debug)]
pub struct PlaceDetailsOutput {
    pub name: String,
    pub formatted_address: String,
    pub phone: Option<String>,
}

pub struct DirectionsInput<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub departure_time: DateTime<Utc>,
}

fn check_status(status: &str, error_message: Option<String>) -> Result<(), MapsServiceError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        _ => Err(MapsServiceError::Api {
            status: status.to_string(),
            message: error_message.unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

impl MapsService {
    pub fn new(config: MapsServiceConfig) -> Result<Self, MapsServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MapsServiceError::Internal(format!("Failed to build client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MapsServiceError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MapsServiceError::Internal(format!("Failed to send request: {}", e)))?;

        resp.json::<T>()
            .await
            .map_err(|e| MapsServiceError::Internal(format!("Failed to get response body: {}", e)))
    }

    /// Forward geocoding. `Ok(None)` means Google had no match for the text.
    pub async fn geocode(
        &self,
        address: &str,
    ) -> Result<Option<ResolvedLocation>, MapsServiceError> {
        debug!("Geocoding address: {}", address);

        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.config.host,
            encode(address),
            self.config.api_key
        );

        let body = self.get_json::<GoogleGeocodeResponse>(&url).await?;
        check_status(&body.status, body.error_message)?;

        Ok(body.results.into_iter().next().map(|r| ResolvedLocation {
            coordinate: Coordinate::new(r.geometry.location.lat, r.geometry.location.lng),
            address: r.formatted_address,
        }))
    }

    pub async fn reverse_geocode(
        &self,
        location: Coordinate,
    ) -> Result<Option<String>, MapsServiceError> {
        debug!("Reverse geocoding {}", location);

        let url = format!(
            "{}/maps/api/geocode/json?latlng={}&key={}",
            self.config.host, location, self.config.api_key
        );

        let body = self.get_json::<GoogleGeocodeResponse>(&url).await?;
        check_status(&body.status, body.error_message)?;

        Ok(body.results.into_iter().next().map(|r| r.formatted_address))
    }

    /// Closest currently open place of `category`. Google ranks the results
    /// by distance, so the first one wins.
    pub async fn nearest_open_place(
        &self,
        input: NearbySearchInput<'_>,
    ) -> Result<Option<NearbySearchOutput>, MapsServiceError> {
        let url = format!(
            "{}/maps/api/place/nearbysearch/json?location={}&rankby=distance&opennow=true&type={}&key={}",
            self.config.host,
            input.location,
            encode(input.category),
            self.config.api_key
        );

        let body = self.get_json::<GooglePlacesNearbyResponse>(&url).await?;
        check_status(&body.status, body.error_message)?;
        debug!("Nearby search returned {} results", body.results.len());

        Ok(body.results.into_iter().next().map(|p| NearbySearchOutput {
            place_id: p.place_id,
            name: p.name,
        }))
    }

    pub async fn place_details(
        &self,
        place_id: &str,
    ) -> Result<PlaceDetailsOutput, MapsServiceError> {
        let url = format!(
            "{}/maps/api/place/details/json?place_id={}&fields={}&key={}",
            self.config.host,
            encode(place_id),
            encode(PLACE_DETAIL_FIELDS),
            self.config.api_key
        );

        let body = self.get_json::<GooglePlaceDetailsResponse>(&url).await?;
        check_status(&body.status, body.error_message)?;

        let result = body.result.ok_or_else(|| {
            MapsServiceError::Internal(format!("No details returned for place {}", place_id))
        })?;

        Ok(PlaceDetailsOutput {
            name: result.name,
            formatted_address: result.formatted_address,
            phone: result.formatted_phone_number,
        })
    }

    /// Driving directions leaving at `departure_time`. `Ok(None)` when Google
    /// finds no route.
    pub async fn directions(
        &self,
        input: DirectionsInput<'_>,
    ) -> Result<Option<DirectionSummary>, MapsServiceError> {
        debug!("Departure time: {}", input.departure_time);

        let url = format!(
            "{}/maps/api/directions/json?origin={}&destination={}&mode=driving&departure_time={}&key={}",
            self.config.host,
            encode(input.origin),
            encode(input.destination),
            input.departure_time.timestamp(),
            self.config.api_key
        );

        let body = self.get_json::<GoogleDirectionsResponse>(&url).await?;
        check_status(&body.status, body.error_message)?;

        Ok(body
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .map(|leg| DirectionSummary {
                duration: leg.duration.text,
                distance: leg.distance.text,
                start_address: leg.start_address,
            }))
    }
}
