use chrono::Utc;
use tracing::{debug, error};

use crate::{
    services::maps_client::maps_service::DirectionsInput, types::app_state::AppState,
    utils::{app_error::FinderError, console::Console},
};

/// Prints how far `destination` is by car from `origin`, leaving now.
pub async fn report_directions(
    state: &AppState,
    console: &mut dyn Console,
    origin: &str,
    destination: &str,
) -> Result<(), FinderError> {
    let departure_time = Utc::now();

    let summary = state
        .maps_service
        .directions(DirectionsInput {
            origin,
            destination,
            departure_time,
        })
        .await
        .map_err(|e| {
            error!("Failed to fetch directions: {}", e);
            FinderError::from(e)
        })?
        .ok_or_else(|| {
            error!("No route available from {} to {}", origin, destination);
            FinderError::NoRoute {
                from: origin.to_string(),
                to: destination.to_string(),
            }
        })?;

    debug!(
        "Travel time: {}, Distance: {}",
        summary.duration, summary.distance
    );

    console.say(&summary.travel_line());
    console.say(&format!("Starting from: {}", summary.start_address));

    Ok(())
}
