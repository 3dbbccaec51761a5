use tracing::{debug, error};

use crate::{
    services::maps_client::maps_service::NearbySearchInput,
    types::{app_state::AppState, coordinate::Coordinate, place_candidate::PlaceCandidate},
    utils::app_error::FinderError,
};

/// Nearest currently open place of `category` around `location`, with its
/// contact details filled in.
pub async fn find_nearest_place(
    state: &AppState,
    category: &str,
    location: Coordinate,
) -> Result<PlaceCandidate, FinderError> {
    let place = state
        .maps_service
        .nearest_open_place(NearbySearchInput { location, category })
        .await
        .map_err(|e| {
            error!("Failed to search nearby places: {}", e);
            FinderError::from(e)
        })?
        .ok_or_else(|| {
            error!("No open {} found near {}", category, location);
            FinderError::NoNearbyServices(category.to_string())
        })?;

    let details = state
        .maps_service
        .place_details(&place.place_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch details for {}: {}", place.name, e);
            FinderError::from(e)
        })?;

    debug!(
        "Nearest Location: {}; Address: {}",
        details.name, details.formatted_address
    );

    Ok(PlaceCandidate {
        category: category.to_string(),
        name: details.name,
        formatted_address: details.formatted_address,
        phone: details.phone,
    })
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::app::{gen_mock_app, mocks};

    #[tokio::test]
    async fn test_nearest_place_with_details() {
        let mut mock_app = gen_mock_app(vec![]).await;

        let nearby = mocks::nearby_ok(&mut mock_app.google_server, "hospital", "p1").await;
        let details = mocks::details_ok(
            &mut mock_app.google_server,
            "p1",
            "St. Mary's",
            "Praed St, London W2 1NY, UK",
            Some("020 3312 6666"),
        )
        .await;

        let place = find_nearest_place(
            mock_app.app.state(),
            "hospital",
            Coordinate::new(51.5237, -0.1585),
        )
        .await
        .unwrap();

        nearby.assert_async().await;
        details.assert_async().await;
        assert_eq!(
            place,
            PlaceCandidate {
                category: "hospital".to_string(),
                name: "St. Mary's".to_string(),
                formatted_address: "Praed St, London W2 1NY, UK".to_string(),
                phone: Some("020 3312 6666".to_string()),
            }
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_no_nearby_services() {
        let mut mock_app = gen_mock_app(vec![]).await;

        mocks::nearby_zero(&mut mock_app.google_server).await;
        let details = mock_app
            .google_server
            .mock("GET", "/maps/api/place/details/json")
            .match_query(mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = find_nearest_place(mock_app.app.state(), "courthouse", Coordinate::new(0.5, 0.5))
            .await
            .unwrap_err();

        details.assert_async().await;
        assert!(matches!(err, FinderError::NoNearbyServices(ref c) if c == "courthouse"));
        assert!(logs_contain("No open courthouse found"));
    }
}
