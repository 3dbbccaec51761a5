pub mod google_directions_response;
pub mod google_geocode_response;
pub mod google_place_details_response;
pub mod google_places_nearby_response;
pub mod maps_service_error;
