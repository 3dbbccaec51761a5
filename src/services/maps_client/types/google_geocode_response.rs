use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GoogleGeocodeResponseResultGeometryLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleGeocodeResponseResultGeometry {
    pub location: GoogleGeocodeResponseResultGeometryLocation,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleGeocodeResponseResult {
    pub formatted_address: String,
    pub geometry: GoogleGeocodeResponseResultGeometry,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleGeocodeResponse {
    #[serde(default)]
    pub results: Vec<GoogleGeocodeResponseResult>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
