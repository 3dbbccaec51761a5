use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GooglePlacesNearbyResponseResult {
    pub place_id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct GooglePlacesNearbyResponse {
    #[serde(default)]
    pub results: Vec<GooglePlacesNearbyResponseResult>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
