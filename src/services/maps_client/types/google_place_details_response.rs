use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GooglePlaceDetailsResponseResult {
    pub name: String,
    pub formatted_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_phone_number: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GooglePlaceDetailsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GooglePlaceDetailsResponseResult>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
