use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponseTextValue {
    pub text: String,
    pub value: i64,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponseRouteLeg {
    pub duration: GoogleDirectionsResponseTextValue,
    pub distance: GoogleDirectionsResponseTextValue,
    pub start_address: String,
    pub end_address: String,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponseRoute {
    pub legs: Vec<GoogleDirectionsResponseRouteLeg>,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponse {
    #[serde(default)]
    pub routes: Vec<GoogleDirectionsResponseRoute>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
