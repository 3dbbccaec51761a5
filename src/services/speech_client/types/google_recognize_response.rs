use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GoogleRecognizeResponseAlternative {
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleRecognizeResponseResult {
    #[serde(default)]
    pub alternatives: Vec<GoogleRecognizeResponseAlternative>,
}

/// An utterance with no recognizable speech comes back as `{}`.
#[derive(Serialize, Deserialize)]
pub struct GoogleRecognizeResponse {
    #[serde(default)]
    pub results: Vec<GoogleRecognizeResponseResult>,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleApiErrorBody {
    pub code: u16,
    pub message: String,
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleApiError {
    pub error: GoogleApiErrorBody,
}
