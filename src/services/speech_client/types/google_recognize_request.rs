use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRecognizeRequestConfig {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleRecognizeRequestAudio {
    /// Base64 of little-endian 16-bit PCM.
    pub content: String,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleRecognizeRequest {
    pub config: GoogleRecognizeRequestConfig,
    pub audio: GoogleRecognizeRequestAudio,
}
