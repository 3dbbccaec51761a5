use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;
use urlencoding::encode;

use super::types::{
    google_recognize_request::{
        GoogleRecognizeRequest, GoogleRecognizeRequestAudio, GoogleRecognizeRequestConfig,
    },
    google_recognize_response::{GoogleApiError, GoogleRecognizeResponse},
    speech_service_error::SpeechServiceError,
};
use crate::audio::AudioClip;

#[derive(Clone)]
pub struct SpeechServiceConfig {
    pub api_key: String,
    pub host: String,
    pub language: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct SpeechService {
    config: SpeechServiceConfig,
    client: reqwest::Client,
}

impl SpeechService {
    pub fn new(config: SpeechServiceConfig) -> Result<Self, SpeechServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                SpeechServiceError::Internal(format!("Failed to build client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Sends one utterance for synchronous recognition and returns the top
    /// transcript.
    pub async fn recognize(&self, clip: &AudioClip) -> Result<String, SpeechServiceError> {
        let url = format!(
            "{}/v1/speech:recognize?key={}",
            self.config.host,
            encode(&self.config.api_key)
        );

        let request = GoogleRecognizeRequest {
            config: GoogleRecognizeRequestConfig {
                encoding: "LINEAR16".to_string(),
                sample_rate_hertz: clip.sample_rate,
                language_code: self.config.language.clone(),
            },
            audio: GoogleRecognizeRequestAudio {
                content: STANDARD.encode(clip.to_le_bytes()),
            },
        };

        debug!(
            "Sending {:.1}s of audio for recognition",
            clip.duration_secs()
        );

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechServiceError::Internal(format!("Failed to send request: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();

            return Err(match serde_json::from_str::<GoogleApiError>(&body) {
                Ok(api_error) => SpeechServiceError::Api {
                    status: api_error.error.status,
                    message: api_error.error.message,
                },
                Err(_) => SpeechServiceError::Internal(format!("HTTP {}", status)),
            });
        }

        let body = resp.json::<GoogleRecognizeResponse>().await.map_err(|e| {
            SpeechServiceError::Internal(format!("Failed to get response body: {}", e))
        })?;

        body.results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript.trim().to_string())
            .find(|t| !t.is_empty())
            .ok_or(SpeechServiceError::NoTranscript)
    }
}
