use std::{process::ExitCode, sync::Arc, time::Duration};

use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationErrors};

use crate::{
    audio::AudioSource,
    flows::{
        directions_report::report_directions, input_acquisition::acquire_location,
        nearby_place::find_nearest_place,
    },
    services::{
        ip_locator::ip_locator_service::{IpLocatorConfig, IpLocatorService},
        maps_client::maps_service::{MapsService, MapsServiceConfig},
        speech_client::speech_service::{SpeechService, SpeechServiceConfig},
    },
    types::app_state::AppState,
    utils::{answer::Answer, app_error::FinderError, console::Console},
};

pub const SEPARATOR: &str =
    "#-----------------------------------------------------------------------------#";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Failed to create client: {0}")]
    Client(String),
}

#[derive(Clone, Debug, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub google_api_key: String,

    #[validate(url)]
    pub maps_host: String,

    #[validate(url)]
    pub speech_host: String,

    #[validate(url)]
    pub ip_host: String,

    #[validate(length(min = 2, message = "Must be a language tag such as en-US"))]
    pub speech_language: String,

    #[validate(range(min = 1, max = 300))]
    pub http_timeout_secs: u64,

    pub prompt_pacing: bool,
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, StartupError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StartupError::Invalid { key, value }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| StartupError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                value,
            })?,
            None => 30,
        };

        let prompt_pacing = match lookup("PROMPT_PACING") {
            Some(value) => parse_flag("PROMPT_PACING", value)?,
            None => true,
        };

        let config = AppConfig {
            google_api_key: lookup("GOOGLE_API_KEY").ok_or(StartupError::Missing("GOOGLE_API_KEY"))?,
            maps_host: or_default("GOOGLE_MAPS_HOST", "https://maps.googleapis.com"),
            speech_host: or_default("GOOGLE_SPEECH_HOST", "https://speech.googleapis.com"),
            ip_host: or_default("IP_LOCATOR_HOST", "https://ipinfo.io"),
            speech_language: or_default("SPEECH_LANGUAGE", "en-US"),
            http_timeout_secs,
            prompt_pacing,
        };

        config.validate()?;
        Ok(config)
    }
}

pub struct App {
    state: AppState,
}

pub fn gen_app(config: &AppConfig, microphone: Arc<dyn AudioSource>) -> Result<App, StartupError> {
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let state = AppState {
        maps_service: MapsService::new(MapsServiceConfig {
            api_key: config.google_api_key.clone(),
            host: config.maps_host.clone(),
            timeout,
        })
        .map_err(|e| StartupError::Client(e.to_string()))?,
        speech_service: SpeechService::new(SpeechServiceConfig {
            api_key: config.google_api_key.clone(),
            host: config.speech_host.clone(),
            language: config.speech_language.clone(),
            timeout,
        })
        .map_err(|e| StartupError::Client(e.to_string()))?,
        ip_locator: IpLocatorService::new(IpLocatorConfig {
            host: config.ip_host.clone(),
            timeout,
        })
        .map_err(|e| StartupError::Client(e.to_string()))?,
        microphone,
    };

    Ok(App { state })
}

impl App {
    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// One full pass: consent, category, address, nearest place, directions.
    pub async fn run(&self, console: &mut dyn Console) -> Result<(), FinderError> {
        console.say(SEPARATOR);
        console.say("Find your nearest government service.");
        console.say("Note: This program is powered by Google service.");
        console.say(
            "If you are using this program you have to accept Google's terms and conditions.",
        );
        console.say(SEPARATOR);
        console.pause(Duration::from_secs(1)).await;

        let answer = console.prompt("Continue? (y/n): ").await?;
        if !Answer::parse(&answer).is_yes() {
            error!("User rejected terms and conditions.");
            return Err(FinderError::TermsRejected);
        }

        console.say(SEPARATOR);
        console.pause(Duration::from_millis(300)).await;
        let category = loop {
            let category = console.prompt("What kind of service do you need? ").await?;
            let category = category.trim();
            if !category.is_empty() {
                break category.to_string();
            }
        };
        console.say("");
        console.pause(Duration::from_millis(300)).await;

        let location = acquire_location(&self.state, console).await?;
        let place = find_nearest_place(&self.state, &category, location.coordinate).await?;

        console.say(SEPARATOR);
        console.say(&format!(
            "Nearest {} service: {}",
            place.category, place.name
        ));
        console.say(&format!("Address: {}", place.formatted_address));
        if let Some(phone) = &place.phone {
            console.say(&format!("Phone: {}", phone));
        }

        report_directions(&self.state, console, &location.address, &place.formatted_address)
            .await?;
        console.say(SEPARATOR);

        info!("Address obtained");
        Ok(())
    }
}

/// Turns the outcome of a run into what the user sees last and the process
/// exit status.
pub fn conclude(result: Result<(), FinderError>, console: &mut dyn Console) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(FinderError::Cancelled) => {
            info!("User terminated.");
            console.say("");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let FinderError::Console(io) = &e {
                error!("Console failure: {}", io);
            }
            if let Some(message) = e.user_message() {
                console.say(message);
            }
            e.exit_code()
        }
    }
}

#[cfg(test)]
pub struct MockApp {
    pub app: App,
    pub google_server: mockito::ServerGuard,
    pub ip_server: mockito::ServerGuard,
}

#[cfg(test)]
pub async fn gen_mock_app(
    clips: Vec<Result<crate::audio::AudioClip, crate::audio::AudioError>>,
) -> MockApp {
    let google_server = mockito::Server::new_async().await;
    let ip_server = mockito::Server::new_async().await;

    let config = AppConfig {
        google_api_key: "key".to_string(),
        maps_host: google_server.url(),
        speech_host: google_server.url(),
        ip_host: ip_server.url(),
        speech_language: "en-US".to_string(),
        http_timeout_secs: 5,
        prompt_pacing: false,
    };

    let microphone = Arc::new(crate::audio::ScriptedMicrophone::new(clips));
    let app = gen_app(&config, microphone).unwrap();

    MockApp {
        app,
        google_server,
        ip_server,
    }
}
