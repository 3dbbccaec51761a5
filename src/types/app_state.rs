use std::sync::Arc;

use crate::{
    audio::AudioSource,
    services::{
        ip_locator::ip_locator_service::IpLocatorService, maps_client::maps_service::MapsService,
        speech_client::speech_service::SpeechService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub maps_service: MapsService,
    pub speech_service: SpeechService,
    pub ip_locator: IpLocatorService,
    pub microphone: Arc<dyn AudioSource>,
}
