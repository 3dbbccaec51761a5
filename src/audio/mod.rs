//! Microphone capture for the spoken-address path.
//!
//! The flow only sees [`AudioSource`]; the live `cpal` backend is compiled in
//! with the `microphone` feature. Without it, listening fails with
//! [`AudioError::Unavailable`] and the caller falls back to typed input.

#[cfg(feature = "microphone")]
pub mod microphone;
#[cfg_attr(not(feature = "microphone"), allow(dead_code))]
pub mod voice_activity;

use async_trait::async_trait;
use thiserror::Error;

/// Sample rate requested from the device and reported to the recognizer.
pub const SAMPLE_RATE: u32 = 16_000;

#[cfg_attr(not(feature = "microphone"), allow(dead_code))]
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Microphone support is not available in this build")]
    Unavailable,

    #[error("No input device found")]
    NoDevice,

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("No speech detected before the listen timeout")]
    NoSpeech,

    #[error("Listening was cancelled")]
    Cancelled,
}

/// One captured utterance, mono 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioClip {
    #[cfg_attr(not(feature = "microphone"), allow(dead_code))]
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        AudioClip {
            samples,
            sample_rate,
        }
    }

    /// Raw little-endian bytes, the `LINEAR16` layout the recognizer expects.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Blocks until one phrase has been heard and returns it. The device is
    /// held only for the duration of the call.
    async fn listen(&self) -> Result<AudioClip, AudioError>;
}

/// Stand-in used when the binary is built without the `microphone` feature.
#[cfg_attr(feature = "microphone", allow(dead_code))]
pub struct UnavailableMicrophone;

#[async_trait]
impl AudioSource for UnavailableMicrophone {
    async fn listen(&self) -> Result<AudioClip, AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Plays back a fixed sequence of listen results; runs dry as `NoSpeech`.
#[cfg(test)]
pub struct ScriptedMicrophone {
    clips: std::sync::Mutex<std::collections::VecDeque<Result<AudioClip, AudioError>>>,
}

#[cfg(test)]
impl ScriptedMicrophone {
    pub fn new(clips: Vec<Result<AudioClip, AudioError>>) -> Self {
        ScriptedMicrophone {
            clips: std::sync::Mutex::new(clips.into()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl AudioSource for ScriptedMicrophone {
    async fn listen(&self) -> Result<AudioClip, AudioError> {
        self.clips
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AudioError::NoSpeech))
    }
}

#[cfg(feature = "microphone")]
pub fn default_source() -> std::sync::Arc<dyn AudioSource> {
    std::sync::Arc::new(microphone::CpalMicrophone::default())
}

#[cfg(not(feature = "microphone"))]
pub fn default_source() -> std::sync::Arc<dyn AudioSource> {
    std::sync::Arc::new(UnavailableMicrophone)
}
