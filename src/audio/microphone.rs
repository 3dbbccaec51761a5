use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, warn};

use super::voice_activity::{VadEvent, VadSettings, VoiceActivityDetector};
use super::{AudioClip, AudioError, AudioSource};

const FRAME_LEN: usize = 1024;
const STALL_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default input device through cpal. Each `listen` opens a fresh stream and
/// drops it before returning.
#[derive(Default)]
pub struct CpalMicrophone {
    settings: VadSettings,
}

fn downmix<T: Copy>(data: &[T], channels: usize, to_i16: impl Fn(T) -> i16) -> Vec<i16> {
    if channels <= 1 {
        return data.iter().map(|&s| to_i16(s)).collect();
    }
    data.chunks(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| to_i16(s) as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn f32_to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn capture(mut settings: VadSettings, stop: &AtomicBool) -> Result<AudioClip, AudioError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(AudioError::NoDevice)?;
    let supported = device
        .default_input_config()
        .map_err(|e| AudioError::Device(e.to_string()))?;

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels as usize;
    settings.sample_rate = config.sample_rate.0;
    debug!(
        "Opening input device at {} Hz, {} channel(s), {:?}",
        settings.sample_rate, channels, sample_format
    );

    let (tx, rx) = mpsc::channel::<Vec<i16>>();
    let on_error = |e: cpal::StreamError| warn!("Audio stream error: {}", e);

    let stream = match sample_format {
        cpal::SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(downmix(data, channels, |s| s));
            },
            on_error,
            None,
        ),
        cpal::SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(downmix(data, channels, f32_to_i16));
            },
            on_error,
            None,
        ),
        other => {
            return Err(AudioError::Device(format!(
                "Unsupported sample format {:?}",
                other
            )))
        }
    }
    .map_err(|e| AudioError::Device(e.to_string()))?;

    stream
        .play()
        .map_err(|e| AudioError::Device(e.to_string()))?;

    collect_phrase(&rx, settings, stop)
}

/// Runs device chunks through the detector until it yields a phrase or gives
/// up. Raising `stop` ends the wait within one poll interval.
fn collect_phrase(
    rx: &mpsc::Receiver<Vec<i16>>,
    settings: VadSettings,
    stop: &AtomicBool,
) -> Result<AudioClip, AudioError> {
    let sample_rate = settings.sample_rate;
    let mut vad = VoiceActivityDetector::new(settings);
    let mut pending: Vec<i16> = Vec::with_capacity(FRAME_LEN * 2);
    let mut last_audio = Instant::now();

    loop {
        if stop.load(Ordering::Relaxed) {
            debug!("Capture stopped by caller");
            return Err(AudioError::Cancelled);
        }

        let chunk = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(chunk) => chunk,
            Err(mpsc::RecvTimeoutError::Timeout) if last_audio.elapsed() < STALL_TIMEOUT => {
                continue
            }
            Err(_) => {
                return Err(AudioError::Device(
                    "Input stream stopped delivering audio".to_string(),
                ))
            }
        };
        last_audio = Instant::now();
        pending.extend(chunk);

        while pending.len() >= FRAME_LEN {
            let frame: Vec<i16> = pending.drain(..FRAME_LEN).collect();
            match vad.push_frame(&frame) {
                VadEvent::Phrase(samples) => {
                    debug!("Captured phrase of {} samples", samples.len());
                    return Ok(AudioClip::new(samples, sample_rate));
                }
                VadEvent::TimedOut => return Err(AudioError::NoSpeech),
                VadEvent::Calibrating | VadEvent::Waiting | VadEvent::Speaking => {}
            }
        }
    }
}

/// Raises the flag when the listening future goes away.
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[async_trait]
impl AudioSource for CpalMicrophone {
    async fn listen(&self) -> Result<AudioClip, AudioError> {
        let settings = self.settings.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let _stop_on_drop = StopOnDrop(stop.clone());
        // The log subscriber is scoped to the calling thread.
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());

        tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || capture(settings, &stop))
        })
        .await
        .map_err(|e| AudioError::Device(format!("Capture task failed: {}", e)))?
    }
}
