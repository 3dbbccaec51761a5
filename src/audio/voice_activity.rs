//! Energy-threshold phrase detection.
//!
//! The threshold is first fitted to the room's ambient noise, then keeps
//! drifting toward it while nobody is talking. A phrase starts on the first
//! frame louder than the threshold and ends after a run of quiet frames.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct VadSettings {
    pub sample_rate: u32,
    pub initial_threshold: f32,
    /// Fraction of the old threshold kept per second of adaptation.
    pub damping: f32,
    /// Threshold target as a multiple of ambient energy.
    pub ratio: f32,
    pub ambient_secs: f32,
    /// Quiet time that closes a phrase.
    pub pause_secs: f32,
    /// Phrases with less speech than this are treated as clicks and dropped.
    pub min_phrase_secs: f32,
    pub max_phrase_secs: f32,
    /// Audio kept from before the trigger frame so the first syllable survives.
    pub preroll_secs: f32,
    /// Give up if nothing is said within this long after calibration.
    pub start_timeout_secs: f32,
}

impl Default for VadSettings {
    fn default() -> Self {
        VadSettings {
            sample_rate: super::SAMPLE_RATE,
            initial_threshold: 300.0,
            damping: 0.15,
            ratio: 1.5,
            ambient_secs: 1.0,
            pause_secs: 0.8,
            min_phrase_secs: 0.3,
            max_phrase_secs: 30.0,
            preroll_secs: 0.5,
            start_timeout_secs: 15.0,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum VadEvent {
    Calibrating,
    Waiting,
    Speaking,
    Phrase(Vec<i16>),
    TimedOut,
}

// Durations are tracked in samples so frame arithmetic stays exact.
enum State {
    Calibrating {
        heard: usize,
    },
    Waiting {
        heard: usize,
        preroll: VecDeque<Vec<i16>>,
        preroll_len: usize,
    },
    Speaking {
        samples: Vec<i16>,
        speech: usize,
        quiet: usize,
    },
}

struct Limits {
    ambient: usize,
    pause: usize,
    min_phrase: usize,
    max_phrase: usize,
    preroll: usize,
    start_timeout: usize,
}

pub struct VoiceActivityDetector {
    settings: VadSettings,
    limits: Limits,
    threshold: f32,
    state: State,
}

/// Root-mean-square amplitude of a frame.
pub fn rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / frame.len() as f64).sqrt() as f32
}

impl VoiceActivityDetector {
    pub fn new(settings: VadSettings) -> Self {
        let to_samples = |secs: f32| (secs * settings.sample_rate as f32).round() as usize;
        let limits = Limits {
            ambient: to_samples(settings.ambient_secs),
            pause: to_samples(settings.pause_secs),
            min_phrase: to_samples(settings.min_phrase_secs),
            max_phrase: to_samples(settings.max_phrase_secs),
            preroll: to_samples(settings.preroll_secs),
            start_timeout: to_samples(settings.start_timeout_secs),
        };
        let threshold = settings.initial_threshold;

        VoiceActivityDetector {
            settings,
            limits,
            threshold,
            state: State::Calibrating { heard: 0 },
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn adapt(&mut self, energy: f32, frame_len: usize) {
        let secs = frame_len as f32 / self.settings.sample_rate as f32;
        let damping = self.settings.damping.powf(secs);
        let target = energy * self.settings.ratio;
        self.threshold = self.threshold * damping + target * (1.0 - damping);
    }

    fn waiting() -> State {
        State::Waiting {
            heard: 0,
            preroll: VecDeque::new(),
            preroll_len: 0,
        }
    }

    /// Feeds one frame of mono samples and reports what the detector is doing.
    /// After `Phrase` or `TimedOut` the detector starts waiting again.
    pub fn push_frame(&mut self, frame: &[i16]) -> VadEvent {
        let len = frame.len();
        let energy = rms(frame);
        let state = std::mem::replace(&mut self.state, State::Calibrating { heard: 0 });

        let (next, event) = match state {
            State::Calibrating { heard } => {
                self.adapt(energy, len);
                let heard = heard + len;
                if heard >= self.limits.ambient {
                    (Self::waiting(), VadEvent::Waiting)
                } else {
                    (State::Calibrating { heard }, VadEvent::Calibrating)
                }
            }
            State::Waiting {
                heard,
                mut preroll,
                mut preroll_len,
            } => {
                if energy > self.threshold {
                    let mut samples: Vec<i16> = preroll.into_iter().flatten().collect();
                    samples.extend_from_slice(frame);
                    (
                        State::Speaking {
                            samples,
                            speech: len,
                            quiet: 0,
                        },
                        VadEvent::Speaking,
                    )
                } else {
                    self.adapt(energy, len);
                    let heard = heard + len;
                    if heard >= self.limits.start_timeout {
                        (Self::waiting(), VadEvent::TimedOut)
                    } else {
                        preroll.push_back(frame.to_vec());
                        preroll_len += len;
                        while preroll_len > self.limits.preroll {
                            match preroll.pop_front() {
                                Some(old) => preroll_len -= old.len(),
                                None => break,
                            }
                        }
                        (
                            State::Waiting {
                                heard,
                                preroll,
                                preroll_len,
                            },
                            VadEvent::Waiting,
                        )
                    }
                }
            }
            State::Speaking {
                mut samples,
                mut speech,
                mut quiet,
            } => {
                samples.extend_from_slice(frame);
                if energy > self.threshold {
                    speech += len;
                    quiet = 0;
                } else {
                    quiet += len;
                }

                let paused = quiet >= self.limits.pause;
                let capped = samples.len() >= self.limits.max_phrase;

                if paused || capped {
                    if speech < self.limits.min_phrase {
                        (Self::waiting(), VadEvent::Waiting)
                    } else {
                        (Self::waiting(), VadEvent::Phrase(samples))
                    }
                } else {
                    (
                        State::Speaking {
                            samples,
                            speech,
                            quiet,
                        },
                        VadEvent::Speaking,
                    )
                }
            }
        };

        self.state = next;
        event
    }
}
