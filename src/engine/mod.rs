//! Audio engine for the sculpture
//!
//! Owns the tone voice and applies master volume. The engine is shared with
//! the output stream behind a mutex; the UI thread pushes new settings in,
//! the audio callback pulls samples out.

mod player;
mod recorder;

pub use player::{default_device_name, list_output_devices, AudioError, Player};
pub use recorder::{render_to_wav, Recorder, RenderSummary};

use crate::config::SculptureConfig;
use crate::mapping::AudioSettings;
use crate::synth::{ToneVoice, Voice};

/// The main audio engine
pub struct Engine {
    voice: Box<dyn Voice>,
    sample_rate: f64,
    volume: f64,
}

impl Engine {
    /// Create a stopped engine
    pub fn new(config: &SculptureConfig, settings: &AudioSettings) -> Self {
        let sample_rate = config.audio.sample_rate as f64;

        Self {
            voice: Box::new(ToneVoice::new(settings, sample_rate)),
            sample_rate,
            volume: config.master.volume,
        }
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Change the sample rate, e.g. to match the output device
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.voice.set_sample_rate(sample_rate);
    }

    /// Push new oscillator and gain settings to the voice
    pub fn apply(&mut self, settings: &AudioSettings) {
        self.voice.apply(settings);
    }

    /// Start the oscillator
    pub fn start(&mut self) {
        self.voice.trigger();
    }

    /// Stop the oscillator
    pub fn stop(&mut self) {
        self.voice.release();
    }

    /// Check if the oscillator is running
    pub fn is_running(&self) -> bool {
        self.voice.is_active()
    }

    /// Generate the next sample
    pub fn process(&mut self) -> f64 {
        self.voice.process() * self.volume
    }

    /// Fill a buffer with samples
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }
}
