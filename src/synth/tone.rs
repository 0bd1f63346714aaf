//! Single-oscillator tone voice
//!
//! One oscillator into one gain stage. Frequency, waveform, detune and gain
//! are all live-settable; gain glides to its target over a few milliseconds
//! so slider moves and play/stop do not click.

use super::{Oscillator, Voice, Waveform};
use crate::mapping::AudioSettings;

/// Time constant of the gain glide in seconds
const GAIN_GLIDE: f64 = 0.005;

/// Convert a detune in cents to a frequency ratio
pub fn cents_to_ratio(cents: f64) -> f64 {
    2.0_f64.powf(cents / 1200.0)
}

/// An oscillator with detune and a smoothed gain stage
pub struct ToneVoice {
    oscillator: Oscillator,
    sample_rate: f64,
    frequency: f64,
    detune_cents: f64,
    target_gain: f64,
    gain: f64,
    glide_coefficient: f64,
    active: bool,
}

impl ToneVoice {
    /// Create a stopped voice with the given settings
    pub fn new(settings: &AudioSettings, sample_rate: f64) -> Self {
        let mut voice = Self {
            oscillator: Oscillator::new(settings.waveform, settings.frequency, sample_rate),
            sample_rate,
            frequency: settings.frequency,
            detune_cents: settings.detune_cents,
            target_gain: settings.gain,
            gain: 0.0,
            glide_coefficient: glide_coefficient(sample_rate),
            active: false,
        };
        voice.apply(settings);
        voice
    }

    /// Frequency actually produced after detune
    pub fn effective_frequency(&self) -> f64 {
        self.frequency * cents_to_ratio(self.detune_cents)
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    /// The gain the voice is gliding towards
    pub fn target_gain(&self) -> f64 {
        self.target_gain
    }

    /// The gain applied to the current sample
    pub fn current_gain(&self) -> f64 {
        self.gain
    }
}

fn glide_coefficient(sample_rate: f64) -> f64 {
    1.0 - (-1.0 / (GAIN_GLIDE * sample_rate)).exp()
}

impl Voice for ToneVoice {
    fn apply(&mut self, settings: &AudioSettings) {
        self.frequency = settings.frequency;
        self.detune_cents = settings.detune_cents;
        self.target_gain = settings.gain.max(0.0);
        self.oscillator.set_waveform(settings.waveform);
        self.oscillator.set_frequency(self.effective_frequency());
    }

    fn trigger(&mut self) {
        if !self.active {
            self.oscillator.reset();
            self.gain = 0.0;
        }
        self.active = true;
    }

    fn release(&mut self) {
        self.active = false;
        self.gain = 0.0;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn process(&mut self) -> f64 {
        if !self.active {
            return 0.0;
        }

        self.gain += (self.target_gain - self.gain) * self.glide_coefficient;
        self.oscillator.generate() * self.gain
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.glide_coefficient = glide_coefficient(sample_rate);
        self.oscillator.set_sample_rate(sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(gain: f64) -> AudioSettings {
        AudioSettings {
            frequency: 540.0,
            waveform: Waveform::Triangle,
            detune_cents: -400.0,
            gain,
        }
    }

    #[test]
    fn test_cents_to_ratio() {
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-12);
        assert!((cents_to_ratio(-1200.0) - 0.5).abs() < 1e-12);
        assert_eq!(cents_to_ratio(0.0), 1.0);
    }

    #[test]
    fn test_detune_lowers_pitch() {
        let voice = ToneVoice::new(&settings(0.15), 44100.0);
        // -400 cents is a major third down
        let expected = 540.0 * 2.0_f64.powf(-400.0 / 1200.0);
        assert!((voice.effective_frequency() - expected).abs() < 1e-9);
        assert_eq!(voice.waveform(), Waveform::Triangle);
    }

    #[test]
    fn test_silent_until_triggered() {
        let mut voice = ToneVoice::new(&settings(0.15), 44100.0);
        assert!(!voice.is_active());
        assert!((0..100).all(|_| voice.process() == 0.0));
    }

    #[test]
    fn test_gain_glides_to_target() {
        let mut voice = ToneVoice::new(&settings(0.15), 44100.0);
        voice.trigger();

        let mut peak = 0.0f64;
        for _ in 0..4410 {
            peak = peak.max(voice.process().abs());
        }
        assert!((voice.current_gain() - 0.15).abs() < 1e-6);
        assert!(peak > 0.1 && peak <= 0.15 + 1e-9);
    }

    #[test]
    fn test_release_silences() {
        let mut voice = ToneVoice::new(&settings(0.15), 44100.0);
        voice.trigger();
        for _ in 0..100 {
            voice.process();
        }
        voice.release();
        assert!(!voice.is_active());
        assert_eq!(voice.process(), 0.0);
    }

    #[test]
    fn test_zero_gain_is_silent_while_active() {
        let mut voice = ToneVoice::new(&settings(0.0), 44100.0);
        voice.trigger();
        assert!((0..1000).all(|_| voice.process() == 0.0));
    }

    #[test]
    fn test_apply_updates_live() {
        let mut voice = ToneVoice::new(&settings(0.15), 44100.0);
        voice.apply(&AudioSettings {
            frequency: 640.0,
            waveform: Waveform::Sawtooth,
            detune_cents: 0.0,
            gain: 0.3,
        });
        assert_eq!(voice.effective_frequency(), 640.0);
        assert_eq!(voice.waveform(), Waveform::Sawtooth);
        assert_eq!(voice.target_gain(), 0.3);
    }
}
