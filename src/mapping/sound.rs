//! Envelope-to-sound mapping
//!
//! Attack raises the pitch, decay picks the waveform, release detunes and
//! sustain sets the volume. Gain stays at zero unless playback is on.

use serde::{Deserialize, Serialize};

use crate::controls::Playback;
use crate::envelope::EnvelopeParameters;
use crate::synth::Waveform;

/// Live settings for the oscillator and its gain stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioSettings {
    /// Oscillator frequency in Hz, before detune
    pub frequency: f64,
    pub waveform: Waveform,
    /// Pitch offset in cents
    pub detune_cents: f64,
    /// Output gain, 0.0 while stopped
    pub gain: f64,
}

/// Maps envelope parameters to [`AudioSettings`]
///
/// The coefficients can be tuned from the `sound` section of the
/// configuration; the defaults give 440-640 Hz over attack 0-1, detune
/// -500..0 cents over release 0-5 and gain 0-0.3 over sustain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundMapper {
    /// Frequency at zero attack (default: 440 Hz)
    #[serde(default = "default_base_frequency")]
    pub base_frequency: f64,

    /// Hz added per second of attack (default: 200)
    #[serde(default = "default_frequency_per_attack")]
    pub frequency_per_attack: f64,

    /// Cents added per second of release (default: 100)
    #[serde(default = "default_detune_per_release")]
    pub detune_per_release: f64,

    /// Detune at zero release (default: -500 cents)
    #[serde(default = "default_detune_offset")]
    pub detune_offset: f64,

    /// Gain at full sustain (default: 0.3)
    #[serde(default = "default_gain_per_sustain")]
    pub gain_per_sustain: f64,
}

fn default_base_frequency() -> f64 { 440.0 }
fn default_frequency_per_attack() -> f64 { 200.0 }
fn default_detune_per_release() -> f64 { 100.0 }
fn default_detune_offset() -> f64 { -500.0 }
fn default_gain_per_sustain() -> f64 { 0.3 }

impl Default for SoundMapper {
    fn default() -> Self {
        Self {
            base_frequency: default_base_frequency(),
            frequency_per_attack: default_frequency_per_attack(),
            detune_per_release: default_detune_per_release(),
            detune_offset: default_detune_offset(),
            gain_per_sustain: default_gain_per_sustain(),
        }
    }
}

impl SoundMapper {
    /// Pick a waveform from a decay value in 0.0-1.0
    ///
    /// The range is split into four bands; decay 1.0 and above lands on the
    /// last one.
    pub fn waveform(decay: f64) -> Waveform {
        let index = ((decay * 3.99).floor().max(0.0) as usize).min(Waveform::ALL.len() - 1);
        Waveform::ALL[index]
    }

    pub fn map(&self, params: &EnvelopeParameters, playback: Playback) -> AudioSettings {
        let gain = match playback {
            Playback::Playing => params.sustain() * self.gain_per_sustain,
            Playback::Stopped => 0.0,
        };

        AudioSettings {
            frequency: self.base_frequency + params.attack() * self.frequency_per_attack,
            waveform: Self::waveform(params.decay()),
            detune_cents: params.release() * self.detune_per_release + self.detune_offset,
            gain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_scenario() {
        let settings = SoundMapper::default().map(&EnvelopeParameters::default(), Playback::Stopped);
        assert_eq!(settings.frequency, 540.0);
        assert_eq!(settings.waveform, Waveform::Triangle);
        assert_eq!(settings.detune_cents, -400.0);
        assert_eq!(settings.gain, 0.0);
    }

    #[test]
    fn test_gain_gated_by_playback() {
        let mapper = SoundMapper::default();
        let params = EnvelopeParameters::new(0.5, 0.5, 0.8, 1.0);
        assert_eq!(mapper.map(&params, Playback::Stopped).gain, 0.0);
        assert!((mapper.map(&params, Playback::Playing).gain - 0.24).abs() < 1e-12);
    }

    #[test]
    fn test_waveform_bands() {
        assert_eq!(SoundMapper::waveform(0.0), Waveform::Sine);
        assert_eq!(SoundMapper::waveform(0.25), Waveform::Sine);
        assert_eq!(SoundMapper::waveform(0.26), Waveform::Triangle);
        assert_eq!(SoundMapper::waveform(0.6), Waveform::Square);
        assert_eq!(SoundMapper::waveform(0.9), Waveform::Sawtooth);
        assert_eq!(SoundMapper::waveform(1.0), Waveform::Sawtooth);
    }

    #[test]
    fn test_waveform_index_always_valid() {
        for step in 0..=1000 {
            let decay = step as f64 / 1000.0;
            // Panics on an out-of-range index
            let _ = SoundMapper::waveform(decay);
        }
        assert_eq!(SoundMapper::waveform(7.5), Waveform::Sawtooth);
    }

    #[test]
    fn test_zero_attack_frequency() {
        let params = EnvelopeParameters::new(0.0, 0.0, 0.0, 0.0);
        let settings = SoundMapper::default().map(&params, Playback::Playing);
        assert_eq!(settings.frequency, 440.0);
        assert_eq!(settings.waveform, Waveform::Sine);
        assert_eq!(settings.detune_cents, -500.0);
        assert_eq!(settings.gain, 0.0);
    }

    #[test]
    fn test_release_range_spans_to_zero_detune() {
        let params = EnvelopeParameters::new(0.5, 0.5, 0.5, 5.0);
        let settings = SoundMapper::default().map(&params, Playback::Stopped);
        assert_eq!(settings.detune_cents, 0.0);
    }

    #[test]
    fn test_idempotent() {
        let mapper = SoundMapper::default();
        let params = EnvelopeParameters::new(0.35, 0.8, 0.4, 2.2);
        assert_eq!(mapper.map(&params, Playback::Playing), mapper.map(&params, Playback::Playing));
    }

    #[test]
    fn test_custom_coefficients_from_yaml() {
        let mapper: SoundMapper = serde_yaml::from_str("base_frequency: 220\ngain_per_sustain: 0.5\n").unwrap();
        assert_eq!(mapper.base_frequency, 220.0);
        assert_eq!(mapper.frequency_per_attack, 200.0);

        let settings = mapper.map(&EnvelopeParameters::default(), Playback::Playing);
        assert_eq!(settings.frequency, 320.0);
        assert_eq!(settings.gain, 0.25);
    }
}
