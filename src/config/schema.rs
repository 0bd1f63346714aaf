//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::controls::SLIDERS;
use crate::envelope::EnvelopeParameters;
use crate::mapping::SoundMapper;

/// Main configuration for the sculpture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SculptureConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Master output settings
    #[serde(default)]
    pub master: MasterConfig,

    /// Starting envelope parameters
    #[serde(default)]
    pub envelope: EnvelopeParameters,

    /// Envelope-to-sound coefficients
    #[serde(default)]
    pub sound: SoundMapper,
}

impl SculptureConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if !(0.0..=1.0).contains(&self.master.volume) {
            bail!("Master volume must be between 0.0 and 1.0");
        }

        for slider in &SLIDERS {
            if !slider.contains(&self.envelope) {
                bail!(
                    "Envelope {} must be between {} and {}",
                    slider.param,
                    slider.format(slider.min),
                    slider.format(slider.max)
                );
            }
        }

        let sound = &self.sound;
        let coefficients = [
            sound.base_frequency,
            sound.frequency_per_attack,
            sound.detune_per_release,
            sound.detune_offset,
            sound.gain_per_sustain,
        ];
        if coefficients.iter().any(|c| !c.is_finite()) {
            bail!("Sound coefficients must be finite numbers");
        }
        if sound.base_frequency <= 0.0 {
            bail!("Base frequency must be positive");
        }
        if !(0.0..=1.0).contains(&sound.gain_per_sustain) {
            bail!("Gain per sustain must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz for offline rendering (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in frames requested from the device (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,

    /// Sample format for WAV rendering (default: float32)
    #[serde(default)]
    pub bit_depth: BitDepth,
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 512 }

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
            bit_depth: BitDepth::default(),
        }
    }
}

/// WAV sample formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BitDepth {
    /// 32-bit IEEE float
    #[default]
    Float32,
    /// 16-bit signed integer PCM
    Int16,
}

/// Master settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Master volume 0.0-1.0 (default: 0.8)
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_volume() -> f64 { 0.8 }

impl Default for MasterConfig {
    fn default() -> Self {
        Self { volume: default_volume() }
    }
}
