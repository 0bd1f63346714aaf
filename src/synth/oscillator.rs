//! Phase-accumulator oscillator

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Waveforms in order of increasing brightness
    pub const ALL: [Waveform; 4] = [Waveform::Sine, Waveform::Triangle, Waveform::Square, Waveform::Sawtooth];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single oscillator with live-settable frequency and waveform
///
/// Square and sawtooth use polyBLEP corrections at their discontinuities to
/// keep aliasing down at audible pitches.
pub struct Oscillator {
    waveform: Waveform,
    phase: f64,
    frequency: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Self {
            waveform,
            phase: 0.0,
            frequency: frequency.max(0.0),
            sample_rate,
        }
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency.max(0.0);
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Generate the next sample in -1.0..1.0
    pub fn generate(&mut self) -> f64 {
        let dt = self.frequency / self.sample_rate;
        let p = self.phase;

        let sample = match self.waveform {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Triangle => 4.0 * (p - 0.25 - (p - 0.25).floor() - 0.5).abs() - 1.0,
            Waveform::Square => {
                let naive = if p < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(p, dt) - poly_blep((p + 0.5).fract(), dt)
            }
            Waveform::Sawtooth => 2.0 * p - 1.0 - poly_blep(p, dt),
        };

        self.phase = (self.phase + dt).fract();
        sample
    }
}

/// Polynomial band-limited step residual around a discontinuity at phase 0
fn poly_blep(phase: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        0.0
    } else if phase < dt {
        let t = phase / dt;
        2.0 * t - t * t - 1.0
    } else if phase > 1.0 - dt {
        let t = (phase - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}
