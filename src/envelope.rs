//! Envelope parameters shared by every mapper
//!
//! A single immutable value: attack, decay and release in seconds, sustain as
//! a level in 0.0-1.0. Changing one parameter builds a new value.

use serde::{Deserialize, Serialize};
use std::fmt;

const DEFAULT_ATTACK: f64 = 0.5;
const DEFAULT_DECAY: f64 = 0.5;
const DEFAULT_SUSTAIN: f64 = 0.5;
const DEFAULT_RELEASE: f64 = 1.0;

/// One of the four envelope parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    Attack,
    Decay,
    Sustain,
    Release,
}

impl Param {
    /// All parameters in slider order
    pub const ALL: [Param; 4] = [Param::Attack, Param::Decay, Param::Sustain, Param::Release];

    pub fn name(self) -> &'static str {
        match self {
            Param::Attack => "attack",
            Param::Decay => "decay",
            Param::Sustain => "sustain",
            Param::Release => "release",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ADSR envelope parameters
///
/// Always inside the legal domain: times are non-negative and sustain is a
/// level in 0.0-1.0. Values deserialized from configuration go through
/// [`EnvelopeParameters::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEnvelope")]
pub struct EnvelopeParameters {
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
}

impl EnvelopeParameters {
    /// Build a parameter set, clamping every field into its legal range
    ///
    /// Non-finite inputs fall back to that field's default.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack: time(attack, DEFAULT_ATTACK),
            decay: time(decay, DEFAULT_DECAY),
            sustain: level(sustain, DEFAULT_SUSTAIN),
            release: time(release, DEFAULT_RELEASE),
        }
    }

    pub fn attack(&self) -> f64 {
        self.attack
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn sustain(&self) -> f64 {
        self.sustain
    }

    pub fn release(&self) -> f64 {
        self.release
    }

    /// Read one parameter by name
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::Attack => self.attack,
            Param::Decay => self.decay,
            Param::Sustain => self.sustain,
            Param::Release => self.release,
        }
    }

    /// Copy of these parameters with one field replaced (and clamped)
    pub fn with(self, param: Param, value: f64) -> Self {
        let Self { attack, decay, sustain, release } = self;
        match param {
            Param::Attack => Self::new(value, decay, sustain, release),
            Param::Decay => Self::new(attack, value, sustain, release),
            Param::Sustain => Self::new(attack, decay, value, release),
            Param::Release => Self::new(attack, decay, sustain, value),
        }
    }
}

impl Default for EnvelopeParameters {
    fn default() -> Self {
        Self::new(DEFAULT_ATTACK, DEFAULT_DECAY, DEFAULT_SUSTAIN, DEFAULT_RELEASE)
    }
}

fn time(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

fn level(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Unvalidated form used for deserialization
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default = "default_attack")]
    attack: f64,
    #[serde(default = "default_decay")]
    decay: f64,
    #[serde(default = "default_sustain")]
    sustain: f64,
    #[serde(default = "default_release")]
    release: f64,
}

fn default_attack() -> f64 { DEFAULT_ATTACK }
fn default_decay() -> f64 { DEFAULT_DECAY }
fn default_sustain() -> f64 { DEFAULT_SUSTAIN }
fn default_release() -> f64 { DEFAULT_RELEASE }

impl From<RawEnvelope> for EnvelopeParameters {
    fn from(raw: RawEnvelope) -> Self {
        Self::new(raw.attack, raw.decay, raw.sustain, raw.release)
    }
}
