//! User-facing controls: four envelope sliders and the play/stop toggle
//!
//! Sliders work in UI units. Sustain is shown as a percentage (0-100) and
//! divided by 100 on its way into [`EnvelopeParameters`]; the time sliders
//! pass their value through unchanged.

use serde::Serialize;
use std::fmt;

use crate::envelope::{EnvelopeParameters, Param};

/// How a slider's value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Percent,
}

/// A range input bound to one envelope parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub param: Param,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: Unit,
}

/// The four sliders in display order
pub const SLIDERS: [Slider; 4] = [
    Slider { param: Param::Attack, label: "Attack", min: 0.0, max: 2.0, step: 0.05, unit: Unit::Seconds },
    Slider { param: Param::Decay, label: "Decay", min: 0.0, max: 1.0, step: 0.05, unit: Unit::Seconds },
    Slider { param: Param::Sustain, label: "Sustain", min: 0.0, max: 100.0, step: 1.0, unit: Unit::Percent },
    Slider { param: Param::Release, label: "Release", min: 0.0, max: 5.0, step: 0.1, unit: Unit::Seconds },
];

impl Slider {
    /// Look up the slider for a parameter
    pub fn for_param(param: Param) -> &'static Slider {
        match param {
            Param::Attack => &SLIDERS[0],
            Param::Decay => &SLIDERS[1],
            Param::Sustain => &SLIDERS[2],
            Param::Release => &SLIDERS[3],
        }
    }

    fn scale(&self) -> f64 {
        match self.unit {
            Unit::Seconds => 1.0,
            Unit::Percent => 100.0,
        }
    }

    /// Snap a UI value to the nearest step inside the range
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let steps = ((value.clamp(self.min, self.max) - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).min(self.max);
        // Trim float noise so 0.1 * 3 displays as 0.3
        (snapped * 1e6).round() / 1e6
    }

    /// The slider's UI value for a parameter set
    pub fn value(&self, params: &EnvelopeParameters) -> f64 {
        self.snap(params.get(self.param) * self.scale())
    }

    /// Apply a UI value, returning the updated parameters
    pub fn apply(&self, params: EnvelopeParameters, value: f64) -> EnvelopeParameters {
        params.with(self.param, self.snap(value) / self.scale())
    }

    /// Check that a parameter lies inside the slider's range
    pub fn contains(&self, params: &EnvelopeParameters) -> bool {
        let value = params.get(self.param) * self.scale();
        value >= self.min - 1e-9 && value <= self.max + 1e-9
    }

    /// Move the slider by a number of steps (negative moves down)
    pub fn nudge(&self, params: EnvelopeParameters, steps: i32) -> EnvelopeParameters {
        let value = self.value(&params) + steps as f64 * self.step;
        self.apply(params, value)
    }

    /// Display text for a UI value, e.g. `0.5s` or `50%`
    pub fn format(&self, value: f64) -> String {
        let value = self.snap(value);
        match self.unit {
            Unit::Seconds => format!("{}s", value),
            Unit::Percent => format!("{}%", value),
        }
    }

    /// Filled fraction of the track, 0.0-1.0
    pub fn fill(&self, value: f64) -> f64 {
        (self.snap(value) - self.min) / (self.max - self.min)
    }
}

/// Play/stop state
///
/// Only an explicit toggle moves between the two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
}

impl Playback {
    pub fn toggled(self) -> Self {
        match self {
            Playback::Stopped => Playback::Playing,
            Playback::Playing => Playback::Stopped,
        }
    }

    pub fn is_playing(self) -> bool {
        self == Playback::Playing
    }

    /// Label for the toggle button: the action it will perform
    pub fn button_label(self) -> &'static str {
        match self {
            Playback::Stopped => "Play",
            Playback::Playing => "Stop",
        }
    }
}

impl fmt::Display for Playback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Playback::Stopped => f.write_str("stopped"),
            Playback::Playing => f.write_str("playing"),
        }
    }
}
