//! Voice trait for sound generators

use crate::mapping::AudioSettings;

/// A sound generator driven by [`AudioSettings`]
pub trait Voice: Send + Sync {
    /// Apply new oscillator and gain settings; takes effect on the next sample
    fn apply(&mut self, settings: &AudioSettings);

    /// Start sounding
    fn trigger(&mut self);

    /// Stop sounding
    fn release(&mut self);

    /// Check if the voice is currently sounding
    fn is_active(&self) -> bool;

    /// Generate the next sample
    fn process(&mut self) -> f64;

    /// Set the sample rate
    fn set_sample_rate(&mut self, sample_rate: f64);
}
