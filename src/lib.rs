//! Sculpture - An ADSR envelope rendered as a spiral sculpture and a tone
//!
//! Four envelope sliders drive a 3D spiral tube with decorative details and,
//! from the same values, a continuous oscillator. Attack pitches the tone,
//! decay picks its waveform, sustain sets its loudness, release detunes it.

pub mod config;
pub mod controls;
pub mod engine;
pub mod envelope;
pub mod geometry;
pub mod mapping;
pub mod sculpture;
pub mod synth;
pub mod viz;

pub use config::SculptureConfig;
pub use engine::Engine;
pub use envelope::EnvelopeParameters;
pub use sculpture::Sculpture;
