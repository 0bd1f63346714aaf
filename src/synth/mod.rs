//! Synthesis for the sculpture's voice
//!
//! Contains the oscillator, the voice trait and the tone voice.

mod oscillator;
mod tone;
mod voice;

pub use oscillator::{Oscillator, Waveform};
pub use tone::{cents_to_ratio, ToneVoice};
pub use voice::Voice;
