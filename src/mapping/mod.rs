//! Mapping from envelope parameters to audio settings
//!
//! The geometry side of the mapping lives in [`crate::geometry`].

mod sound;

pub use sound::{AudioSettings, SoundMapper};
