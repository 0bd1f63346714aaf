//! The sculpture: current parameters plus everything derived from them
//!
//! Every change rebuilds the curve, tube, details and audio settings before
//! returning, so the derived state never lags behind the parameters.

use serde::Serialize;

use crate::controls::Playback;
use crate::envelope::{EnvelopeParameters, Param};
use crate::geometry::{
    sweep, CurveDescription, DecorativeElement, DetailGenerator, GeometryMapper, MeshDescription,
    SculptureModel,
};
use crate::mapping::{AudioSettings, SoundMapper};

/// Scene size figures for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneStats {
    pub objects: usize,
    pub triangles: usize,
}

/// Composition root tying the mappers to the current parameters
pub struct Sculpture {
    params: EnvelopeParameters,
    playback: Playback,
    geometry: GeometryMapper,
    details: DetailGenerator,
    sound: SoundMapper,
    model: SculptureModel,
    audio: AudioSettings,
}

impl Sculpture {
    /// Create a stopped sculpture and derive its initial state
    pub fn new(params: EnvelopeParameters, sound: SoundMapper) -> Self {
        let geometry = GeometryMapper::new();
        let details = DetailGenerator::new();
        let playback = Playback::Stopped;

        Self {
            model: build_model(&geometry, &details, &params),
            audio: sound.map(&params, playback),
            params,
            playback,
            geometry,
            details,
            sound,
        }
    }

    pub fn params(&self) -> EnvelopeParameters {
        self.params
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Change one parameter and regenerate everything
    pub fn set(&mut self, param: Param, value: f64) {
        self.set_params(self.params.with(param, value));
    }

    /// Replace all parameters and regenerate everything
    pub fn set_params(&mut self, params: EnvelopeParameters) {
        self.params = params;
        self.model = build_model(&self.geometry, &self.details, &self.params);
        self.audio = self.sound.map(&self.params, self.playback);
    }

    /// Flip between stopped and playing; returns the new state
    pub fn toggle_playback(&mut self) -> Playback {
        self.playback = self.playback.toggled();
        self.audio = self.sound.map(&self.params, self.playback);
        self.playback
    }

    pub fn curve(&self) -> &CurveDescription {
        &self.model.curve
    }

    pub fn mesh(&self) -> &MeshDescription {
        &self.model.tube
    }

    pub fn details(&self) -> &[DecorativeElement] {
        &self.model.details
    }

    pub fn model(&self) -> &SculptureModel {
        &self.model
    }

    pub fn audio_settings(&self) -> &AudioSettings {
        &self.audio
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            objects: self.model.object_count(),
            triangles: self.model.triangle_count(),
        }
    }
}

impl Default for Sculpture {
    fn default() -> Self {
        Self::new(EnvelopeParameters::default(), SoundMapper::default())
    }
}

fn build_model(
    geometry: &GeometryMapper,
    details: &DetailGenerator,
    params: &EnvelopeParameters,
) -> SculptureModel {
    let curve = geometry.map(params);
    let tube = sweep(&curve);
    SculptureModel {
        curve,
        tube,
        details: details.generate(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Waveform;

    #[test]
    fn test_default_scenario() {
        let sculpture = Sculpture::default();
        let curve = sculpture.curve();
        assert!((curve.base_radius - 1.0).abs() < 1e-12);
        assert_eq!(curve.max_height, 4.0);
        assert_eq!(curve.spiral_turns, 2.25);

        let audio = sculpture.audio_settings();
        assert_eq!(audio.frequency, 540.0);
        assert_eq!(audio.waveform, Waveform::Triangle);
        assert_eq!(audio.detune_cents, -400.0);
        assert_eq!(audio.gain, 0.0);
        assert_eq!(sculpture.playback(), Playback::Stopped);
    }

    #[test]
    fn test_toggle_playback_gates_gain() {
        let mut sculpture = Sculpture::default();

        assert_eq!(sculpture.toggle_playback(), Playback::Playing);
        assert!(sculpture.is_playing());
        assert!((sculpture.audio_settings().gain - 0.15).abs() < 1e-12);

        assert_eq!(sculpture.toggle_playback(), Playback::Stopped);
        assert_eq!(sculpture.audio_settings().gain, 0.0);
    }

    #[test]
    fn test_set_regenerates_everything() {
        let mut sculpture = Sculpture::default();
        sculpture.toggle_playback();
        sculpture.set(Param::Sustain, 1.0);

        assert_eq!(sculpture.curve().max_height, 5.0);
        assert_eq!(sculpture.curve().spiral_turns, 3.0);
        assert!((sculpture.audio_settings().gain - 0.3).abs() < 1e-12);

        sculpture.set(Param::Attack, 0.0);
        let rods = sculpture
            .details()
            .iter()
            .filter(|d| matches!(d, DecorativeElement::AccentRod { .. }))
            .count();
        assert_eq!(rods, 4);
        assert_eq!(sculpture.audio_settings().frequency, 440.0);

        // Derived state matches a fresh sculpture built from the same parameters
        let mut fresh = Sculpture::new(sculpture.params(), SoundMapper::default());
        fresh.toggle_playback();
        assert_eq!(fresh.model(), sculpture.model());
        assert_eq!(fresh.audio_settings(), sculpture.audio_settings());
    }

    #[test]
    fn test_ring_appears_with_sustain() {
        let mut sculpture = Sculpture::default();
        sculpture.set(Param::Sustain, 0.3);
        let before = sculpture.stats();
        sculpture.set(Param::Sustain, 0.30001);
        let after = sculpture.stats();
        assert_eq!(after.objects, before.objects + 1);
        assert_eq!(after.triangles, before.triangles + 512);
    }

    #[test]
    fn test_default_stats() {
        let stats = Sculpture::default().stats();
        assert_eq!(stats.objects, 11);
        assert_eq!(stats.triangles, 6400 + 128 + 256 + 512);
    }
}
