//! Envelope-to-curve mapping
//!
//! The sculpture's spine is a rising spiral sampled at 201 points. The curve
//! parameter `t` is split into three fixed phases (attack, decay, release);
//! sustain has no phase of its own and instead scales the overall height and
//! number of turns.

use glam::DVec3;
use std::f64::consts::TAU;

use crate::envelope::EnvelopeParameters;

/// Number of curve segments (the curve has one more point than this)
pub const SEGMENTS: usize = 200;

/// Fixed radius of the decay and release portions of the spiral
pub const SPIRAL_RADIUS: f64 = 1.2;

const ATTACK_END: f64 = 0.2;
const DECAY_END: f64 = 0.6;

/// A sampled spiral curve plus one tube radius multiplier per point
#[derive(Debug, Clone, PartialEq)]
pub struct CurveDescription {
    /// Curve points, `SEGMENTS + 1` of them
    pub points: Vec<DVec3>,

    /// Radius multiplier for the cross-section at each point
    pub radii: Vec<f64>,

    /// Starting radius of the attack phase
    pub base_radius: f64,

    /// Height reached at the end of the curve
    pub max_height: f64,

    /// Number of full turns the spiral makes
    pub spiral_turns: f64,
}

impl CurveDescription {
    /// Number of sampled points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check that no coordinate or multiplier is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite()) && self.radii.iter().all(|r| r.is_finite())
    }
}

/// Radius, height and multiplier at one point along the curve
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    radius: f64,
    height: f64,
    multiplier: f64,
}

/// Maps envelope parameters to the sculpture's spine curve
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryMapper;

impl GeometryMapper {
    pub fn new() -> Self {
        Self
    }

    /// Starting radius of the spiral, widened by attack
    pub fn base_radius(params: &EnvelopeParameters) -> f64 {
        0.8 + params.attack() * 0.4
    }

    /// Overall height of the spiral, raised by sustain
    pub fn max_height(params: &EnvelopeParameters) -> f64 {
        3.0 + params.sustain() * 2.0
    }

    /// Number of turns, increased by sustain
    pub fn spiral_turns(params: &EnvelopeParameters) -> f64 {
        1.5 + params.sustain() * 1.5
    }

    /// Sample the whole curve for the given parameters
    pub fn map(&self, params: &EnvelopeParameters) -> CurveDescription {
        let base_radius = Self::base_radius(params);
        let max_height = Self::max_height(params);
        let spiral_turns = Self::spiral_turns(params);

        let mut points = Vec::with_capacity(SEGMENTS + 1);
        let mut radii = Vec::with_capacity(SEGMENTS + 1);

        for i in 0..=SEGMENTS {
            let t = i as f64 / SEGMENTS as f64;
            let sample = sample(t, params, base_radius, max_height);

            let angle = t * spiral_turns * TAU;
            points.push(DVec3::new(
                angle.cos() * sample.radius,
                sample.height,
                angle.sin() * sample.radius,
            ));
            radii.push(sample.multiplier);
        }

        CurveDescription {
            points,
            radii,
            base_radius,
            max_height,
            spiral_turns,
        }
    }
}

fn sample(t: f64, params: &EnvelopeParameters, base_radius: f64, max_height: f64) -> Sample {
    if t <= ATTACK_END {
        // Expanding from a narrow start towards the base radius
        let p = t / ATTACK_END;
        Sample {
            radius: base_radius * (0.3 + p * 0.7),
            height: t * max_height * 0.3,
            multiplier: 0.8 + p * 0.4,
        }
    } else if t <= DECAY_END {
        // Higher decay flattens the multiplier falloff
        let p = (t - ATTACK_END) / (DECAY_END - ATTACK_END);
        let steepness = 1.0 - params.decay() * 0.5;
        Sample {
            radius: SPIRAL_RADIUS * (1.0 - p * 0.3),
            height: (0.3 + p * 0.4) * max_height,
            multiplier: 1.2 - (p * 0.4) * steepness,
        }
    } else {
        // Higher release pulls radius and multiplier harder towards zero
        let p = (t - DECAY_END) / (1.0 - DECAY_END);
        let taper = params.release() * 0.8;
        Sample {
            radius: SPIRAL_RADIUS * 0.7 * (1.0 - p * taper),
            height: (0.7 + p * 0.3) * max_height,
            multiplier: 0.8 - (p * 0.6) * taper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_point_count() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::default());
        assert_eq!(curve.len(), 201);
        assert_eq!(curve.radii.len(), 201);
    }

    #[test]
    fn test_default_scalars() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::default());
        assert!(close(curve.base_radius, 1.0));
        assert!(close(curve.max_height, 4.0));
        assert!(close(curve.spiral_turns, 2.25));
    }

    #[test]
    fn test_finite_across_domain() {
        let mapper = GeometryMapper::new();
        let corners = [0.0, 0.5, 1.0, 2.0, 5.0];
        for &a in &corners {
            for &d in &[0.0, 0.5, 1.0] {
                for &s in &[0.0, 0.3, 1.0] {
                    for &r in &corners {
                        let curve = mapper.map(&EnvelopeParameters::new(a, d, s, r));
                        assert_eq!(curve.len(), 201);
                        assert!(curve.is_finite(), "non-finite curve for {a} {d} {s} {r}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_first_point() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::default());
        // t = 0: angle 0, radius 0.3 * base, height 0
        let first = curve.points[0];
        assert!(close(first.x, 0.3));
        assert!(close(first.y, 0.0));
        assert!(close(first.z, 0.0));
        assert!(close(curve.radii[0], 0.8));
    }

    #[test]
    fn test_last_point_height() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::default());
        let last = curve.points[SEGMENTS];
        assert!(close(last.y, curve.max_height));
        // Release 1.0: multiplier tapers to 0.8 - 0.6 * 0.8
        assert!(close(curve.radii[SEGMENTS], 0.32));
    }

    #[test]
    fn test_heights_strictly_increase() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::new(0.0, 1.0, 0.0, 5.0));
        for pair in curve.points.windows(2) {
            assert!(pair[1].y > pair[0].y);
        }
    }

    #[test]
    fn test_sustain_raises_height_and_turns() {
        let mapper = GeometryMapper::new();
        let mut previous = mapper.map(&EnvelopeParameters::new(0.5, 0.5, 0.0, 1.0));
        assert!(close(previous.spiral_turns, 1.5));
        assert!(close(previous.max_height, 3.0));

        for step in 1..=10 {
            let sustain = step as f64 / 10.0;
            let curve = mapper.map(&EnvelopeParameters::new(0.5, 0.5, sustain, 1.0));
            assert!(curve.max_height > previous.max_height);
            assert!(curve.spiral_turns > previous.spiral_turns);
            previous = curve;
        }
    }

    #[test]
    fn test_decay_softens_falloff() {
        let mapper = GeometryMapper::new();
        let steep = mapper.map(&EnvelopeParameters::new(0.5, 0.0, 0.5, 1.0));
        let gentle = mapper.map(&EnvelopeParameters::new(0.5, 1.0, 0.5, 1.0));
        // End of the decay phase is index 120
        assert!(gentle.radii[120] > steep.radii[120]);
        assert!(close(steep.radii[120], 0.8));
        assert!(close(gentle.radii[120], 1.0));
    }

    #[test]
    fn test_release_strengthens_taper() {
        let mapper = GeometryMapper::new();
        let short = mapper.map(&EnvelopeParameters::new(0.5, 0.5, 0.5, 0.0));
        let long = mapper.map(&EnvelopeParameters::new(0.5, 0.5, 0.5, 1.0));
        assert!(close(short.radii[SEGMENTS], 0.8));
        assert!(long.radii[SEGMENTS] < short.radii[SEGMENTS]);
    }

    #[test]
    fn test_zero_attack_and_release_do_not_collapse() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::new(0.0, 0.0, 0.0, 0.0));
        assert!(close(curve.base_radius, 0.8));
        assert!(curve.points.iter().all(|p| p.x.hypot(p.z) > 0.2));
        assert!(curve.radii.iter().all(|&r| r >= 0.8 - 1e-9));
    }

    #[test]
    fn test_idempotent() {
        let mapper = GeometryMapper::new();
        let params = EnvelopeParameters::new(0.3, 0.7, 0.9, 2.5);
        assert_eq!(mapper.map(&params), mapper.map(&params));
    }
}
