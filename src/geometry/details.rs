//! Architectural details around the spiral
//!
//! Accent rods ringed around the base, a partial torus once sustain is high
//! enough, and a tapered base platform. All derived from the envelope.

use glam::{DQuat, DVec3};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::curve::GeometryMapper;
use super::mesh::MeshDescription;
use crate::envelope::EnvelopeParameters;

const ROD_RADIUS: f64 = 0.02;
const ROD_LENGTH: f64 = 0.5;
const ROD_HEIGHT: f64 = 0.25;
const ROD_SEGMENTS: usize = 8;

const RING_THRESHOLD: f64 = 0.3;
const RING_MAJOR_RADIUS: f64 = 0.8;
const RING_TUBE_RADIUS: f64 = 0.05;
const RING_RADIAL_SEGMENTS: usize = 8;
const RING_TUBULAR_SEGMENTS: usize = 32;

const PLATFORM_HEIGHT: f64 = 0.15;
const PLATFORM_SEGMENTS: usize = 32;

/// A decorative element placed around the sculpture
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecorativeElement {
    /// Thin vertical cylinder centred at `center`
    AccentRod {
        center: DVec3,
        radius: f64,
        length: f64,
    },
    /// Torus arc lying flat at `height`
    PartialRing {
        major_radius: f64,
        tube_radius: f64,
        /// Swept angle in radians
        arc: f64,
        height: f64,
        /// Rotation about the X axis that lays the arc flat
        tilt: f64,
    },
    /// Tapered cylinder under the spiral
    BasePlatform {
        top_radius: f64,
        bottom_radius: f64,
        height: f64,
        center_y: f64,
    },
}

impl DecorativeElement {
    /// Short name used for exported objects and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            DecorativeElement::AccentRod { .. } => "accent_rod",
            DecorativeElement::PartialRing { .. } => "partial_ring",
            DecorativeElement::BasePlatform { .. } => "base_platform",
        }
    }

    /// Tessellate the element into a mesh in sculpture space
    pub fn to_mesh(&self) -> MeshDescription {
        match *self {
            DecorativeElement::AccentRod { center, radius, length } => {
                let mut mesh = cylinder(radius, radius, length, ROD_SEGMENTS);
                mesh.transform(DQuat::IDENTITY, center);
                mesh
            }
            DecorativeElement::PartialRing { major_radius, tube_radius, arc, height, tilt } => {
                let mut mesh = torus_arc(major_radius, tube_radius, arc);
                mesh.transform(DQuat::from_rotation_x(tilt), DVec3::new(0.0, height, 0.0));
                mesh
            }
            DecorativeElement::BasePlatform { top_radius, bottom_radius, height, center_y } => {
                let mut mesh = cylinder(top_radius, bottom_radius, height, PLATFORM_SEGMENTS);
                mesh.transform(DQuat::IDENTITY, DVec3::new(0.0, center_y, 0.0));
                mesh
            }
        }
    }
}

/// Generates the decorative elements for a parameter set
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailGenerator;

impl DetailGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Number of accent rods: one more for every eighth of attack
    pub fn rod_count(params: &EnvelopeParameters) -> usize {
        (params.attack() * 8.0).floor() as usize + 4
    }

    pub fn generate(&self, params: &EnvelopeParameters) -> Vec<DecorativeElement> {
        let mut elements = Vec::new();

        let base_radius = GeometryMapper::base_radius(params);
        elements.push(DecorativeElement::BasePlatform {
            top_radius: base_radius,
            bottom_radius: base_radius * 0.8,
            height: PLATFORM_HEIGHT,
            center_y: -PLATFORM_HEIGHT / 2.0,
        });

        let count = Self::rod_count(params);
        let circle = 0.9 + params.attack() * 0.3;
        for i in 0..count {
            let angle = i as f64 / count as f64 * TAU;
            elements.push(DecorativeElement::AccentRod {
                center: DVec3::new(angle.cos() * circle, ROD_HEIGHT, angle.sin() * circle),
                radius: ROD_RADIUS,
                length: ROD_LENGTH,
            });
        }

        let sustain = params.sustain();
        if sustain > RING_THRESHOLD {
            elements.push(DecorativeElement::PartialRing {
                major_radius: RING_MAJOR_RADIUS,
                tube_radius: RING_TUBE_RADIUS,
                arc: PI * sustain * 2.0,
                height: 1.0 + sustain * 0.5,
                tilt: FRAC_PI_2,
            });
        }

        elements
    }
}

/// Closed cylinder along Y centred on the origin, 4 * `segments` triangles
fn cylinder(top_radius: f64, bottom_radius: f64, height: f64, segments: usize) -> MeshDescription {
    let mut mesh = MeshDescription::new();
    let half = height / 2.0;
    let ring = |radius: f64, y: f64, mesh: &mut MeshDescription| -> Vec<u32> {
        (0..segments)
            .map(|i| {
                let angle = i as f64 / segments as f64 * TAU;
                mesh.push_vertex(DVec3::new(angle.cos() * radius, y, angle.sin() * radius))
            })
            .collect()
    };

    // Side wall
    let top = ring(top_radius, half, &mut mesh);
    let bottom = ring(bottom_radius, -half, &mut mesh);
    for i in 0..segments {
        let next = (i + 1) % segments;
        mesh.push_triangle(top[i], top[next], bottom[i]);
        mesh.push_triangle(bottom[i], top[next], bottom[next]);
    }

    // Caps get their own vertices so their normals stay flat
    let top_center = mesh.push_vertex(DVec3::new(0.0, half, 0.0));
    let top_cap = ring(top_radius, half, &mut mesh);
    for i in 0..segments {
        mesh.push_triangle(top_center, top_cap[(i + 1) % segments], top_cap[i]);
    }
    let bottom_center = mesh.push_vertex(DVec3::new(0.0, -half, 0.0));
    let bottom_cap = ring(bottom_radius, -half, &mut mesh);
    for i in 0..segments {
        mesh.push_triangle(bottom_center, bottom_cap[i], bottom_cap[(i + 1) % segments]);
    }

    mesh.compute_vertex_normals();
    mesh
}

/// Torus arc in the XY plane starting on +X
fn torus_arc(major_radius: f64, tube_radius: f64, arc: f64) -> MeshDescription {
    let mut mesh = MeshDescription::new();
    let columns = RING_RADIAL_SEGMENTS + 1;

    for j in 0..=RING_TUBULAR_SEGMENTS {
        let u = j as f64 / RING_TUBULAR_SEGMENTS as f64 * arc;
        for i in 0..=RING_RADIAL_SEGMENTS {
            let v = i as f64 / RING_RADIAL_SEGMENTS as f64 * TAU;
            let reach = major_radius + tube_radius * v.cos();
            mesh.push_vertex(DVec3::new(reach * u.cos(), reach * u.sin(), tube_radius * v.sin()));
        }
    }

    for j in 0..RING_TUBULAR_SEGMENTS {
        for i in 0..RING_RADIAL_SEGMENTS {
            let a = (j * columns + i) as u32;
            let b = ((j + 1) * columns + i) as u32;
            let c = ((j + 1) * columns + i + 1) as u32;
            let d = (j * columns + i + 1) as u32;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh.compute_vertex_normals();
    mesh
}
