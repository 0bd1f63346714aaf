//! Tube sweep along the sculpture curve
//!
//! A circular cross-section is carried along the curve on parallel-transported
//! frames. Each ring is scaled by the curve's radius multiplier at that point.

use glam::{DQuat, DVec3, Vec3};
use std::f64::consts::TAU;

use super::curve::CurveDescription;
use super::mesh::MeshDescription;

/// Radius of the unscaled cross-section
pub const TUBE_RADIUS: f64 = 0.15;

/// Vertices per cross-section ring
pub const RADIAL_SEGMENTS: usize = 16;

/// Normal and binormal of the sweep frame at one curve point
#[derive(Debug, Clone, Copy)]
struct Frame {
    normal: DVec3,
    binormal: DVec3,
}

/// Sweep the tube mesh for a curve
///
/// Negative radius multipliers are floored at zero so the ring collapses to
/// its centre point rather than turning inside out.
pub fn sweep(curve: &CurveDescription) -> MeshDescription {
    let frames = frames(&curve.points);
    let mut mesh = MeshDescription::new();

    for ((&center, &multiplier), frame) in curve.points.iter().zip(&curve.radii).zip(&frames) {
        let radius = TUBE_RADIUS * multiplier.max(0.0);
        for j in 0..RADIAL_SEGMENTS {
            let angle = j as f64 / RADIAL_SEGMENTS as f64 * TAU;
            let offset = frame.normal * angle.cos() * radius + frame.binormal * angle.sin() * radius;
            mesh.push_vertex(center + offset);
        }
    }

    let ring = RADIAL_SEGMENTS as u32;
    for i in 0..curve.points.len().saturating_sub(1) as u32 {
        for j in 0..ring {
            let next = (j + 1) % ring;
            let a = i * ring + j;
            let b = (i + 1) * ring + j;
            let c = (i + 1) * ring + next;
            let d = i * ring + next;
            mesh.push_triangle(a, d, b);
            mesh.push_triangle(b, d, c);
        }
    }

    mesh.compute_vertex_normals();

    // Collapsed rings have no face area to derive a normal from
    for (i, frame) in frames.iter().enumerate() {
        for j in 0..RADIAL_SEGMENTS {
            let index = i * RADIAL_SEGMENTS + j;
            if mesh.normals[index] == Vec3::ZERO {
                let angle = j as f64 / RADIAL_SEGMENTS as f64 * TAU;
                let radial = frame.normal * angle.cos() + frame.binormal * angle.sin();
                mesh.normals[index] = radial.as_vec3();
            }
        }
    }

    mesh
}

fn tangents(points: &[DVec3]) -> Vec<DVec3> {
    let last = points.len().saturating_sub(1);
    (0..points.len())
        .map(|i| {
            let ahead = points[(i + 1).min(last)];
            let behind = points[i.saturating_sub(1)];
            (ahead - behind).normalize_or_zero()
        })
        .collect()
}

fn frames(points: &[DVec3]) -> Vec<Frame> {
    let tangents = tangents(points);
    let Some(&first) = tangents.first() else {
        return Vec::new();
    };

    // Start from the axis least aligned with the first tangent
    let abs = first.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        DVec3::X
    } else if abs.y <= abs.z {
        DVec3::Y
    } else {
        DVec3::Z
    };
    let side = first.cross(axis).normalize_or_zero();
    let mut normal = first.cross(side);

    let mut frames = Vec::with_capacity(tangents.len());
    frames.push(Frame {
        normal,
        binormal: first.cross(normal),
    });

    for pair in tangents.windows(2) {
        let (previous, current) = (pair[0], pair[1]);
        let axis = previous.cross(current);
        if axis.length() > f64::EPSILON {
            let theta = previous.dot(current).clamp(-1.0, 1.0).acos();
            normal = DQuat::from_axis_angle(axis.normalize(), theta) * normal;
        }
        frames.push(Frame {
            normal,
            binormal: current.cross(normal),
        });
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeParameters;
    use crate::geometry::curve::{GeometryMapper, SEGMENTS};

    fn tube(params: EnvelopeParameters) -> (CurveDescription, MeshDescription) {
        let curve = GeometryMapper::new().map(&params);
        let mesh = sweep(&curve);
        (curve, mesh)
    }

    #[test]
    fn test_counts() {
        let (_, mesh) = tube(EnvelopeParameters::default());
        assert_eq!(mesh.vertex_count(), (SEGMENTS + 1) * RADIAL_SEGMENTS);
        assert_eq!(mesh.triangle_count(), SEGMENTS * RADIAL_SEGMENTS * 2);
        assert_eq!(mesh.triangle_count(), 6400);
    }

    #[test]
    fn test_indices_in_range() {
        let (_, mesh) = tube(EnvelopeParameters::default());
        let count = mesh.vertex_count() as u32;
        assert!(mesh.triangles.iter().flatten().all(|&i| i < count));
    }

    #[test]
    fn test_ring_radius_follows_multiplier() {
        let (curve, mesh) = tube(EnvelopeParameters::default());
        for (i, (&center, &multiplier)) in curve.points.iter().zip(&curve.radii).enumerate() {
            let expected = TUBE_RADIUS * multiplier.max(0.0);
            for j in 0..RADIAL_SEGMENTS {
                let vertex = mesh.positions[i * RADIAL_SEGMENTS + j].as_dvec3();
                let distance = (vertex - center).length();
                assert!((distance - expected).abs() < 1e-4, "ring {i} vertex {j}: {distance} vs {expected}");
            }
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let (curve, mesh) = tube(EnvelopeParameters::default());
        // Skip the open ends, where a ring only has faces on one side, and the
        // attack/decay seam at index 40, where radius and height jump
        for i in (1..SEGMENTS).filter(|i| !(38..=42).contains(i)) {
            let center = curve.points[i].as_vec3();
            for j in 0..RADIAL_SEGMENTS {
                let index = i * RADIAL_SEGMENTS + j;
                let outward = mesh.positions[index] - center;
                assert!(mesh.normals[index].dot(outward) > 0.0, "ring {i} vertex {j}");
            }
        }
    }

    #[test]
    fn test_frames_are_orthonormal() {
        let curve = GeometryMapper::new().map(&EnvelopeParameters::default());
        let tangents = tangents(&curve.points);
        for (frame, tangent) in frames(&curve.points).iter().zip(&tangents) {
            assert!((frame.normal.length() - 1.0).abs() < 1e-9);
            assert!((frame.binormal.length() - 1.0).abs() < 1e-9);
            assert!(frame.normal.dot(*tangent).abs() < 1e-9);
            assert!(frame.binormal.dot(frame.normal).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extreme_release_stays_finite() {
        // Release 5 drives the end multipliers negative
        let (curve, mesh) = tube(EnvelopeParameters::new(0.0, 1.0, 1.0, 5.0));
        assert!(curve.radii[SEGMENTS] < 0.0);
        assert!(mesh.is_finite());
        assert!(mesh.normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-3));

        // Negative multipliers collapse the ring onto its centre
        let mut collapsed = 0;
        for (i, (&center, &multiplier)) in curve.points.iter().zip(&curve.radii).enumerate() {
            let expected = TUBE_RADIUS * multiplier.max(0.0);
            if multiplier < 0.0 {
                collapsed += 1;
            }
            for j in 0..RADIAL_SEGMENTS {
                let vertex = mesh.positions[i * RADIAL_SEGMENTS + j].as_dvec3();
                let distance = (vertex - center).length();
                assert!((distance - expected).abs() < 1e-4, "ring {i} vertex {j}: {distance} vs {expected}");
            }
        }
        assert!(collapsed > 0);
    }
}
