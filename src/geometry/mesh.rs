//! Indexed triangle meshes

use glam::{DQuat, DVec3, Vec3};
use std::io::{self, Write};

/// An indexed triangle mesh with per-vertex normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDescription {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl MeshDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Add a vertex and return its index
    pub fn push_vertex(&mut self, position: DVec3) -> u32 {
        self.positions.push(position.as_vec3());
        self.normals.push(Vec3::ZERO);
        (self.positions.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Rotate then translate every vertex (and rotate normals)
    pub fn transform(&mut self, rotation: DQuat, offset: DVec3) {
        let rotation_f = rotation.as_quat();
        let offset_f = offset.as_vec3();
        for position in &mut self.positions {
            *position = rotation_f * *position + offset_f;
        }
        for normal in &mut self.normals {
            *normal = rotation_f * *normal;
        }
    }

    /// Recompute vertex normals from the faces
    ///
    /// Face normals are accumulated unnormalized, so larger faces weigh more.
    /// Vertices that touch only degenerate faces keep a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];

        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let pa = self.positions[a];
            let face = (self.positions[b] - pa).cross(self.positions[c] - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        self.normals = accumulated.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Append another mesh, offsetting its indices
    pub fn append(&mut self, other: &MeshDescription) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.triangles
            .extend(other.triangles.iter().map(|t| [t[0] + base, t[1] + base, t[2] + base]));
    }

    /// Check that every position and normal is finite
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite()) && self.normals.iter().all(|n| n.is_finite())
    }

    /// Write this mesh as one Wavefront OBJ object
    ///
    /// `first_vertex` is the 1-based OBJ index of this mesh's first vertex,
    /// so several meshes can share one file. Returns the index following the
    /// last vertex written.
    pub fn write_obj<W: Write>(&self, out: &mut W, name: &str, first_vertex: usize) -> io::Result<usize> {
        writeln!(out, "o {}", name)?;
        for p in &self.positions {
            writeln!(out, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
        }
        for n in &self.normals {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
        }
        for t in &self.triangles {
            let [a, b, c] = t.map(|i| i as usize + first_vertex);
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        Ok(first_vertex + self.positions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshDescription {
        let mut mesh = MeshDescription::new();
        let a = mesh.push_vertex(DVec3::new(0.0, 0.0, 0.0));
        let b = mesh.push_vertex(DVec3::new(1.0, 0.0, 0.0));
        let c = mesh.push_vertex(DVec3::new(1.0, 1.0, 0.0));
        let d = mesh.push_vertex(DVec3::new(0.0, 1.0, 0.0));
        mesh.push_triangle(a, b, c);
        mesh.push_triangle(a, c, d);
        mesh
    }

    #[test]
    fn test_normals_follow_winding() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_face_gives_zero_normal() {
        let mut mesh = MeshDescription::new();
        let a = mesh.push_vertex(DVec3::ZERO);
        let b = mesh.push_vertex(DVec3::ZERO);
        let c = mesh.push_vertex(DVec3::ZERO);
        mesh.push_triangle(a, b, c);
        mesh.compute_vertex_normals();
        assert!(mesh.is_finite());
        assert_eq!(mesh.normals[0], Vec3::ZERO);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut mesh = quad();
        mesh.append(&quad());
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.triangles[2], [4, 5, 6]);
    }

    #[test]
    fn test_transform() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        mesh.transform(DQuat::from_rotation_x(std::f64::consts::FRAC_PI_2), DVec3::new(0.0, 2.0, 0.0));
        // +Z normal rotated a quarter turn about X points down -Y
        assert!((mesh.normals[0] - Vec3::NEG_Y).length() < 1e-6);
        assert!((mesh.positions[0] - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_write_obj() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        let mut out = Vec::new();
        let next = mesh.write_obj(&mut out, "quad", 1).unwrap();
        assert_eq!(next, 5);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("o quad\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 4);
        assert!(text.contains("f 1//1 3//3 4//4"));
    }
}
