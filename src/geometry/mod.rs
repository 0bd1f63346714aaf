//! Procedural geometry for the sculpture
//!
//! The envelope drives a spiral curve, a tube swept along it, and a handful
//! of decorative elements around the base.

mod curve;
mod details;
mod mesh;
mod tube;

pub use curve::{CurveDescription, GeometryMapper, SEGMENTS, SPIRAL_RADIUS};
pub use details::{DecorativeElement, DetailGenerator};
pub use mesh::MeshDescription;
pub use tube::{sweep, RADIAL_SEGMENTS, TUBE_RADIUS};

use std::io::{self, Write};

/// Everything the scene needs to draw the sculpture
#[derive(Debug, Clone, PartialEq)]
pub struct SculptureModel {
    pub curve: CurveDescription,
    pub tube: MeshDescription,
    pub details: Vec<DecorativeElement>,
}

impl SculptureModel {
    /// Number of scene objects: the tube plus each decorative element
    pub fn object_count(&self) -> usize {
        1 + self.details.len()
    }

    /// Total triangles across the tube and tessellated details
    pub fn triangle_count(&self) -> usize {
        self.tube.triangle_count()
            + self.details.iter().map(|d| d.to_mesh().triangle_count()).sum::<usize>()
    }

    /// Write the whole sculpture as a Wavefront OBJ file, one object per element
    pub fn write_obj<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "# envelope sculpture")?;
        writeln!(
            out,
            "# base radius {:.3}, height {:.3}, turns {:.3}",
            self.curve.base_radius, self.curve.max_height, self.curve.spiral_turns
        )?;

        let mut next = self.tube.write_obj(out, "spiral_tube", 1)?;
        for (i, detail) in self.details.iter().enumerate() {
            let name = format!("{}_{}", detail.name(), i);
            next = detail.to_mesh().write_obj(out, &name, next)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeParameters;

    fn model(params: EnvelopeParameters) -> SculptureModel {
        let curve = GeometryMapper::new().map(&params);
        let tube = sweep(&curve);
        let details = DetailGenerator::new().generate(&params);
        SculptureModel { curve, tube, details }
    }

    #[test]
    fn test_default_counts() {
        let model = model(EnvelopeParameters::default());
        // tube + platform + 8 rods + ring
        assert_eq!(model.object_count(), 11);
        assert_eq!(model.triangle_count(), 6400 + 128 + 8 * 32 + 512);
    }

    #[test]
    fn test_write_obj_objects() {
        let model = model(EnvelopeParameters::new(0.0, 0.5, 0.2, 1.0));
        let mut out = Vec::new();
        model.write_obj(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let objects: Vec<&str> = text.lines().filter(|l| l.starts_with("o ")).collect();
        assert_eq!(objects.len(), model.object_count());
        assert_eq!(objects[0], "o spiral_tube");
        assert_eq!(objects[1], "o base_platform_0");
        assert!(!text.contains("partial_ring"));

        // Face indices never exceed the vertex count
        let vertices = text.lines().filter(|l| l.starts_with("v ")).count();
        let max_index = text
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l[2..].split_whitespace())
            .map(|f| f.split("//").next().unwrap().parse::<usize>().unwrap())
            .max()
            .unwrap();
        assert_eq!(max_index, vertices);
    }
}
