//! Side-on projection of the sculpture for ratatui

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Widget},
};

use glam::{DQuat, DVec3};

use crate::geometry::{CurveDescription, DecorativeElement};

/// Points sampled along the partial ring's arc
const RING_STEPS: usize = 48;

/// A widget that draws the spiral, rods and base seen from the side,
/// rotated about the vertical axis
pub struct SculptureView<'a> {
    curve: &'a CurveDescription,
    details: &'a [DecorativeElement],
    rotation: f64,
    style: Style,
    block: Option<Block<'a>>,
}

impl<'a> SculptureView<'a> {
    pub fn new(curve: &'a CurveDescription, details: &'a [DecorativeElement]) -> Self {
        Self {
            curve,
            details,
            rotation: 0.0,
            style: Style::default(),
            block: None,
        }
    }

    /// Rotation about the vertical axis in radians
    pub fn rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn render_sculpture(&self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height < 2 || self.curve.is_empty() {
            return;
        }

        let (sin, cos) = self.rotation.sin_cos();
        let rotate = |x: f64, z: f64| (x * cos - z * sin, x * sin + z * cos);

        // Fit the widest point of the sculpture and its full height
        let reach = self
            .curve
            .points
            .iter()
            .map(|p| p.x.hypot(p.z))
            .fold(self.curve.base_radius, f64::max)
            * 1.1;
        let top = self.curve.max_height;
        let bottom = -0.15;

        let width = area.width as f64 - 1.0;
        let height = area.height as f64 - 1.0;
        let to_cell = |x: f64, y: f64| -> Option<(u16, u16)> {
            let col = ((x + reach) / (2.0 * reach) * width).round();
            let row = ((top - y) / (top - bottom) * height).round();
            if (0.0..=width).contains(&col) && (0.0..=height).contains(&row) {
                Some((area.x + col as u16, area.y + row as u16))
            } else {
                None
            }
        };

        let far = self.style.add_modifier(Modifier::DIM);

        for detail in self.details {
            match *detail {
                DecorativeElement::BasePlatform { top_radius, .. } => {
                    let steps = (top_radius / reach * width).ceil() as i32;
                    for i in -steps..=steps {
                        let x = i as f64 / steps.max(1) as f64 * top_radius;
                        if let Some((col, row)) = to_cell(x, 0.0) {
                            buf.set_string(col, row, "═", self.style);
                        }
                    }
                }
                DecorativeElement::AccentRod { center, length, .. } => {
                    let (x, z) = rotate(center.x, center.z);
                    let style = if z < 0.0 { far } else { self.style };
                    let rows = (length / (top - bottom) * height).ceil().max(1.0) as i32;
                    for i in 0..=rows {
                        let y = center.y - length / 2.0 + length * i as f64 / rows as f64;
                        if let Some((col, row)) = to_cell(x, y) {
                            buf.set_string(col, row, "│", style);
                        }
                    }
                }
                DecorativeElement::PartialRing { major_radius, arc, height, tilt, .. } => {
                    let tilt = DQuat::from_rotation_x(tilt);
                    for i in 0..=RING_STEPS {
                        let u = arc * i as f64 / RING_STEPS as f64;
                        let p = tilt * DVec3::new(major_radius * u.cos(), major_radius * u.sin(), 0.0);
                        let (x, z) = rotate(p.x, p.z);
                        let style = if z < 0.0 { far } else { self.style };
                        if let Some((col, row)) = to_cell(x, p.y + height) {
                            buf.set_string(col, row, "○", style);
                        }
                    }
                }
            }
        }

        // Far side first so the near side draws over it
        let mut projected: Vec<(f64, f64, f64, f64)> = self
            .curve
            .points
            .iter()
            .zip(&self.curve.radii)
            .map(|(p, &r)| {
                let (x, z) = rotate(p.x, p.z);
                (x, p.y, z, r)
            })
            .collect();
        projected.sort_by(|a, b| a.2.total_cmp(&b.2));

        for (x, y, z, multiplier) in projected {
            let glyph = if multiplier < 0.5 {
                "·"
            } else if multiplier < 1.0 {
                "•"
            } else {
                "●"
            };
            let style = if z < 0.0 { far } else { self.style };
            if let Some((col, row)) = to_cell(x, y) {
                buf.set_string(col, row, glyph, style);
            }
        }
    }
}

impl Widget for SculptureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        self.render_sculpture(inner_area, buf);
    }
}
