//! ADSR outline panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line},
        Block, Widget,
    },
};

use crate::envelope::EnvelopeParameters;

/// The envelope drawn as a polygon in a unit square
///
/// Attack, decay and release take horizontal shares proportional to their
/// times; the peak sits at the top and the decay lands on the sustain level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeOutline {
    points: [(f64, f64); 6],
    sustain: f64,
}

impl EnvelopeOutline {
    pub fn new(params: &EnvelopeParameters) -> Self {
        let total = params.attack() + params.decay() + params.release();
        let share = |t: f64| if total > 0.0 { t / total } else { 0.0 };
        let attack = share(params.attack());
        let decay = share(params.decay());
        let release = share(params.release());
        let sustain = params.sustain();

        Self {
            points: [
                (0.0, 0.0),
                (0.0, sustain),
                (attack, 1.0),
                (attack + decay, sustain),
                (1.0 - release, sustain),
                (1.0, 0.0),
            ],
            sustain,
        }
    }

    /// Polygon corners, x left to right and y up, both 0.0-1.0
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Fill strength, 0.3 at no sustain up to 1.0 at full sustain
    pub fn intensity(&self) -> f64 {
        0.3 + self.sustain * 0.7
    }

    /// Red scaled by [`intensity`](Self::intensity)
    pub fn color(&self) -> Color {
        let scale = |c: f64| (c * self.intensity()).round() as u8;
        Color::Rgb(scale(231.0), scale(76.0), scale(60.0))
    }
}

/// Canvas widget drawing an [`EnvelopeOutline`]
pub struct EnvelopeShape<'a> {
    outline: EnvelopeOutline,
    block: Option<Block<'a>>,
}

impl<'a> EnvelopeShape<'a> {
    pub fn new(params: &EnvelopeParameters) -> Self {
        Self {
            outline: EnvelopeOutline::new(params),
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for EnvelopeShape<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let outline = self.outline;
        let color = outline.color();

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, 1.0])
            .y_bounds([0.0, 1.0])
            .paint(move |ctx| {
                ctx.draw(&Line {
                    x1: 0.0,
                    y1: outline.sustain,
                    x2: 1.0,
                    y2: outline.sustain,
                    color: Color::DarkGray,
                });
                ctx.layer();

                let points = outline.points();
                for (i, &(x1, y1)) in points.iter().enumerate() {
                    let (x2, y2) = points[(i + 1) % points.len()];
                    ctx.draw(&Line { x1, y1, x2, y2, color });
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }

        canvas.render(area, buf);
    }
}
