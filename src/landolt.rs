//! # Landolt C Symbols
//!
//! A Landolt C is a ring with a gap; the direction of the gap is the symbol.
//! The chart font draws the "C" with its gap facing right, so each direction
//! is produced by rotating that one glyph.
//!
//! ## Rotation conventions
//!
//! Two chart revisions exist and they disagree about up/down:
//!
//! | Convention | u | l | r | d |
//! |------------|-----|-----|---|-----|
//! | V1 | 270 | 180 | 0 | 90 |
//! | V2 | 90 | 180 | 0 | 270 |
//!
//! Both are kept as separate named conventions. Which one matches the printed
//! clinical charts still needs confirmation from the chart owners, so neither
//! is treated as canonical.

use serde::Serialize;

use crate::canvas::Canvas;
use crate::error::ChartError;
use crate::glyph::GlyphSource;
use crate::measure::{self, Measurement};

/// The glyph every Landolt symbol is drawn from.
pub const LANDOLT_GLYPH: &str = "C";

/// Mapping from direction symbols (u, l, r, d) to rotation angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationConvention {
    pub name: &'static str,
    pub up: f32,
    pub left: f32,
    pub right: f32,
    pub down: f32,
}

impl RotationConvention {
    pub const V1: Self = Self {
        name: "v1",
        up: 270.0,
        left: 180.0,
        right: 0.0,
        down: 90.0,
    };

    pub const V2: Self = Self {
        name: "v2",
        up: 90.0,
        left: 180.0,
        right: 0.0,
        down: 270.0,
    };

    /// Rotation angle for a direction symbol.
    pub fn angle(&self, symbol: char) -> Result<f32, ChartError> {
        match symbol {
            'u' => Ok(self.up),
            'l' => Ok(self.left),
            'r' => Ok(self.right),
            'd' => Ok(self.down),
            other => Err(ChartError::unknown_symbol(other)),
        }
    }
}

/// Where a rotated glyph was drawn and how tall its ink is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub draw_x: i32,
    pub draw_y: i32,
    pub height: i32,
}

/// Draws rotated glyphs so their ink's top-left corner lands on a cell origin.
#[derive(Clone, Copy)]
pub struct RotatedGlyphRenderer<'a> {
    glyphs: &'a dyn GlyphSource,
}

impl<'a> RotatedGlyphRenderer<'a> {
    pub fn new(glyphs: &'a dyn GlyphSource) -> Self {
        Self { glyphs }
    }

    /// Draw `text` rotated by `angle` with its ink anchored at
    /// (cell_x, cell_y).
    ///
    /// Text with an outline but no visible ink is not drawn and reports a
    /// height of 0.
    pub fn render(
        &self,
        page: &mut Canvas,
        text: &str,
        point_size: f32,
        angle: f32,
        cell_x: f32,
        cell_y: f32,
    ) -> Result<GlyphPlacement, ChartError> {
        let bbox = match measure::measure(self.glyphs, text, point_size, angle)? {
            Measurement::Ink(bbox) => bbox,
            Measurement::NoInk(bbox) => {
                log::warn!(
                    "{:?} at {}pt/{}° has no visible ink, skipping",
                    text,
                    point_size,
                    angle
                );
                return Ok(GlyphPlacement {
                    draw_x: (cell_x + bbox.left) as i32,
                    draw_y: (cell_y + bbox.top) as i32,
                    height: 0,
                });
            }
            Measurement::Empty => {
                return Err(ChartError::EmptyGlyph {
                    text: text.to_string(),
                });
            }
        };

        let draw_x = (cell_x + bbox.left) as i32;
        let draw_y = (cell_y + bbox.top) as i32;
        let ink = page.foreground();
        self.glyphs
            .draw_text(page, text, point_size, angle, draw_x, draw_y, ink);

        Ok(GlyphPlacement {
            draw_x,
            draw_y,
            height: bbox.height,
        })
    }
}

/// Landolt C symbols: a glyph source plus the rotation convention in use.
#[derive(Clone, Copy)]
pub struct LandoltSymbols<'a> {
    renderer: RotatedGlyphRenderer<'a>,
    convention: RotationConvention,
}

impl<'a> LandoltSymbols<'a> {
    pub fn new(glyphs: &'a dyn GlyphSource, convention: RotationConvention) -> Self {
        Self {
            renderer: RotatedGlyphRenderer::new(glyphs),
            convention,
        }
    }

    pub fn convention(&self) -> RotationConvention {
        self.convention
    }

    /// Draw the Landolt C for direction `symbol` at `point_size`.
    pub fn render(
        &self,
        page: &mut Canvas,
        symbol: char,
        point_size: f32,
        cell_x: f32,
        cell_y: f32,
    ) -> Result<GlyphPlacement, ChartError> {
        let angle = self.convention.angle(symbol)?;
        self.renderer
            .render(page, LANDOLT_GLYPH, point_size, angle, cell_x, cell_y)
    }
}
