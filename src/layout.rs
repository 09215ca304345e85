//! # Chart Layout
//!
//! Places the rows of a [`ChartSpec`] on a page.
//!
//! ## Algorithm
//!
//! ```text
//! y = top margin
//! for row in rows (declaration order):
//!     x = left margin, row height = 0
//!     for symbol in row.sequence:
//!         draw symbol with its cell origin at (x, y)
//!         row height = max(row height, symbol height)
//!         x += cell pitch
//!     y += row height + interline spacing
//! ```
//!
//! Row heights are only known once a row has been drawn, so labels are
//! painted in a second pass that walks the rows again using the recorded
//! heights. Every call to [`ChartLayoutEngine::layout`] starts from a blank
//! page: the plain and labelled renders share no canvas state.

use image::Rgb;
use serde::Serialize;

use crate::canvas::Canvas;
use crate::config::ChartSpec;
use crate::dots::{DotGlyphRenderer, DotPattern};
use crate::error::ChartError;
use crate::glyph::GlyphSource;
use crate::landolt::LandoltSymbols;
use crate::measure::{self, Measurement};

/// Something that can draw the symbols of one chart kind.
pub trait SymbolRenderer {
    /// Fails with [`ChartError::UnknownSymbol`] for codes this renderer
    /// cannot draw.
    fn validate(&self, symbol: char) -> Result<(), ChartError>;

    /// Draw `symbol` with its cell origin at (x, y) and return the height it
    /// occupies on the page.
    fn place(
        &self,
        page: &mut Canvas,
        symbol: char,
        size: f32,
        x: f32,
        y: f32,
    ) -> Result<i32, ChartError>;
}

impl SymbolRenderer for DotGlyphRenderer {
    fn validate(&self, symbol: char) -> Result<(), ChartError> {
        DotPattern::from_code(symbol)
            .map(|_| ())
            .ok_or_else(|| ChartError::unknown_symbol(symbol))
    }

    fn place(
        &self,
        page: &mut Canvas,
        symbol: char,
        size: f32,
        x: f32,
        y: f32,
    ) -> Result<i32, ChartError> {
        let cell = self.render(symbol, size)?;
        page.copy_from(&cell, x as i32, y as i32);
        Ok(cell.height() as i32)
    }
}

impl SymbolRenderer for LandoltSymbols<'_> {
    fn validate(&self, symbol: char) -> Result<(), ChartError> {
        self.convention().angle(symbol).map(|_| ())
    }

    fn place(
        &self,
        page: &mut Canvas,
        symbol: char,
        size: f32,
        x: f32,
        y: f32,
    ) -> Result<i32, ChartError> {
        self.render(page, symbol, size, x, y).map(|p| p.height)
    }
}

/// Where a row ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPlacement {
    pub label: String,
    /// Top of the row
    pub y: f32,
    /// Height of the tallest symbol in the row
    pub height: i32,
}

/// Where a label's ink ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A rendered chart page with its layout record.
#[derive(Debug, Clone)]
pub struct ChartRender {
    pub canvas: Canvas,
    pub rows: Vec<RowPlacement>,
    /// Labels drawn; empty for a plain render
    pub labels: Vec<LabelPlacement>,
    /// Cursor position after the last row
    pub final_y: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct LayoutCursor {
    x: f32,
    y: f32,
    row_height: i32,
}

/// Lays out one chart variant.
pub struct ChartLayoutEngine<'a> {
    spec: &'a ChartSpec,
    symbols: &'a dyn SymbolRenderer,
    labels: &'a dyn GlyphSource,
}

impl<'a> ChartLayoutEngine<'a> {
    pub fn new(
        spec: &'a ChartSpec,
        symbols: &'a dyn SymbolRenderer,
        labels: &'a dyn GlyphSource,
    ) -> Self {
        Self {
            spec,
            symbols,
            labels,
        }
    }

    /// Check every symbol of every row.
    pub fn validate(&self) -> Result<(), ChartError> {
        for row in self.spec.rows {
            for (i, symbol) in row.sequence.chars().enumerate() {
                self.symbols
                    .validate(symbol)
                    .map_err(|e| e.located(row.label, i))?;
            }
        }
        Ok(())
    }

    /// Render the chart on a fresh page, optionally with row labels.
    ///
    /// The whole chart is validated before anything is drawn.
    pub fn layout(&self, with_labels: bool) -> Result<ChartRender, ChartError> {
        self.validate()?;

        let page_geometry = &self.spec.page;
        let mut canvas = Canvas::page(page_geometry.width_px(), page_geometry.height_px())?;

        let (rows, final_y) = self.place_rows(&mut canvas)?;
        let labels = if with_labels {
            self.place_labels(&mut canvas, &rows)?
        } else {
            Vec::new()
        };

        Ok(ChartRender {
            canvas,
            rows,
            labels,
            final_y,
        })
    }

    /// Plain and labelled renders, in that order.
    pub fn render_pair(&self) -> Result<(ChartRender, ChartRender), ChartError> {
        let plain = self.layout(false)?;
        let labelled = self.layout(true)?;
        Ok((plain, labelled))
    }

    fn place_rows(&self, page: &mut Canvas) -> Result<(Vec<RowPlacement>, f32), ChartError> {
        let geometry = &self.spec.page;
        let pitch = geometry.cell_pitch();
        let interline = geometry.interline_px();

        let mut cursor = LayoutCursor {
            y: geometry.top_margin_px(),
            ..Default::default()
        };
        let mut placements = Vec::with_capacity(self.spec.rows.len());

        for row in self.spec.rows {
            cursor.x = geometry.left_margin_px();
            cursor.row_height = 0;
            let size = self.spec.scaled_size(row);

            for (i, symbol) in row.sequence.chars().enumerate() {
                let height = self
                    .symbols
                    .place(page, symbol, size, cursor.x, cursor.y)
                    .map_err(|e| e.located(row.label, i))?;
                cursor.row_height = cursor.row_height.max(height);
                cursor.x += pitch;
            }

            log::debug!(
                "{}: row {} at y={} height={}",
                self.spec.name,
                row.label,
                cursor.y,
                cursor.row_height
            );
            placements.push(RowPlacement {
                label: row.label.to_string(),
                y: cursor.y,
                height: cursor.row_height,
            });

            cursor.y += cursor.row_height as f32 + interline;
        }

        Ok((placements, cursor.y))
    }

    fn place_labels(
        &self,
        page: &mut Canvas,
        rows: &[RowPlacement],
    ) -> Result<Vec<LabelPlacement>, ChartError> {
        let geometry = &self.spec.page;
        let style = &self.spec.labels;
        let color = Rgb(style.color);
        let anchor_x = geometry.left_margin_px() + geometry.cell_pitch() / 2.0 + style.offset_px;
        let interline = geometry.interline_px();

        let mut y = geometry.top_margin_px();
        let mut placed = Vec::with_capacity(rows.len());

        for row in rows {
            match measure::measure(self.labels, &row.label, style.point_size, 0.0)? {
                Measurement::Ink(bbox) => {
                    let draw_x = (anchor_x + bbox.left) as i32;
                    let draw_y = (y + bbox.top) as i32;
                    self.labels
                        .draw_text(page, &row.label, style.point_size, 0.0, draw_x, draw_y, color);

                    placed.push(LabelPlacement {
                        label: row.label.clone(),
                        x: draw_x - bbox.left as i32,
                        y: draw_y - bbox.top as i32,
                        width: bbox.width,
                        height: bbox.height,
                    });
                }
                Measurement::NoInk(_) | Measurement::Empty => {
                    log::warn!("{}: label {:?} has no visible ink, skipping", self.spec.name, row.label);
                }
            }

            y += row.height as f32 + interline;
        }

        Ok(placed)
    }
}
