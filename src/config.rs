//! # Chart Configuration
//!
//! Static description of a chart: page geometry, label style, the symbol
//! kind and the ordered row table.
//!
//! ## Page geometry
//!
//! ```text
//! ├─ left margin ─┼── cell pitch ──┼── cell pitch ──┼ ... 8 cells
//! │               │ ┌────┐         │ ┌────┐         │
//! │               │ │ s1 │         │ │ s2 │         │   row (tallest symbol)
//! │               │ └────┘         │ └────┘         │
//! │                   interline spacing
//! ```
//!
//! Everything is specified in inches and converted with the page DPI:
//!
//! ```text
//! pitch = page_width_px / 8 - 25
//! ```

use serde::Serialize;

use crate::canvas::LABEL_RED;
use crate::landolt::RotationConvention;

/// Physical page layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    pub top_margin_in: f32,
    pub left_margin_in: f32,
    /// Vertical gap between the bottom of one row and the top of the next
    pub interline_in: f32,
}

impl PageGeometry {
    /// US letter at 600 DPI, dot chart spacing.
    pub const LETTER_600DPI: Self = Self {
        width_in: 8.5,
        height_in: 11.0,
        dpi: 600.0,
        top_margin_in: 0.20,
        left_margin_in: 0.20,
        interline_in: 0.85,
    };

    /// US letter at 300 DPI, Landolt chart spacing.
    pub const LETTER_300DPI: Self = Self {
        width_in: 8.5,
        height_in: 11.0,
        dpi: 300.0,
        top_margin_in: 0.2,
        left_margin_in: 0.2,
        interline_in: 0.55,
    };

    #[inline]
    pub fn width_px(&self) -> u32 {
        (self.dpi * self.width_in) as u32
    }

    #[inline]
    pub fn height_px(&self) -> u32 {
        (self.dpi * self.height_in) as u32
    }

    /// Horizontal distance between symbol origins.
    #[inline]
    pub fn cell_pitch(&self) -> f32 {
        (self.dpi * self.width_in) / 8.0 - 25.0
    }

    #[inline]
    pub fn top_margin_px(&self) -> f32 {
        self.top_margin_in * self.dpi
    }

    #[inline]
    pub fn left_margin_px(&self) -> f32 {
        self.left_margin_in * self.dpi
    }

    #[inline]
    pub fn interline_px(&self) -> f32 {
        self.interline_in * self.dpi
    }
}

/// How row labels are drawn in the labelled render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    pub font_file: &'static str,
    pub point_size: f32,
    /// Extra horizontal offset past half a cell pitch
    pub offset_px: f32,
    pub color: [u8; 3],
}

impl LabelStyle {
    pub const FREE_SERIF_72: Self = Self {
        font_file: "./FreeSerif.ttf",
        point_size: 72.0,
        offset_px: 40.0,
        color: LABEL_RED.0,
    };

    pub const FREE_SERIF_36: Self = Self {
        point_size: 36.0,
        ..Self::FREE_SERIF_72
    };
}

/// Which symbols a chart is made of.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    /// Braille-like dot cells; row size is the dot spacing in mm.
    Dots { dot_diameter_mm: f32 },
    /// Rotated Landolt C; row size is the font size in points.
    Landolt {
        font_file: &'static str,
        rotation: RotationConvention,
    },
}

impl SymbolKind {
    /// Unit of a row's size parameter.
    pub fn size_unit(&self) -> &'static str {
        match self {
            SymbolKind::Dots { .. } => "mm",
            SymbolKind::Landolt { .. } => "pt",
        }
    }
}

/// One acuity row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartRowSpec {
    /// Acuity in log units, e.g. "+0.3" or "0"
    pub label: &'static str,
    /// Dot spacing in mm or font size in points, depending on the chart
    pub size_param: f32,
    /// Symbol codes, left to right
    pub sequence: &'static str,
}

/// A complete chart variant. Rows are placed top to bottom in declaration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSpec {
    pub name: &'static str,
    /// Output file name without extension; the labelled render appends
    /// `_labelled`
    pub output_stem: &'static str,
    pub page: PageGeometry,
    pub labels: LabelStyle,
    /// Uniform scale applied to every row's size parameter, to correct for
    /// print calibration drift
    pub fudge_factor: f32,
    pub symbols: SymbolKind,
    pub rows: &'static [ChartRowSpec],
}

impl ChartSpec {
    /// Size parameter of `row` after the fudge factor.
    #[inline]
    pub fn scaled_size(&self, row: &ChartRowSpec) -> f32 {
        row.size_param * self.fudge_factor
    }

    pub fn plain_file_name(&self) -> String {
        format!("{}.png", self.output_stem)
    }

    pub fn labelled_file_name(&self) -> String {
        format!("{}_labelled.png", self.output_stem)
    }
}
