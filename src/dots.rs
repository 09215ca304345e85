//! # Dot Symbols
//!
//! Renders the symbols of Legge's dot chart. Each symbol is the top four dots
//! of a braille cell with one dot missing, resembling the braille letters
//! d, f, h and j (⠙ ⠋ ⠓ ⠚):
//!
//! ```text
//!  Layout    d       f       h       j
//!  1  3      ● ●     ● ●     ● ○     ○ ●
//!  2  4      ○ ●     ● ○     ● ●     ● ●
//! ```
//!
//! Dot size is constant across the chart; only the center-to-center spacing
//! changes from row to row.

use serde::Serialize;

use crate::canvas::Canvas;
use crate::error::ChartError;

/// Millimetres to inches.
pub const MM_TO_INCH: f32 = 0.0393701;

/// One of the four dot positions of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DotPosition {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl DotPosition {
    /// Positions in presence-vector order.
    pub const ALL: [DotPosition; 4] = [
        DotPosition::TopLeft,
        DotPosition::BottomLeft,
        DotPosition::TopRight,
        DotPosition::BottomRight,
    ];

    /// Dot center relative to the cell origin.
    pub fn center(self, dot_diameter: f32, spacing: f32) -> (f32, f32) {
        let r = dot_diameter / 2.0;
        match self {
            DotPosition::TopLeft => (r, r),
            DotPosition::BottomLeft => (r, r + spacing),
            DotPosition::TopRight => (r + spacing, r),
            DotPosition::BottomRight => (r + spacing, r + spacing),
        }
    }
}

/// Presence of each dot, indexed like [`DotPosition::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DotPattern([bool; 4]);

impl DotPattern {
    pub const D: Self = Self([true, false, true, true]);
    pub const F: Self = Self([true, true, true, false]);
    pub const H: Self = Self([true, true, false, true]);
    pub const J: Self = Self([false, true, true, true]);

    /// Pattern for a symbol code, or `None` for anything but d, f, h, j.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(Self::D),
            'f' => Some(Self::F),
            'h' => Some(Self::H),
            'j' => Some(Self::J),
            _ => None,
        }
    }

    /// Arbitrary pattern from its 4-bit presence vector (bit 0 = top-left).
    pub fn from_bits(bits: u8) -> Self {
        Self(std::array::from_fn(|i| bits & (1 << i) != 0))
    }

    pub fn bits(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &on)| if on { acc | (1 << i) } else { acc })
    }

    #[inline]
    pub fn has(&self, position: DotPosition) -> bool {
        self.0[position as usize]
    }

    /// Number of dots drawn.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }
}

/// Renders dot symbols as square raster cells.
#[derive(Debug, Clone, Copy)]
pub struct DotGlyphRenderer {
    units_per_mm: f32,
    dot_diameter_mm: f32,
}

impl DotGlyphRenderer {
    pub fn new(dpi: f32, dot_diameter_mm: f32) -> Self {
        Self {
            units_per_mm: dpi * MM_TO_INCH,
            dot_diameter_mm,
        }
    }

    #[inline]
    pub fn units_per_mm(&self) -> f32 {
        self.units_per_mm
    }

    /// Dot diameter in device pixels.
    pub fn dot_diameter_px(&self) -> f32 {
        self.dot_diameter_mm * self.units_per_mm
    }

    /// Side of the square cell for a given spacing.
    ///
    /// Room for half a dot on each side plus the spacing would be enough;
    /// the cell is sized `2d + spacing + 1mm` so rounding never clips a dot.
    pub fn cell_size(&self, spacing_mm: f32) -> u32 {
        (self.units_per_mm * (2.0 * self.dot_diameter_mm + spacing_mm + 1.0)) as u32
    }

    /// Render the symbol `code` with `spacing_mm` between dot centers.
    pub fn render(&self, code: char, spacing_mm: f32) -> Result<Canvas, ChartError> {
        let pattern = DotPattern::from_code(code).ok_or_else(|| ChartError::unknown_symbol(code))?;
        self.render_pattern(pattern, spacing_mm)
    }

    /// Render an explicit pattern.
    pub fn render_pattern(&self, pattern: DotPattern, spacing_mm: f32) -> Result<Canvas, ChartError> {
        let side = self.cell_size(spacing_mm);
        let mut cell = Canvas::page(side, side)?;

        let diameter = self.dot_diameter_px();
        let spacing = spacing_mm * self.units_per_mm;
        let ink = cell.foreground();

        for position in DotPosition::ALL {
            if !pattern.has(position) {
                continue;
            }
            let (cx, cy) = position.center(diameter, spacing);
            cell.fill_ellipse(cx as i32, cy as i32, diameter as i32, diameter as i32, ink);
        }

        Ok(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, WHITE};

    fn renderer() -> DotGlyphRenderer {
        DotGlyphRenderer::new(600.0, 1.0)
    }

    #[test]
    fn test_codes_map_to_patterns() {
        assert_eq!(DotPattern::from_code('d').unwrap().bits(), 0b1101);
        assert_eq!(DotPattern::from_code('f').unwrap().bits(), 0b0111);
        assert_eq!(DotPattern::from_code('h').unwrap().bits(), 0b1011);
        assert_eq!(DotPattern::from_code('j').unwrap().bits(), 0b1110);
        assert_eq!(DotPattern::from_code('x'), None);
        assert_eq!(DotPattern::from_code('D'), None);
    }

    #[test]
    fn test_from_bits_roundtrip() {
        for bits in 0..16u8 {
            assert_eq!(DotPattern::from_bits(bits).bits(), bits);
            assert_eq!(DotPattern::from_bits(bits).count(), bits.count_ones() as usize);
        }
    }

    #[test]
    fn test_cell_size_baseline() {
        // 600 DPI: 23.622 px/mm × (2 + 2.28 + 1) mm = 124.7
        assert_eq!(renderer().cell_size(2.28), 124);
        assert_eq!(renderer().cell_size(2.28), renderer().cell_size(2.28));
    }

    #[test]
    fn test_cell_size_grows_with_spacing() {
        let r = renderer();
        assert!(r.cell_size(1.0) < r.cell_size(2.28));
        assert!(r.cell_size(2.28) < r.cell_size(7.2093));
    }

    #[test]
    fn test_every_pattern_draws_popcount_dots() {
        let r = renderer();
        let spacing = 2.28;
        let diameter = r.dot_diameter_px();
        let spacing_px = spacing * r.units_per_mm();

        for bits in 0..16u8 {
            let pattern = DotPattern::from_bits(bits);
            let cell = r.render_pattern(pattern, spacing).unwrap();
            assert_eq!(cell.width(), cell.height());

            let mut drawn = 0;
            for position in DotPosition::ALL {
                let (cx, cy) = position.center(diameter, spacing_px);
                let px = cell.pixel_at(cx as u32, cy as u32).unwrap();
                if px == BLACK {
                    drawn += 1;
                }
                assert_eq!(px == BLACK, pattern.has(position), "bits {:04b} {:?}", bits, position);
            }
            assert_eq!(drawn, pattern.count());
        }
    }

    fn black_pixels(cell: &Canvas) -> usize {
        cell.as_image().pixels().filter(|&&p| p == BLACK).count()
    }

    #[test]
    fn test_every_pattern_inks_exactly_its_dots() {
        let r = renderer();
        let spacing = 2.28;

        // One dot of 1mm at 600 DPI: 23px wide, semi-axes of 11px.
        let single = black_pixels(&r.render_pattern(DotPattern::from_bits(0b0001), spacing).unwrap());
        let radius = (r.dot_diameter_px() as i32 / 2) as f32;
        let disc = std::f32::consts::PI * radius * radius;
        assert!(
            (single as f32 - disc).abs() < disc * 0.15,
            "single dot has {} pixels, expected about {}",
            single,
            disc
        );

        for bits in 0..16u8 {
            let pattern = DotPattern::from_bits(bits);
            let cell = r.render_pattern(pattern, spacing).unwrap();
            assert_eq!(black_pixels(&cell), pattern.count() * single, "bits {:04b}", bits);
        }
    }

    #[test]
    fn test_dots_do_not_touch_at_smallest_spacing() {
        // Midpoint between the two left dots stays white at 1.1428mm spacing.
        let r = renderer();
        let cell = r.render('f', 1.1428).unwrap();
        let d = r.dot_diameter_px();
        let s = 1.1428 * r.units_per_mm();
        let (x, y) = DotPosition::TopLeft.center(d, s);
        assert_eq!(cell.pixel_at(x as u32, (y + s / 2.0) as u32), Some(WHITE));
    }

    #[test]
    fn test_unknown_code_is_error() {
        let err = renderer().render('x', 2.28).unwrap_err();
        assert!(matches!(err, ChartError::UnknownSymbol { symbol: 'x', .. }));
    }
}
