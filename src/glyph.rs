//! Glyph metrics and rasterization.
//!
//! [`GlyphSource`] is the seam between the chart code and whatever actually
//! knows how to draw text. [`TtfGlyphs`] implements it for TrueType/OpenType
//! files using ab_glyph outlines, rotated in software and filled with
//! ab_glyph's scanline rasterizer.
//!
//! Conventions follow the classic TrueType text APIs the charts were tuned
//! against: sizes are points at 96 DPI, the drawing position is the baseline
//! origin of the first character, and angles rotate counter-clockwise about
//! that origin.

use std::path::Path;

use ab_glyph::{Font, FontArc, OutlineCurve, Point, point};
use ab_glyph_rasterizer::Rasterizer;
use image::Rgb;

use crate::canvas::Canvas;
use crate::error::ChartError;

/// Resolution that maps point sizes to pixels.
pub const GLYPH_DPI: f32 = 96.0;

/// Font metrics and rasterization service.
pub trait GlyphSource {
    /// Outline box of `text` rotated by `angle` degrees.
    ///
    /// Eight numbers in pixels relative to the baseline origin (y down):
    /// lower-left, lower-right, upper-right and upper-left corners as
    /// `x, y` pairs. `None` when the text has no outline at all.
    fn outline_box(&self, text: &str, point_size: f32, angle: f32) -> Option<[i32; 8]>;

    /// Rasterize `text` with its baseline origin at (x, y).
    fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        point_size: f32,
        angle: f32,
        x: i32,
        y: i32,
        color: Rgb<u8>,
    );
}

/// Counter-clockwise rotation from font space (y up) to canvas space (y down).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rotation {
    cos: f32,
    sin: f32,
}

impl Rotation {
    pub(crate) fn degrees(angle: f32) -> Self {
        // Right angles are exact so rotated boxes stay integral.
        match angle.rem_euclid(360.0) {
            a if a == 0.0 => Self { cos: 1.0, sin: 0.0 },
            a if a == 90.0 => Self { cos: 0.0, sin: 1.0 },
            a if a == 180.0 => Self { cos: -1.0, sin: 0.0 },
            a if a == 270.0 => Self { cos: 0.0, sin: -1.0 },
            a => {
                let r = a.to_radians();
                Self {
                    cos: r.cos(),
                    sin: r.sin(),
                }
            }
        }
    }

    #[inline]
    pub(crate) fn apply(&self, x: f32, y: f32) -> Point {
        point(x * self.cos - y * self.sin, -(x * self.sin + y * self.cos))
    }
}

fn map_curve(curve: &OutlineCurve, f: impl Fn(Point) -> Point) -> OutlineCurve {
    match *curve {
        OutlineCurve::Line(p0, p1) => OutlineCurve::Line(f(p0), f(p1)),
        OutlineCurve::Quad(p0, p1, p2) => OutlineCurve::Quad(f(p0), f(p1), f(p2)),
        OutlineCurve::Cubic(p0, p1, p2, p3) => OutlineCurve::Cubic(f(p0), f(p1), f(p2), f(p3)),
    }
}

fn curve_points(curve: &OutlineCurve) -> Vec<Point> {
    match *curve {
        OutlineCurve::Line(p0, p1) => vec![p0, p1],
        OutlineCurve::Quad(p0, p1, p2) => vec![p0, p1, p2],
        OutlineCurve::Cubic(p0, p1, p2, p3) => vec![p0, p1, p2, p3],
    }
}

/// Control-point box of a set of curves: (min_x, min_y, max_x, max_y).
fn control_box(curves: &[OutlineCurve]) -> Option<(f32, f32, f32, f32)> {
    curves
        .iter()
        .flat_map(curve_points)
        .fold(None, |acc, p| match acc {
            None => Some((p.x, p.y, p.x, p.y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y))),
        })
}

/// Fill closed outlines (canvas-space offsets from the origin) onto `canvas`
/// with anti-aliased coverage.
pub(crate) fn fill_outline(
    canvas: &mut Canvas,
    curves: &[OutlineCurve],
    x: i32,
    y: i32,
    color: Rgb<u8>,
) {
    let Some((min_x, min_y, max_x, max_y)) = control_box(curves) else {
        return;
    };

    let min_x = min_x.floor();
    let min_y = min_y.floor();
    let width = (max_x - min_x).ceil() as usize + 1;
    let height = (max_y - min_y).ceil() as usize + 1;

    let shift = |p: Point| point(p.x - min_x, p.y - min_y);
    let mut rasterizer = Rasterizer::new(width, height);
    for curve in curves {
        match *curve {
            OutlineCurve::Line(p0, p1) => rasterizer.draw_line(shift(p0), shift(p1)),
            OutlineCurve::Quad(p0, p1, p2) => {
                rasterizer.draw_quad(shift(p0), shift(p1), shift(p2))
            }
            OutlineCurve::Cubic(p0, p1, p2, p3) => {
                rasterizer.draw_cubic(shift(p0), shift(p1), shift(p2), shift(p3))
            }
        }
    }

    let origin_x = x + min_x as i32;
    let origin_y = y + min_y as i32;
    rasterizer.for_each_pixel_2d(|px, py, coverage| {
        canvas.blend(origin_x + px as i32, origin_y + py as i32, color, coverage);
    });
}

/// A TrueType/OpenType font loaded from disk.
#[derive(Clone)]
pub struct TtfGlyphs {
    font: FontArc,
    path: String,
}

impl std::fmt::Debug for TtfGlyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfGlyphs").field("path", &self.path).finish()
    }
}

impl TtfGlyphs {
    /// Load a font file.
    pub fn open(path: &Path) -> Result<Self, ChartError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| ChartError::FontLoad {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| ChartError::FontLoad {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        log::debug!("Loaded font {}", display);
        Ok(Self {
            font,
            path: display,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Pixels per font unit at `point_size`.
    fn scale(&self, point_size: f32) -> Option<f32> {
        let units_per_em = self.font.units_per_em()?;
        Some(point_size * GLYPH_DPI / 72.0 / units_per_em)
    }

    /// Unrotated outlines of `text` in font space (y up, pixels), laid out
    /// along the baseline by advance width.
    fn laid_out_curves(&self, text: &str, scale: f32) -> Vec<OutlineCurve> {
        let mut curves = Vec::new();
        let mut pen_x = 0.0f32;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(outline) = self.font.outline(glyph_id) {
                curves.extend(
                    outline
                        .curves
                        .iter()
                        .map(|c| map_curve(c, |p| point(pen_x + p.x * scale, p.y * scale))),
                );
            }
            pen_x += self.font.h_advance_unscaled(glyph_id) * scale;
        }

        curves
    }
}

impl GlyphSource for TtfGlyphs {
    fn outline_box(&self, text: &str, point_size: f32, angle: f32) -> Option<[i32; 8]> {
        let scale = self.scale(point_size)?;
        let curves = self.laid_out_curves(text, scale);
        let (x0, y0, x1, y1) = control_box(&curves)?;

        // Integral box, rounded outwards, then rotated about the origin.
        let (x0, y0, x1, y1) = (x0.floor(), y0.floor(), x1.ceil(), y1.ceil());
        let rotation = Rotation::degrees(angle);
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];

        let mut out = [0i32; 8];
        for (i, (cx, cy)) in corners.into_iter().enumerate() {
            let p = rotation.apply(cx, cy);
            out[i * 2] = p.x.round() as i32;
            out[i * 2 + 1] = p.y.round() as i32;
        }
        Some(out)
    }

    fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        point_size: f32,
        angle: f32,
        x: i32,
        y: i32,
        color: Rgb<u8>,
    ) {
        let Some(scale) = self.scale(point_size) else {
            return;
        };
        let rotation = Rotation::degrees(angle);
        let curves: Vec<OutlineCurve> = self
            .laid_out_curves(text, scale)
            .iter()
            .map(|c| map_curve(c, |p| rotation.apply(p.x, p.y)))
            .collect();

        fill_outline(canvas, &curves, x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, WHITE};

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<OutlineCurve> {
        vec![
            OutlineCurve::Line(point(x0, y0), point(x1, y0)),
            OutlineCurve::Line(point(x1, y0), point(x1, y1)),
            OutlineCurve::Line(point(x1, y1), point(x0, y1)),
            OutlineCurve::Line(point(x0, y1), point(x0, y0)),
        ]
    }

    #[test]
    fn test_rotation_right_angles_are_exact() {
        let p = Rotation::degrees(90.0).apply(10.0, 0.0);
        assert_eq!((p.x, p.y), (0.0, -10.0));

        let p = Rotation::degrees(180.0).apply(10.0, 5.0);
        assert_eq!((p.x, p.y), (-10.0, 5.0));

        let p = Rotation::degrees(-90.0).apply(10.0, 0.0);
        assert_eq!((p.x, p.y), (0.0, 10.0));
    }

    #[test]
    fn test_rotation_zero_flips_y() {
        let p = Rotation::degrees(0.0).apply(3.0, 4.0);
        assert_eq!((p.x, p.y), (3.0, -4.0));
    }

    #[test]
    fn test_rotation_arbitrary_angle_preserves_length() {
        let p = Rotation::degrees(30.0).apply(10.0, 0.0);
        assert!(((p.x * p.x + p.y * p.y).sqrt() - 10.0).abs() < 1e-4);
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_fill_outline_paints_square() {
        let mut canvas = Canvas::new(20, 20, BLACK, WHITE).unwrap();
        fill_outline(&mut canvas, &square(0.0, 0.0, 4.0, 3.0), 5, 6, WHITE);

        let painted: Vec<(u32, u32)> = canvas
            .as_image()
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();

        assert_eq!(painted.len(), 12);
        assert!(painted.contains(&(5, 6)));
        assert!(painted.contains(&(8, 8)));
        assert!(!painted.contains(&(9, 6)));
    }

    #[test]
    fn test_fill_outline_empty_is_noop() {
        let mut canvas = Canvas::page(4, 4).unwrap();
        fill_outline(&mut canvas, &[], 0, 0, BLACK);
        assert!(canvas.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_control_box() {
        let curves = square(-2.0, 1.0, 3.0, 7.0);
        assert_eq!(control_box(&curves), Some((-2.0, 1.0, 3.0, 7.0)));
        assert_eq!(control_box(&[]), None);
    }

    #[test]
    fn test_open_missing_font_fails() {
        let result = TtfGlyphs::open(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(ChartError::FontLoad { .. })));
    }

    // DejaVu Sans: 2048 units per em. "H" spans x 201..1339, y 0..1493 and
    // advances 1540; it has only straight edges.
    const DEJAVU_SANS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf");

    fn dejavu() -> TtfGlyphs {
        TtfGlyphs::open(Path::new(DEJAVU_SANS)).unwrap()
    }

    #[test]
    fn test_outline_box_scales_at_96_dpi() {
        let font = dejavu();

        // 192pt × 96/72 = 256px per em → 0.125px per unit
        assert_eq!(
            font.outline_box("H", 192.0, 0.0),
            Some([25, 0, 168, 0, 168, -187, 25, -187])
        );
        // 384pt → 0.25px per unit
        assert_eq!(
            font.outline_box("H", 384.0, 0.0),
            Some([50, 0, 335, 0, 335, -374, 50, -374])
        );
    }

    #[test]
    fn test_outline_box_rotates_about_origin() {
        let font = dejavu();
        assert_eq!(
            font.outline_box("H", 192.0, 90.0),
            Some([0, -25, 0, -168, -187, -168, -187, -25])
        );
        assert_eq!(
            font.outline_box("H", 192.0, 180.0),
            Some([-25, 0, -168, 0, -168, 187, -25, 187])
        );
    }

    #[test]
    fn test_outline_box_steps_by_advance() {
        let font = dejavu();
        // Second "H" starts one advance (1540 units) to the right.
        let single = font.outline_box("H", 192.0, 0.0).unwrap();
        let double = font.outline_box("HH", 192.0, 0.0).unwrap();
        assert_eq!(double[0], single[0]);
        assert_eq!(double[2], ((1540.0 + 1339.0) * 0.125f32).ceil() as i32);
        assert_eq!(double[5], single[5]);
    }

    #[test]
    fn test_draw_text_inks_scaled_outline() {
        let font = dejavu();
        let mut canvas = Canvas::new(200, 220, BLACK, WHITE).unwrap();
        font.draw_text(&mut canvas, "H", 192.0, 0.0, 0, 200, WHITE);

        let inked: Vec<(u32, u32)> = canvas
            .as_image()
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();
        let min_x = inked.iter().map(|p| p.0).min().unwrap();
        let max_x = inked.iter().map(|p| p.0).max().unwrap();
        let min_y = inked.iter().map(|p| p.1).min().unwrap();
        let max_y = inked.iter().map(|p| p.1).max().unwrap();

        // Stems at x 25.125..167.375, top at 186.625px above the baseline.
        assert_eq!((min_x, max_x), (25, 167));
        assert_eq!((min_y, max_y), (200 - 187, 199));
        // Fully covered stem pixel, and the empty counter above the crossbar.
        assert_eq!(canvas.pixel_at(30, 150), Some(WHITE));
        assert_eq!(canvas.pixel_at(96, 50), Some(BLACK));
    }

    #[test]
    fn test_open_fixture_font() {
        let font = dejavu();
        assert_eq!(font.path(), DEJAVU_SANS);
        assert_eq!(font.scale(72.0), Some(96.0 / 2048.0));
    }

    #[test]
    fn test_open_garbage_font_fails() {
        let path = std::env::temp_dir().join("tactile_charts_not_a_font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        let result = TtfGlyphs::open(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ChartError::FontLoad { .. })));
    }
}
