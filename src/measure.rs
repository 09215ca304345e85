//! # Ink Bounding Boxes
//!
//! Measures the tight ink extents of rendered text, including rotated text.
//!
//! Font outline boxes are only an approximation of where ink lands: hinting,
//! anti-aliasing and rotation all move it. Instead of trusting them, the text
//! is actually rasterized into an oversized scratch canvas and every pixel is
//! scanned for ink.
//!
//! ```text
//!   scratch canvas (4w × 4h), filled black
//!  ┌──────────────────────────────┐
//!  │                              │
//!  │       ┌──────┐ ◄─ scan min   │
//!  │       │ ink  │               │
//!  │       └──────┘ ◄─ scan max   │
//!  │              ● anchor (left, top) = (|minX|+w, |minY|+h)
//!  └──────────────────────────────┘
//! ```
//!
//! The full scan is O(w·h·16) per call. That is an accuracy-over-speed
//! tradeoff: charts are generated offline, never interactively.

use serde::Serialize;

use crate::canvas::{BLACK, Canvas, WHITE};
use crate::error::ChartError;
use crate::glyph::GlyphSource;

/// Tight ink box of rendered text.
///
/// `left`/`top` are drawing-origin offsets: drawing the text at
/// `(anchor_x + left, anchor_y + top)` puts the top-left ink pixel on the
/// anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// True when the box cannot contain any ink (width or height ≤ 0).
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Result of measuring a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// The glyph source had no outline box for the text.
    Empty,
    /// An outline exists but no pixel was painted. The box holds the scan
    /// sentinels untouched: `scan_min = (4w, 4h)` and `scan_max = (0, 0)`.
    NoInk(BoundingBox),
    /// Ink found.
    Ink(BoundingBox),
}

impl Measurement {
    /// The ink box, if any ink was found.
    pub fn ink(&self) -> Option<BoundingBox> {
        match self {
            Measurement::Ink(b) => Some(*b),
            _ => None,
        }
    }
}

/// Measure the ink box of `text` rendered at `point_size`, rotated by
/// `angle` degrees.
pub fn measure(
    glyphs: &dyn GlyphSource,
    text: &str,
    point_size: f32,
    angle: f32,
) -> Result<Measurement, ChartError> {
    let Some(corners) = glyphs.outline_box(text, point_size, angle) else {
        return Ok(Measurement::Empty);
    };

    let xs = [corners[0], corners[2], corners[4], corners[6]];
    let ys = [corners[1], corners[3], corners[5], corners[7]];
    let min_x = xs.iter().copied().min().unwrap_or(0);
    let max_x = xs.iter().copied().max().unwrap_or(0);
    let min_y = ys.iter().copied().min().unwrap_or(0);
    let max_y = ys.iter().copied().max().unwrap_or(0);

    let width = max_x - min_x;
    let height = max_y - min_y;
    let left = min_x.abs() + width;
    let top = min_y.abs() + height;

    let scan_w = (width as u32) << 2;
    let scan_h = (height as u32) << 2;

    // Reversed palette: base fill is black and the text is drawn white, so
    // any non-black pixel is ink.
    let mut scratch = Canvas::new(scan_w, scan_h, BLACK, WHITE)?;
    glyphs.draw_text(&mut scratch, text, point_size, angle, left, top, WHITE);

    let mut scan_left = scan_w as i32;
    let mut scan_right = 0i32;
    let mut scan_top = scan_h as i32;
    let mut scan_bottom = 0i32;
    let mut found = false;

    for (x, y, px) in scratch.as_image().enumerate_pixels() {
        if *px != BLACK {
            found = true;
            scan_left = scan_left.min(x as i32);
            scan_right = scan_right.max(x as i32);
            scan_top = scan_top.min(y as i32);
            scan_bottom = scan_bottom.max(y as i32);
        }
    }
    drop(scratch);

    let bbox = BoundingBox {
        left: (left - scan_left) as f32,
        top: (top - scan_top) as f32,
        width: scan_right - scan_left + 1,
        height: scan_bottom - scan_top + 1,
    };

    if found {
        Ok(Measurement::Ink(bbox))
    } else {
        Ok(Measurement::NoInk(bbox))
    }
}
