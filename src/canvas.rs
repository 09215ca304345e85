//! # Raster Canvas
//!
//! Owned RGB pixel buffer used for every surface in the renderer: the page,
//! per-symbol dot cells, and the scratch canvas of the bounding-box scan.
//!
//! A canvas carries a background color (what it is allocated with) and a
//! foreground color (the default ink). Drawing clips silently at the edges.
//!
//! ## Coordinates
//!
//! ```text
//! (0,0) ──────────► x
//!   │
//!   │   pixels addressed as (x, y), y grows downwards
//!   ▼
//!   y
//! ```

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::error::ChartError;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Ink used for row labels.
pub const LABEL_RED: Rgb<u8> = Rgb([200, 0, 0]);

/// Largest canvas we agree to allocate (pixels). A letter page at 600 DPI is
/// ~34M pixels; the scratch canvas of a 200pt glyph is far smaller.
const MAX_PIXELS: u64 = 1 << 28;

/// RGB raster surface with a background and a foreground color.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
    background: Rgb<u8>,
    foreground: Rgb<u8>,
}

impl Canvas {
    /// Allocate a canvas filled with `background`.
    pub fn new(
        width: u32,
        height: u32,
        background: Rgb<u8>,
        foreground: Rgb<u8>,
    ) -> Result<Self, ChartError> {
        let pixels = width as u64 * height as u64;
        if pixels > MAX_PIXELS {
            return Err(ChartError::Image(format!(
                "Canvas allocation of {}x{} exceeds {} pixels",
                width, height, MAX_PIXELS
            )));
        }

        Ok(Self {
            image: RgbImage::from_pixel(width, height, background),
            background,
            foreground,
        })
    }

    /// White page with black ink.
    pub fn page(width: u32, height: u32) -> Result<Self, ChartError> {
        Self::new(width, height, WHITE, BLACK)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    #[inline]
    pub fn foreground(&self) -> Rgb<u8> {
        self.foreground
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Pixel at (x, y), or `None` outside the canvas.
    #[inline]
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Set one pixel, ignoring coordinates outside the canvas.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if self.in_bounds(x, y) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Mix `color` into the pixel at (x, y) with the given coverage in [0, 1].
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
        if !self.in_bounds(x, y) || coverage <= 0.0 {
            return;
        }
        if coverage >= 1.0 {
            self.image.put_pixel(x as u32, y as u32, color);
            return;
        }

        let px = self.image.get_pixel_mut(x as u32, y as u32);
        for (dst, src) in px.0.iter_mut().zip(color.0) {
            let mixed = *dst as f32 * (1.0 - coverage) + src as f32 * coverage;
            *dst = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Fill the inclusive rectangle (x0, y0)..=(x1, y1).
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
        let x_start = x0.min(x1).max(0);
        let y_start = y0.min(y1).max(0);
        let x_end = x0.max(x1).min(self.width() as i32 - 1);
        let y_end = y0.max(y1).min(self.height() as i32 - 1);

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Filled axis-aligned ellipse centered on (cx, cy) with the given
    /// diameters. Semi-axes are the integer halves of the diameters, so a
    /// 23px dot covers 11px either side of its center.
    pub fn fill_ellipse(&mut self, cx: i32, cy: i32, width: i32, height: i32, color: Rgb<u8>) {
        let a = (width / 2).max(0);
        let b = (height / 2).max(0);

        for dy in -b..=b {
            let half = if b == 0 {
                a
            } else {
                let t = dy as f32 / b as f32;
                (a as f32 * (1.0 - t * t).max(0.0).sqrt()).floor() as i32
            };
            for dx in -half..=half {
                self.put(cx + dx, cy + dy, color);
            }
        }
    }

    /// Copy all of `src` so its top-left corner lands on (dst_x, dst_y).
    pub fn copy_from(&mut self, src: &Canvas, dst_x: i32, dst_y: i32) {
        for (x, y, px) in src.image.enumerate_pixels() {
            self.put(dst_x + x as i32, dst_y + y as i32, *px);
        }
    }

    /// Encode as PNG with no row filter and a fixed compression level.
    pub fn to_png(&self) -> Result<Vec<u8>, ChartError> {
        let mut png_bytes = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut png_bytes,
            CompressionType::Default,
            FilterType::NoFilter,
        );
        encoder.write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            ExtendedColorType::Rgb8,
        )?;

        Ok(png_bytes)
    }
}
