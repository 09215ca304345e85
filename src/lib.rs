//! # Tactile Charts
//!
//! Renders printable tactile-acuity test charts as PNG images: Legge's dot
//! chart (braille-like dot cells at shrinking spacings) and the Landolt C
//! chart (rotated rings at shrinking font sizes).
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use tactile_charts::charts::{self, FontOverrides};
//!
//! let spec = charts::by_name("dot-baseline").unwrap();
//!
//! // Writes dotchart.png and dotchart_labelled.png
//! charts::write_chart(spec, &FontOverrides::default(), Path::new("."))?;
//!
//! # Ok::<(), tactile_charts::ChartError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`canvas`] | Owned RGB raster surface and PNG export |
//! | [`glyph`] | Font metrics/rasterization seam and TrueType implementation |
//! | [`measure`] | Tight ink bounding boxes of rotated text |
//! | [`dots`] | Dot symbol cells |
//! | [`landolt`] | Rotated Landolt C symbols |
//! | [`layout`] | Row-by-row chart layout and labelling |
//! | [`config`] | Page geometry, label style, row tables |
//! | [`charts`] | The chart variants and PNG output |
//! | [`error`] | Error types |

pub mod canvas;
pub mod charts;
pub mod config;
pub mod dots;
pub mod error;
pub mod glyph;
pub mod landolt;
pub mod layout;
pub mod measure;

// Re-exports for convenience
pub use config::{ChartRowSpec, ChartSpec};
pub use error::ChartError;
pub use layout::{ChartLayoutEngine, ChartRender};
