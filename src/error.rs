//! # Error Types
//!
//! This module defines error types used throughout the chart renderer.

use thiserror::Error;

/// Main error type for chart generation.
///
/// Every variant is fatal for the chart being generated: there is no
/// partial-success mode, and nothing is written to disk once one is raised.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A row sequence contains a symbol the chart kind does not know
    #[error("Unknown symbol '{symbol}'{}", location(.row, .position))]
    UnknownSymbol {
        symbol: char,
        row: Option<String>,
        position: Option<usize>,
    },

    /// No chart variant with this name
    #[error("Unknown chart '{0}'")]
    UnknownChart(String),

    /// Font file missing or unparseable
    #[error("Failed to load font {path}: {reason}")]
    FontLoad { path: String, reason: String },

    /// The font has no outline at all for the requested text
    #[error("No glyph outline for {text:?}")]
    EmptyGlyph { text: String },

    /// Image allocation or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Unknown symbol with no row context yet.
    pub fn unknown_symbol(symbol: char) -> Self {
        ChartError::UnknownSymbol {
            symbol,
            row: None,
            position: None,
        }
    }

    /// Attach the row label and sequence position to an unknown-symbol error.
    /// Other errors pass through unchanged.
    pub fn located(self, label: &str, index: usize) -> Self {
        match self {
            ChartError::UnknownSymbol { symbol, .. } => ChartError::UnknownSymbol {
                symbol,
                row: Some(label.to_string()),
                position: Some(index),
            },
            other => other,
        }
    }
}

fn location(row: &Option<String>, position: &Option<usize>) -> String {
    match (row, position) {
        (Some(row), Some(pos)) => format!(" in row {} (position {})", row, pos),
        (Some(row), None) => format!(" in row {}", row),
        _ => String::new(),
    }
}

impl From<image::ImageError> for ChartError {
    fn from(e: image::ImageError) -> Self {
        ChartError::Image(e.to_string())
    }
}
