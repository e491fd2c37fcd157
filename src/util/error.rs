//! Error types for screensearch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for screensearch operations.
pub type ScreenSearchResult<T> = std::result::Result<T, ScreenSearchError>;

/// Errors that can occur while locating elements or driving a search.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScreenSearchError {
    /// No template file exists for the requested element name.
    #[error("template not found: {}", path.display())]
    TemplateNotFound {
        /// Symbolic element name that was requested.
        name: String,
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The template exists but no placement cleared the threshold.
    #[error("UI element '{name}' not found (threshold {threshold})")]
    ElementNotFound {
        /// Symbolic element name that was requested.
        name: String,
        /// Similarity threshold that was applied.
        threshold: f32,
    },
    /// A screenshot or template could not be decoded.
    #[error("image decode failed: {reason}")]
    ImageDecodeFailure {
        /// Decoder message.
        reason: String,
    },
    /// The input injector could not perform an action.
    #[error("input injection failed: {reason}")]
    InjectionFailure {
        /// Injector message.
        reason: String,
    },
    /// The capture provider could not produce a screenshot.
    #[error("screen capture failed: {reason}")]
    CaptureFailure {
        /// Capture provider message.
        reason: String,
    },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Backing buffer is shorter than the declared layout.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

impl ScreenSearchError {
    /// Returns true for the "template missing" condition.
    pub fn is_template_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }
}
