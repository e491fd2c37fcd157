//! Grayscale image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a contiguous row-major buffer.

use crate::util::{ScreenSearchError, ScreenSearchResult};

pub mod io;

pub use io::ImageSource;

/// Borrowed 2D view over `width * height` row-major pixels.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a view over the first `width * height` elements of `data`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> ScreenSearchResult<Self> {
        let needed = required_len(width, height)?;
        if data.len() < needed {
            return Err(ScreenSearchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ScreenSearchResult<Self> {
        let needed = required_len(width, height)?;
        if data.len() < needed {
            return Err(ScreenSearchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(ScreenSearchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn required_len(width: usize, height: usize) -> ScreenSearchResult<usize> {
    if width == 0 || height == 0 {
        return Err(ScreenSearchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(ScreenSearchError::InvalidDimensions { width, height })
}
