//! Decoding screenshots and templates into grayscale buffers via the `image` crate.
//!
//! Color is discarded: every source is converted to 8-bit luma before matching.

use crate::image::OwnedImage;
use crate::util::{ScreenSearchError, ScreenSearchResult};
use std::path::{Path, PathBuf};

/// Where an image comes from: a file, an encoded buffer or an already decoded image.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Image file on disk (format guessed from the extension).
    Path(PathBuf),
    /// Encoded bytes (PNG or JPEG).
    Encoded(Vec<u8>),
    /// In-memory image, e.g. straight from a capture provider.
    Decoded(::image::DynamicImage),
}

impl ImageSource {
    /// Decodes the source into a grayscale owned image.
    pub fn to_gray(&self) -> ScreenSearchResult<OwnedImage> {
        match self {
            Self::Path(path) => load_gray_image(path),
            Self::Encoded(bytes) => {
                let img = ::image::load_from_memory(bytes).map_err(decode_error)?;
                owned_from_dynamic_image(&img)
            }
            Self::Decoded(img) => owned_from_dynamic_image(img),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for ImageSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<::image::DynamicImage> for ImageSource {
    fn from(value: ::image::DynamicImage) -> Self {
        Self::Decoded(value)
    }
}

impl From<::image::GrayImage> for ImageSource {
    fn from(value: ::image::GrayImage) -> Self {
        Self::Decoded(::image::DynamicImage::ImageLuma8(value))
    }
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &::image::GrayImage) -> ScreenSearchResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height).map_err(|err| {
        ScreenSearchError::ImageDecodeFailure {
            reason: err.to_string(),
        }
    })
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &::image::DynamicImage) -> ScreenSearchResult<OwnedImage> {
    let gray = img.to_luma8();
    owned_from_gray_image(&gray)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> ScreenSearchResult<OwnedImage> {
    let path = path.as_ref();
    let img = ::image::open(path).map_err(|err| ScreenSearchError::ImageDecodeFailure {
        reason: format!("{}: {err}", path.display()),
    })?;
    owned_from_dynamic_image(&img)
}

fn decode_error(err: ::image::ImageError) -> ScreenSearchError {
    ScreenSearchError::ImageDecodeFailure {
        reason: err.to_string(),
    }
}
