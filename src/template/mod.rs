//! Named reference images and their correlation plans.

use crate::image::{ImageSource, ImageView, OwnedImage};
use crate::util::ScreenSearchResult;

mod plan;

pub use plan::TemplatePlan;

/// Immutable grayscale reference image with a symbolic name.
#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    img: OwnedImage,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    pub fn new(
        name: impl Into<String>,
        data: Vec<u8>,
        width: usize,
        height: usize,
    ) -> ScreenSearchResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self::from_image(name, img))
    }

    /// Wraps an already decoded grayscale image.
    pub fn from_image(name: impl Into<String>, img: OwnedImage) -> Self {
        Self {
            name: name.into(),
            img,
        }
    }

    /// Decodes `source` and converts it to grayscale.
    pub fn decode(name: impl Into<String>, source: &ImageSource) -> ScreenSearchResult<Self> {
        Ok(Self::from_image(name, source.to_gray()?))
    }

    /// Returns the symbolic element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }
}
