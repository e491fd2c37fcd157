//! Screen capture providers.
//!
//! A capture may cover only part of the desktop (one window, or a monitor
//! that is not at the desktop origin), so every [`Screenshot`] carries the
//! screen position of its top-left pixel. Matches are found in image pixels
//! and mapped back through [`Screenshot::to_screen`] before any click.

use crate::candidate::Point;
use crate::trace::trace_debug;
use crate::util::ScreenSearchResult;
use crate::ImageSource;
use std::path::PathBuf;

/// A captured image and where it sits on screen.
#[derive(Clone, Debug)]
pub struct Screenshot {
    pub image: ImageSource,
    /// Screen coordinates of the top-left pixel, in input units.
    pub origin: Point,
    /// Image pixels per input unit (2.0 on a HiDPI display).
    pub scale: f32,
}

impl Screenshot {
    /// A full-desktop image at the screen origin with 1:1 scale.
    pub fn new(image: impl Into<ImageSource>) -> Self {
        Self {
            image: image.into(),
            origin: Point::new(0, 0),
            scale: 1.0,
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Maps an image pixel to screen coordinates.
    pub fn to_screen(&self, pixel: Point) -> Point {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        Point::new(
            self.origin.x + (pixel.x as f32 / scale).round() as i32,
            self.origin.y + (pixel.y as f32 / scale).round() as i32,
        )
    }
}

impl From<ImageSource> for Screenshot {
    fn from(value: ImageSource) -> Self {
        Self::new(value)
    }
}

/// Produces an image of the current screen (or a target window).
pub trait ScreenCapture {
    fn capture(&mut self) -> ScreenSearchResult<Screenshot>;
}

impl<C: ScreenCapture + ?Sized> ScreenCapture for Box<C> {
    fn capture(&mut self) -> ScreenSearchResult<Screenshot> {
        (**self).capture()
    }
}

/// Replays a screenshot saved on disk; used for dry runs against a recording.
pub struct FileCapture {
    path: PathBuf,
    origin: Point,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: Point::new(0, 0),
        }
    }

    /// Screen position the recorded image was taken at.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }
}

impl ScreenCapture for FileCapture {
    fn capture(&mut self) -> ScreenSearchResult<Screenshot> {
        trace_debug!("capture_file", path = &*self.path.to_string_lossy());
        Ok(Screenshot::new(ImageSource::Path(self.path.clone())).with_origin(self.origin))
    }
}

/// What an [`XcapCapture`] grabs.
#[cfg(feature = "capture-xcap")]
#[derive(Clone, Debug)]
pub enum CaptureTarget {
    /// The primary monitor, or the first one reported.
    PrimaryMonitor,
    /// The first window whose title contains this string.
    Window(String),
}

/// Live capture via `xcap`.
#[cfg(feature = "capture-xcap")]
pub struct XcapCapture {
    target: CaptureTarget,
}

#[cfg(feature = "capture-xcap")]
impl XcapCapture {
    pub fn new(target: CaptureTarget) -> Self {
        Self { target }
    }

    fn capture_primary() -> ScreenSearchResult<Screenshot> {
        let monitors = xcap::Monitor::all().map_err(capture_error)?;
        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or_else(|| crate::ScreenSearchError::CaptureFailure {
                reason: "no monitor found".into(),
            })?;
        let image = monitor.capture_image().map_err(capture_error)?;
        let origin = Point::new(
            monitor.x().map_err(capture_error)?,
            monitor.y().map_err(capture_error)?,
        );
        let width = monitor.width().map_err(capture_error)?;
        Ok(placed(image, origin, width))
    }

    fn capture_window(title: &str) -> ScreenSearchResult<Screenshot> {
        let windows = xcap::Window::all().map_err(capture_error)?;
        let window = windows
            .iter()
            .find(|w| w.title().map(|t| t.contains(title)).unwrap_or(false))
            .ok_or_else(|| crate::ScreenSearchError::CaptureFailure {
                reason: format!("no window titled '{title}'"),
            })?;
        let image = window.capture_image().map_err(capture_error)?;
        let origin = Point::new(
            window.x().map_err(capture_error)?,
            window.y().map_err(capture_error)?,
        );
        let width = window.width().map_err(capture_error)?;
        Ok(placed(image, origin, width))
    }
}

/// Scale is derived from the captured pixels over the reported width, so
/// HiDPI backends that report logical geometry map back correctly.
#[cfg(feature = "capture-xcap")]
fn placed(image: ::image::RgbaImage, origin: Point, logical_width: u32) -> Screenshot {
    let scale = if logical_width == 0 {
        1.0
    } else {
        image.width() as f32 / logical_width as f32
    };
    trace_debug!(
        "capture_screen",
        width = image.width(),
        height = image.height(),
        x = origin.x,
        y = origin.y,
        scale = scale
    );
    Screenshot::new(::image::DynamicImage::ImageRgba8(image))
        .with_origin(origin)
        .with_scale(scale)
}

#[cfg(feature = "capture-xcap")]
impl ScreenCapture for XcapCapture {
    fn capture(&mut self) -> ScreenSearchResult<Screenshot> {
        match &self.target {
            CaptureTarget::PrimaryMonitor => Self::capture_primary(),
            CaptureTarget::Window(title) => Self::capture_window(title),
        }
    }
}

#[cfg(feature = "capture-xcap")]
fn capture_error(err: xcap::XCapError) -> crate::ScreenSearchError {
    crate::ScreenSearchError::CaptureFailure {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{FileCapture, ScreenCapture, Screenshot};
    use crate::candidate::Point;

    #[test]
    fn pixels_map_through_origin_and_scale() {
        let shot = Screenshot::new(::image::GrayImage::new(4, 4));
        assert_eq!(shot.to_screen(Point::new(30, 16)), Point::new(30, 16));

        let window = shot.clone().with_origin(Point::new(300, 200));
        assert_eq!(window.to_screen(Point::new(30, 16)), Point::new(330, 216));

        let left_hidpi = shot.with_origin(Point::new(-1920, 0)).with_scale(2.0);
        assert_eq!(left_hidpi.to_screen(Point::new(100, 50)), Point::new(-1870, 25));
    }

    #[test]
    fn bogus_scale_falls_back_to_identity() {
        let shot = Screenshot::new(::image::GrayImage::new(4, 4)).with_scale(0.0);
        assert_eq!(shot.to_screen(Point::new(7, 9)), Point::new(7, 9));
    }

    #[test]
    fn file_capture_reports_configured_origin() {
        let mut capture = FileCapture::new("screen.png").with_origin(Point::new(5, 6));
        let shot = capture.capture().unwrap();
        assert_eq!(shot.origin, Point::new(5, 6));
        assert_eq!(shot.scale, 1.0);
    }
}
