//! Best-effort counting of a repeated marker glyph.
//!
//! Counting never fails: a missing marker template or an undecodable image
//! degrades to a count of zero with a logged reason.

use crate::library::TemplateLibrary;
use crate::search::{MatchConfig, Matcher};
use crate::template::Template;
use crate::trace::{trace_event, trace_warn};
use crate::util::{ScreenSearchError, ScreenSearchResult};
use crate::ImageSource;
use std::path::Path;

/// Default marker template name (`checkbox.png`).
pub const DEFAULT_MARKER: &str = "checkbox";

/// Counts marker occurrences using the shared threshold and dedup policy.
#[derive(Clone, Debug)]
pub struct Counter {
    marker: String,
    cfg: MatchConfig,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl Counter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            cfg: MatchConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Marker template name looked up in the library.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Counts markers on `screenshot`, loading the marker through `library`.
    pub fn count(&self, library: &mut TemplateLibrary, screenshot: &ImageSource) -> usize {
        let result = library
            .get(&self.marker)
            .and_then(|marker| count_with(screenshot, &marker, &self.cfg));
        settle(&self.marker, result)
    }
}

/// Counts deduplicated matches of the template file `marker_template` on
/// `screenshot`. Returns 0 when the template is absent or either image fails
/// to decode.
pub fn count_markers(
    screenshot: &ImageSource,
    marker_template: &Path,
    threshold: f32,
    dedup_radius: u32,
) -> usize {
    let name = marker_template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let result = if marker_template.is_file() {
        Template::decode(name.as_str(), &ImageSource::Path(marker_template.to_path_buf()))
            .and_then(|marker| {
                let cfg = MatchConfig::default()
                    .with_threshold(threshold)
                    .with_dedup_radius(dedup_radius);
                count_with(screenshot, &marker, &cfg)
            })
    } else {
        Err(ScreenSearchError::TemplateNotFound {
            name: name.clone(),
            path: marker_template.to_path_buf(),
        })
    };
    settle(&name, result)
}

fn count_with(
    screenshot: &ImageSource,
    marker: &Template,
    cfg: &MatchConfig,
) -> ScreenSearchResult<usize> {
    let haystack = screenshot.to_gray()?;
    let matcher = Matcher::new(marker)?.with_config(*cfg);
    Ok(matcher.find_all(haystack.view()).len())
}

fn settle(marker: &str, result: ScreenSearchResult<usize>) -> usize {
    match result {
        Ok(count) => {
            trace_event!("markers_counted", marker = marker, count = count);
            count
        }
        Err(err) => {
            trace_warn!(
                "marker_count_degraded",
                marker = marker,
                reason = err.to_string().as_str()
            );
            0
        }
    }
}
