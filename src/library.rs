//! Disk-backed template library.
//!
//! Templates live one per file as `<dir>/<name>.png`. They are decoded on
//! first use and kept for the lifetime of the library; a missing file is an
//! ordinary [`ScreenSearchError::TemplateNotFound`], never a startup failure.

use crate::search::MatchConfig;
use crate::template::Template;
use crate::trace::trace_debug;
use crate::util::{ScreenSearchError, ScreenSearchResult};
use crate::ImageSource;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extension of template images.
pub const TEMPLATE_EXTENSION: &str = "png";

/// Lazily loaded, name-addressed template store.
pub struct TemplateLibrary {
    dir: PathBuf,
    match_cfg: MatchConfig,
    loaded: HashMap<String, Arc<Template>>,
}

impl TemplateLibrary {
    /// Creates a library rooted at `dir` with the default match configuration.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            match_cfg: MatchConfig::default(),
            loaded: HashMap::new(),
        }
    }

    /// Replaces the default match configuration used for element lookups.
    pub fn with_match_config(mut self, cfg: MatchConfig) -> Self {
        self.match_cfg = cfg;
        self
    }

    /// Root directory of the library.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Default match configuration for this library.
    pub fn match_config(&self) -> &MatchConfig {
        &self.match_cfg
    }

    /// Path a template with this name resolves to.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }

    /// Returns the template called `name`, decoding it on first use.
    pub fn get(&mut self, name: &str) -> ScreenSearchResult<Arc<Template>> {
        if let Some(template) = self.loaded.get(name) {
            return Ok(Arc::clone(template));
        }

        let path = self.template_path(name);
        if !path.is_file() {
            return Err(ScreenSearchError::TemplateNotFound {
                name: name.to_owned(),
                path,
            });
        }

        let template = Arc::new(Template::decode(name, &ImageSource::Path(path))?);
        trace_debug!(
            "template_loaded",
            name = name,
            width = template.width(),
            height = template.height()
        );
        self.loaded.insert(name.to_owned(), Arc::clone(&template));
        Ok(template)
    }

    /// Number of templates decoded so far.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}
