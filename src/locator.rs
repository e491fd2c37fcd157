//! Element lookup by template name with an explicit location cache.
//!
//! The target UI is assumed static for a session: once an element has been
//! found its rectangle is reused until the cache is invalidated.

use crate::candidate::{MatchCandidate, Point};
use crate::capture::{ScreenCapture, Screenshot};
use crate::library::TemplateLibrary;
use crate::search::Matcher;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{ScreenSearchError, ScreenSearchResult};
use std::collections::HashMap;

/// A resolved element location.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedElement {
    /// Symbolic element name.
    pub name: String,
    /// Winning candidate in screenshot pixels.
    pub candidate: MatchCandidate,
    /// Click target: the candidate center in screen coordinates.
    pub center: Point,
}

impl LocatedElement {
    /// Places `candidate`, found on `shot`, on screen.
    pub fn new(name: impl Into<String>, candidate: MatchCandidate, shot: &Screenshot) -> Self {
        Self {
            name: name.into(),
            center: shot.to_screen(candidate.center()),
            candidate,
        }
    }
}

/// Name → location cache with no expiry.
#[derive(Debug, Default)]
pub struct LocationCache {
    entries: HashMap<String, LocatedElement>,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&LocatedElement> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, element: LocatedElement) {
        self.entries.insert(element.name.clone(), element);
    }

    /// Forgets one element; returns whether it was cached.
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Forgets every element.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finds named UI elements on screen, caching their locations.
pub struct Locator<C> {
    library: TemplateLibrary,
    capture: C,
    cache: LocationCache,
}

impl<C: ScreenCapture> Locator<C> {
    pub fn new(library: TemplateLibrary, capture: C) -> Self {
        Self {
            library,
            capture,
            cache: LocationCache::new(),
        }
    }

    /// Returns the location of `name`.
    ///
    /// Cached names return immediately. On a miss the supplied screenshot is
    /// used, or a fresh one is captured, and the best match is cached in
    /// screen coordinates.
    pub fn find(
        &mut self,
        name: &str,
        screenshot: Option<&Screenshot>,
    ) -> ScreenSearchResult<LocatedElement> {
        let _span = trace_span!("locate", element = name).entered();

        if let Some(hit) = self.cache.get(name) {
            trace_debug!("locate_cache_hit", element = name);
            return Ok(hit.clone());
        }

        let template = self.library.get(name)?;
        let captured;
        let screenshot = match screenshot {
            Some(shot) => shot,
            None => {
                captured = self.capture.capture()?;
                &captured
            }
        };
        let haystack = screenshot.image.to_gray()?;

        let cfg = *self.library.match_config();
        let matcher = Matcher::new(&template)?.with_config(cfg);
        let candidate =
            matcher
                .best(haystack.view())
                .ok_or_else(|| ScreenSearchError::ElementNotFound {
                    name: name.to_owned(),
                    threshold: cfg.threshold,
                })?;

        let element = LocatedElement::new(name, candidate, screenshot);
        trace_event!(
            "element_located",
            element = name,
            x = element.center.x,
            y = element.center.y,
            score = element.candidate.score
        );
        self.cache.insert(element.clone());
        Ok(element)
    }

    /// Captures the screen through the locator's capture provider.
    pub fn capture_screen(&mut self) -> ScreenSearchResult<Screenshot> {
        self.capture.capture()
    }

    /// Drops every cached location.
    pub fn clear_cache(&mut self) {
        self.cache.invalidate_all();
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut LocationCache {
        &mut self.cache
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut TemplateLibrary {
        &mut self.library
    }
}
