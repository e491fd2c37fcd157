//! One end-to-end lookup of one identifier against the target application.
//!
//! [`SearchSession::search`] is blocking and never fails: every error raised
//! while locating, typing, clicking or capturing becomes an error
//! [`SearchOutcome`] so a batch run keeps going.

use crate::capture::ScreenCapture;
use crate::counter::{Counter, DEFAULT_MARKER};
use crate::input::InputInjector;
use crate::locator::Locator;
use crate::search::MatchConfig;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{ScreenSearchError, ScreenSearchResult};
use std::time::Duration;

/// Input to one search, as supplied by a record source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchRecord {
    /// Opaque identifier typed into the target application.
    pub identifier: String,
    pub display_name: Option<String>,
    pub sequence_number: Option<u64>,
}

impl SearchRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_sequence_number(mut self, seq: u64) -> Self {
        self.sequence_number = Some(seq);
        self
    }
}

/// Status tag of a [`SearchOutcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Result of one search; exactly one is produced per record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub identifier: String,
    /// Marker count; always 0 for errors.
    pub count: usize,
    pub status: OutcomeStatus,
    pub message: String,
}

impl SearchOutcome {
    pub fn success(identifier: impl Into<String>, count: usize) -> Self {
        Self {
            identifier: identifier.into(),
            count,
            status: OutcomeStatus::Success,
            message: format!("Found {count} members"),
        }
    }

    pub fn error(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            count: 0,
            status: OutcomeStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Anything that can look up one identifier and always report an outcome.
pub trait Searcher {
    fn search(&mut self, identifier: &str) -> SearchOutcome;
}

/// Element names, key chords and settle delays of the search protocol.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub input_field: String,
    pub search_button: String,
    pub marker: String,
    /// Chord that selects the current field content.
    pub select_all: Vec<String>,
    /// Key that deletes the selection.
    pub clear_key: String,
    /// Wait after each click.
    pub click_delay: Duration,
    /// Wait after key and typing actions, and before the result capture.
    pub settle_delay: Duration,
    /// Threshold and dedup policy for marker counting.
    pub marker_match: MatchConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            input_field: "input_field".into(),
            search_button: "search_button".into(),
            marker: DEFAULT_MARKER.into(),
            select_all: vec!["ctrl".into(), "a".into()],
            clear_key: "delete".into(),
            click_delay: Duration::from_millis(500),
            settle_delay: Duration::from_millis(100),
            marker_match: MatchConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Same protocol with every delay set to zero.
    pub fn without_delays(mut self) -> Self {
        self.click_delay = Duration::ZERO;
        self.settle_delay = Duration::ZERO;
        self
    }
}

/// Drives the locate → clear → type → submit → capture → count protocol.
pub struct SearchSession<C, I> {
    locator: Locator<C>,
    injector: I,
    counter: Counter,
    cfg: SessionConfig,
}

impl<C: ScreenCapture, I: InputInjector> SearchSession<C, I> {
    pub fn new(locator: Locator<C>, injector: I, cfg: SessionConfig) -> Self {
        let counter = Counter::new(cfg.marker.clone()).with_config(cfg.marker_match);
        Self {
            locator,
            injector,
            counter,
            cfg,
        }
    }

    /// Looks up `identifier`; failures become error outcomes.
    pub fn search(&mut self, identifier: &str) -> SearchOutcome {
        let _span = trace_span!("search", identifier = identifier).entered();

        match self.try_search(identifier) {
            Ok(count) => {
                trace_event!("search_done", identifier = identifier, count = count);
                SearchOutcome::success(identifier, count)
            }
            Err(err) => {
                let message = err.to_string();
                trace_warn!(
                    "search_failed",
                    identifier = identifier,
                    reason = message.as_str()
                );
                SearchOutcome::error(identifier, message)
            }
        }
    }

    fn try_search(&mut self, identifier: &str) -> ScreenSearchResult<usize> {
        if identifier.is_empty() {
            return Err(ScreenSearchError::InvalidInput("empty identifier"));
        }

        let input_field = self.locator.find(&self.cfg.input_field, None)?;
        self.injector.click(input_field.center)?;
        pause(self.cfg.click_delay);

        self.injector.hotkey(&self.cfg.select_all)?;
        self.injector.press_key(&self.cfg.clear_key)?;
        pause(self.cfg.settle_delay);

        self.injector.type_text(identifier)?;
        pause(self.cfg.settle_delay);

        let search_button = self.locator.find(&self.cfg.search_button, None)?;
        self.injector.click(search_button.center)?;
        pause(self.cfg.click_delay);
        pause(self.cfg.settle_delay);

        let screenshot = self.locator.capture_screen()?;
        Ok(self.counter.count(self.locator.library_mut(), &screenshot.image))
    }

    pub fn locator(&self) -> &Locator<C> {
        &self.locator
    }

    /// Mutable access, e.g. to invalidate cached locations between runs.
    pub fn locator_mut(&mut self) -> &mut Locator<C> {
        &mut self.locator
    }

    pub fn config(&self) -> &SessionConfig {
        &self.cfg
    }
}

impl<C: ScreenCapture, I: InputInjector> Searcher for SearchSession<C, I> {
    fn search(&mut self, identifier: &str) -> SearchOutcome {
        SearchSession::search(self, identifier)
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::{OutcomeStatus, SearchOutcome, SearchRecord};

    #[test]
    fn outcome_constructors_keep_invariants() {
        let ok = SearchOutcome::success("900101-1234567", 3);
        assert!(ok.is_success());
        assert_eq!(ok.message, "Found 3 members");

        let err = SearchOutcome::error("900101-1234567", "boom");
        assert_eq!(err.status, OutcomeStatus::Error);
        assert_eq!(err.count, 0);
    }

    #[test]
    fn record_builder_sets_optional_fields() {
        let record = SearchRecord::new("id-1")
            .with_display_name("Kim")
            .with_sequence_number(7);
        assert_eq!(record.display_name.as_deref(), Some("Kim"));
        assert_eq!(record.sequence_number, Some(7));
    }
}
