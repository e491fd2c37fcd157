//! screensearch drives a desktop application by finding its controls on
//! screen with template matching and counting repeated marker glyphs.
//!
//! The pipeline, leaves first:
//!
//! - [`Matcher`]: zero-mean normalized cross-correlation with greedy
//!   first-seen-wins deduplication (70% / 20 px by default).
//! - [`Locator`]: named element lookup over a [`TemplateLibrary`] with an
//!   explicit [`LocationCache`].
//! - [`Counter`]: best-effort marker counting.
//! - [`SearchSession`]: the per-identifier input protocol.
//! - [`BatchRunner`]: ordered runs with progress and cooperative cancellation.
//!
//! Screen capture and input injection sit behind the [`ScreenCapture`] and
//! [`InputInjector`] traits; live drivers are behind the `capture-xcap` and
//! `input-enigo` features. Row-parallel scoring is available with `rayon`.

pub mod batch;
pub mod candidate;
pub mod capture;
pub mod counter;
pub mod image;
pub mod input;
pub mod kernel;
pub mod library;
pub mod locator;
pub mod report;
pub mod search;
pub mod session;
pub mod template;
mod trace;
pub mod util;

pub use batch::{BatchConfig, BatchProgress, BatchRunner, BatchSummary, CancelToken};
pub use candidate::{MatchCandidate, Point, Rect};
pub use capture::{FileCapture, ScreenCapture, Screenshot};
#[cfg(feature = "capture-xcap")]
pub use capture::{CaptureTarget, XcapCapture};
pub use counter::{count_markers, Counter};
pub use crate::image::{ImageSource, ImageView, OwnedImage};
#[cfg(feature = "input-enigo")]
pub use input::EnigoInjector;
pub use input::{ConfirmPolicy, ConfirmingInjector, InputAction, InputInjector, NoOpInjector};
pub use kernel::ScoreMap;
pub use library::TemplateLibrary;
pub use locator::{LocatedElement, LocationCache, Locator};
pub use report::{RecordSource, ResultRow, ResultSink, RowStatus};
pub use search::{find_all, MatchConfig, Matcher};
pub use session::{
    OutcomeStatus, SearchOutcome, SearchRecord, SearchSession, Searcher, SessionConfig,
};
pub use template::Template;
pub use util::{ScreenSearchError, ScreenSearchResult};

pub use candidate::dedup::dedup_by_radius;
