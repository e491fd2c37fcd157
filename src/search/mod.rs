//! Template search: score surface, thresholding and deduplication.
//!
//! [`Matcher`] binds one template plan to a [`MatchConfig`]; [`find_all`] is
//! the one-shot entry point over undecoded sources.

pub(crate) mod scan;

use crate::candidate::dedup::dedup_by_radius;
use crate::candidate::MatchCandidate;
use crate::image::ImageSource;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::ZnccRayon;
use crate::kernel::scalar::ZnccScalar;
use crate::kernel::{Kernel, ScoreMap};
use crate::search::scan::candidates_above;
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::ScreenSearchResult;
use crate::ImageView;

/// Default similarity threshold (70%).
pub const DEFAULT_THRESHOLD: f32 = 0.7;
/// Default deduplication radius in pixels.
pub const DEFAULT_DEDUP_RADIUS: u32 = 20;

/// Configuration for thresholding and deduplication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Minimum normalized correlation a placement needs to become a candidate.
    pub threshold: f32,
    /// Candidates closer than this to an accepted one are dropped.
    pub dedup_radius: u32,
    /// Windows with variance at or below this never score.
    pub min_var_i: f64,
    /// Compute the surface row-parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            dedup_radius: DEFAULT_DEDUP_RADIUS,
            min_var_i: 1e-8,
            parallel: false,
        }
    }
}

impl MatchConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_dedup_radius(mut self, radius: u32) -> Self {
        self.dedup_radius = radius;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Template matcher bound to one precomputed template plan.
pub struct Matcher {
    plan: TemplatePlan,
    cfg: MatchConfig,
}

impl Matcher {
    /// Precomputes the correlation plan for `template`.
    pub fn new(template: &Template) -> ScreenSearchResult<Self> {
        Ok(Self {
            plan: TemplatePlan::from_view(template.view())?,
            cfg: MatchConfig::default(),
        })
    }

    /// Replaces the match configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Computes the full similarity surface over `image`.
    pub fn score_map(&self, image: ImageView<'_, u8>) -> ScoreMap {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return <ZnccRayon as Kernel>::surface(image, &self.plan, self.cfg.min_var_i);
        }
        <ZnccScalar as Kernel>::surface(image, &self.plan, self.cfg.min_var_i)
    }

    /// All placements clearing the threshold, before deduplication.
    pub fn raw_candidates(&self, image: ImageView<'_, u8>) -> Vec<MatchCandidate> {
        let map = self.score_map(image);
        candidates_above(&map, self.cfg.threshold, self.plan.width(), self.plan.height())
    }

    /// Deduplicated candidates in scan order; empty when nothing clears the threshold.
    pub fn find_all(&self, image: ImageView<'_, u8>) -> Vec<MatchCandidate> {
        let _span = trace_span!(
            "find_all",
            width = image.width(),
            height = image.height(),
            threshold = self.cfg.threshold
        )
        .entered();

        let raw = self.raw_candidates(image);
        let raw_count = raw.len();
        let kept = dedup_by_radius(raw, self.cfg.dedup_radius);
        trace_event!("match_candidates", raw = raw_count, kept = kept.len());
        kept
    }

    /// Highest-scoring placement clearing the threshold; ties go to the
    /// earliest in scan order.
    ///
    /// Picks from the raw candidates: radius dedup keeps the first of a
    /// cluster, which for periodic templates is not the peak.
    pub fn best(&self, image: ImageView<'_, u8>) -> Option<MatchCandidate> {
        self.raw_candidates(image)
            .into_iter()
            .reduce(|best, c| if c.score > best.score { c } else { best })
    }
}

/// Decodes both sources, converts them to grayscale and returns every
/// deduplicated placement of `template` in `haystack` scoring at least
/// `threshold`, using the default dedup radius.
pub fn find_all(
    haystack: &ImageSource,
    template: &ImageSource,
    threshold: f32,
) -> ScreenSearchResult<Vec<MatchCandidate>> {
    let haystack = haystack.to_gray()?;
    let template = Template::decode("template", template)?;
    let matcher =
        Matcher::new(&template)?.with_config(MatchConfig::default().with_threshold(threshold));
    Ok(matcher.find_all(haystack.view()))
}
