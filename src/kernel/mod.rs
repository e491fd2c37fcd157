//! Correlation kernels producing dense score surfaces.

use crate::template::TemplatePlan;
use crate::ImageView;

/// Dense score surface with one entry per valid top-left placement.
///
/// Placements whose image window has no variance hold `f32::NEG_INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMap {
    width: usize,
    height: usize,
    scores: Vec<f32>,
}

impl ScoreMap {
    /// Surface for a template that does not fit the image.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            scores: Vec::new(),
        }
    }

    pub(crate) fn from_scores(width: usize, height: usize, scores: Vec<f32>) -> Self {
        debug_assert_eq!(scores.len(), width * height);
        Self {
            width,
            height,
            scores,
        }
    }

    /// Number of placement columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of placement rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when no placement exists.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Highest finite score on the surface.
    pub fn max_score(&self) -> Option<f32> {
        self.scores
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .max_by(f32::total_cmp)
    }

    /// Placements with `score >= threshold`, in row-major scan order.
    pub fn above(&self, threshold: f32) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let width = self.width.max(1);
        self.scores
            .iter()
            .enumerate()
            .filter_map(move |(idx, &score)| {
                (score >= threshold).then_some((idx % width, idx / width, score))
            })
    }
}

/// Kernel trait for scoring and surface evaluation.
pub trait Kernel {
    /// Computes the score at a single placement (top-left coordinates).
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> f32;

    /// Computes the full surface over every valid placement.
    fn surface(image: ImageView<'_, u8>, plan: &TemplatePlan, min_var_i: f64) -> ScoreMap;
}

/// Placement range `(cols, rows)` or `None` when the template does not fit.
pub(crate) fn placement_dims(image: ImageView<'_, u8>, plan: &TemplatePlan) -> Option<(usize, usize)> {
    let cols = image.width().checked_sub(plan.width())? + 1;
    let rows = image.height().checked_sub(plan.height())? + 1;
    Some((cols, rows))
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
