//! Rayon-parallel surface evaluation (feature-gated).
//!
//! Rows are computed in parallel and collected in order, so the surface is
//! identical to the scalar one and row-major scan order is preserved.

use crate::kernel::scalar::zncc_window;
use crate::kernel::{placement_dims, Kernel, ScoreMap};
use crate::template::TemplatePlan;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel ZNCC kernel.
pub struct ZnccRayon;

impl Kernel for ZnccRayon {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> f32 {
        <crate::kernel::scalar::ZnccScalar as Kernel>::score_at(image, plan, x, y, min_var_i)
    }

    fn surface(image: ImageView<'_, u8>, plan: &TemplatePlan, min_var_i: f64) -> ScoreMap {
        let Some((cols, rows)) = placement_dims(image, plan) else {
            return ScoreMap::empty();
        };
        if plan.is_degenerate() {
            return ScoreMap::from_scores(cols, rows, vec![f32::NEG_INFINITY; cols * rows]);
        }

        let row_scores: Vec<Vec<f32>> = (0..rows)
            .into_par_iter()
            .map(|y| {
                (0..cols)
                    .map(|x| zncc_window(image, plan, x, y, min_var_i))
                    .collect()
            })
            .collect();

        ScoreMap::from_scores(cols, rows, row_scores.concat())
    }
}
