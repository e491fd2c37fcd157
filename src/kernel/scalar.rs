//! Scalar reference kernel for zero-mean normalized cross-correlation.

use crate::kernel::{placement_dims, Kernel, ScoreMap};
use crate::template::TemplatePlan;
use crate::ImageView;

/// Scalar ZNCC kernel (TM_CCOEFF_NORMED semantics).
pub struct ZnccScalar;

/// Scores one placement; callers guarantee the window fits.
pub(crate) fn zncc_window(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
    min_var_i: f64,
) -> f32 {
    let tpl_width = plan.width();
    let tpl_height = plan.height();
    let t_prime = plan.t_prime();
    let n = plan.len() as f64;

    let mut dot = 0.0f64;
    let mut sum_i = 0.0f64;
    let mut sum_i2 = 0.0f64;
    for ty in 0..tpl_height {
        let Some(img_row) = image.row(y + ty) else {
            return f32::NEG_INFINITY;
        };
        let base = ty * tpl_width;
        for (tx, &pixel) in img_row[x..x + tpl_width].iter().enumerate() {
            let value = pixel as f64;
            dot += t_prime[base + tx] * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i <= min_var_i {
        return f32::NEG_INFINITY;
    }

    let score = dot / (plan.var_t() * var_i).sqrt();
    if score.is_finite() {
        score.clamp(-1.0, 1.0) as f32
    } else {
        f32::NEG_INFINITY
    }
}

impl Kernel for ZnccScalar {
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> f32 {
        let Some((cols, rows)) = placement_dims(image, plan) else {
            return f32::NEG_INFINITY;
        };
        if x >= cols || y >= rows || plan.is_degenerate() {
            return f32::NEG_INFINITY;
        }
        zncc_window(image, plan, x, y, min_var_i)
    }

    fn surface(image: ImageView<'_, u8>, plan: &TemplatePlan, min_var_i: f64) -> ScoreMap {
        let Some((cols, rows)) = placement_dims(image, plan) else {
            return ScoreMap::empty();
        };
        if plan.is_degenerate() {
            return ScoreMap::from_scores(cols, rows, vec![f32::NEG_INFINITY; cols * rows]);
        }

        let mut scores = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                scores.push(zncc_window(image, plan, x, y, min_var_i));
            }
        }
        ScoreMap::from_scores(cols, rows, scores)
    }
}
