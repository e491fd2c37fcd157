//! Template plan precomputation for zero-mean normalized correlation.

use crate::image::ImageView;
use crate::util::{ScreenSearchError, ScreenSearchResult};

/// Precomputed zero-mean buffer and energy for one template.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    mean: f64,
    var_t: f64,
    t_prime: Vec<f64>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// A flat template yields `var_t == 0`; the plan is still valid but
    /// [`TemplatePlan::is_degenerate`] reports it and scans produce no scores.
    pub fn from_view(tpl: ImageView<'_, u8>) -> ScreenSearchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(ScreenSearchError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        for y in 0..height {
            let row = tpl
                .row(y)
                .ok_or(ScreenSearchError::InvalidInput("template row out of bounds"))?;
            sum += row.iter().map(|&v| v as f64).sum::<f64>();
        }
        let mean = sum / count as f64;

        let mut t_prime = Vec::with_capacity(count);
        let mut var_t = 0.0f64;
        for y in 0..height {
            let row = tpl
                .row(y)
                .ok_or(ScreenSearchError::InvalidInput("template row out of bounds"))?;
            for &value in row {
                let centered = value as f64 - mean;
                var_t += centered * centered;
                t_prime.push(centered);
            }
        }

        Ok(Self {
            width,
            height,
            mean,
            var_t,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f64] {
        &self.t_prime
    }

    /// Returns the number of template pixels.
    pub fn len(&self) -> usize {
        self.t_prime.len()
    }

    /// Returns true when the plan covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.t_prime.is_empty()
    }

    /// Returns true when the template has no intensity variation.
    pub fn is_degenerate(&self) -> bool {
        self.var_t <= 1e-8
    }
}
