//! Rolling "typical variation" band around a weekly series.
//!
//! ```text
//! window_i = x[max(0, i - W + 1) ..= i]
//! mean_i   = avg(window_i)
//! std_i    = sample std of window_i, 0 when |window_i| < 2
//! upper_i  = max(mean_i + std_i, x_i)
//! lower_i  = min(mean_i - std_i, x_i)
//! ```

use serde::Serialize;
use std::num::NonZeroUsize;

/// Rolling window size, in weeks.
pub const ROLLING_WINDOW_WEEKS: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(window) => window,
    None => panic!("rolling window must be non-zero"),
};

/// Band values at one position of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub mean: f64,
    /// Sample standard deviation, already zeroed for single-sample windows.
    pub std: f64,
    pub upper: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct BoundsCalculator {
    window: NonZeroUsize,
}

impl Default for BoundsCalculator {
    fn default() -> Self {
        Self {
            window: ROLLING_WINDOW_WEEKS,
        }
    }
}

impl BoundsCalculator {
    pub fn new(window: NonZeroUsize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window.get()
    }

    /// Computes one band per value using a trailing window that shrinks at
    /// the start of the series.
    pub fn compute(&self, values: &[f64]) -> Vec<Band> {
        let window = self.window.get();
        values
            .iter()
            .enumerate()
            .map(|(i, &actual)| {
                let from = (i + 1).saturating_sub(window);
                let (mean, std) = window_stats(&values[from..=i]);
                Band {
                    mean,
                    std,
                    upper: (mean + std).max(actual),
                    lower: (mean - std).min(actual),
                }
            })
            .collect()
    }
}

/// Mean and sample std of a window; std is 0 for a single sample.
///
/// Values are divided by the window's largest magnitude first, so sums and
/// squares cannot overflow for any finite input.
fn window_stats(values: &[f64]) -> (f64, f64) {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|v| v / scale).sum::<f64>() / n;
    let std = if values.len() < 2 {
        0.0
    } else {
        let sum_sq: f64 = values.iter().map(|v| (v / scale - mean).powi(2)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    };
    (mean * scale, std * scale)
}
