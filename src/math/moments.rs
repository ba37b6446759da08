//! Descriptive statistics over finite samples
//!
//! Non-finite values are treated as missing and skipped, so a `NaN`
//! produced upstream never poisons the mean or the spread of the rest.

use crate::io::error::{AnalysisError, Result, computation_error};

/// First two moments of the finite values in a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Number of finite values
    pub count: usize,
    /// Arithmetic mean, `None` when the sample has no finite value
    pub mean: Option<f64>,
    /// Sample standard deviation (divisor `n - 1`), `None` below two values
    pub std_dev: Option<f64>,
}

impl Moments {
    /// Compute mean and sample standard deviation over the finite values
    pub fn of_finite(values: &[f64]) -> Self {
        let finite = || values.iter().copied().filter(|v| v.is_finite());

        let count = finite().count();
        if count == 0 {
            return Self {
                count,
                mean: None,
                std_dev: None,
            };
        }

        let n = count as f64;
        let mean = finite().sum::<f64>() / n;
        let std_dev = (count > 1).then(|| {
            let sum_sq = finite().map(|v| (v - mean).powi(2)).sum::<f64>();
            (sum_sq / (n - 1.0)).sqrt()
        });

        Self {
            count,
            mean: Some(mean),
            std_dev,
        }
    }

    /// Mean and standard deviation when both exist and the spread is nonzero
    ///
    /// # Errors
    ///
    /// Returns `DegenerateVariance` if fewer than two finite values exist or
    /// all finite values are equal
    pub fn nondegenerate(&self) -> Result<(f64, f64)> {
        match (self.mean, self.std_dev) {
            (Some(mean), Some(sd)) if sd > 0.0 && sd.is_finite() => Ok((mean, sd)),
            (_, std_dev) => Err(AnalysisError::DegenerateVariance {
                finite_scores: self.count,
                std_dev,
            }),
        }
    }

    /// Z-score of a single value against these moments
    ///
    /// # Errors
    ///
    /// Returns `DegenerateVariance` under the same conditions as [`Self::nondegenerate`]
    pub fn zscore(&self, value: f64) -> Result<f64> {
        let (mean, sd) = self.nondegenerate()?;
        Ok((value - mean) / sd)
    }
}

/// Z-score every value using the sample standard deviation
///
/// Non-finite inputs stay non-finite in the output.
///
/// # Errors
///
/// Returns `DegenerateVariance` if the values have no spread
pub fn standardize(values: &[f64]) -> Result<Vec<f64>> {
    let (mean, sd) = Moments::of_finite(values).nondegenerate()?;
    Ok(values.iter().map(|v| (v - mean) / sd).collect())
}

/// Divide every value by the column total
///
/// # Errors
///
/// Returns a computation error if the total is zero or not finite
pub fn shares(values: &[f64]) -> Result<Vec<f64>> {
    let total = values.iter().sum::<f64>();
    if total == 0.0 || !total.is_finite() {
        return Err(computation_error(
            "shares",
            &format!("column total is {total}"),
        ));
    }
    Ok(values.iter().map(|v| v / total).collect())
}

