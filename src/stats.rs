//! Windowed statistics: mean / standard deviation of a slice and the ratio
//! of two means with first-order propagated uncertainty.
//!
//! Nothing here rounds. Results keep full `f64` precision; display
//! formatting lives with the presentation code.

use crate::error::{AnalysisError, Operand, Result};

/// Mean and spread of one selection of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticResult {
    pub mean: f64,
    /// Population standard deviation (divisor `n`).
    pub stddev: f64,
    pub sample_count: usize,
}

/// Quotient of two independent means and its propagated uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioResult {
    pub ratio: f64,
    pub ratio_error: f64,
    pub numerator: StatisticResult,
    pub denominator: StatisticResult,
}

/// Arithmetic mean and population standard deviation of `samples`.
///
/// Fails with [`AnalysisError::EmptyWindow`] on an empty slice instead of
/// producing NaN.
pub fn describe(samples: &[f64]) -> Result<StatisticResult> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptyWindow {
            channel: None,
            window: None,
        });
    }
    // Welford's running mean: no intermediate sum, so samples near f64::MAX
    // stay finite.
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (k, &v) in samples.iter().enumerate() {
        let delta = v - mean;
        mean += delta / (k + 1) as f64;
        m2 += delta * (v - mean);
    }

    Ok(StatisticResult {
        mean,
        stddev: (m2 / samples.len() as f64).sqrt(),
        sample_count: samples.len(),
    })
}

/// `a.mean / b.mean` with uncertainty
/// `ratio * sqrt((a.stddev / a.mean)^2 + (b.stddev / b.mean)^2)`.
///
/// Assumes the two channels are uncorrelated. Either mean being exactly zero
/// is reported as [`AnalysisError::DivideByZero`].
pub fn ratio(a: &StatisticResult, b: &StatisticResult) -> Result<RatioResult> {
    if a.mean == 0.0 {
        return Err(AnalysisError::DivideByZero {
            operand: Operand::Numerator,
            channel: None,
        });
    }
    if b.mean == 0.0 {
        return Err(AnalysisError::DivideByZero {
            operand: Operand::Denominator,
            channel: None,
        });
    }

    let ratio = a.mean / b.mean;
    let rel_a = a.stddev / a.mean;
    let rel_b = b.stddev / b.mean;
    let ratio_error = ratio * (rel_a.powi(2) + rel_b.powi(2)).sqrt();

    Ok(RatioResult {
        ratio,
        ratio_error,
        numerator: *a,
        denominator: *b,
    })
}
