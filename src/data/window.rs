use std::fmt;

use crate::error::{AnalysisError, Result};

use super::model::Series;

// ---------------------------------------------------------------------------
// TimeWindow – an inclusive [start, end] range on the time axis
// ---------------------------------------------------------------------------

/// Inclusive time range used to restrict a channel's samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Validate the bounds. A NaN bound fails the same way as `start > end`.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !(start <= end) {
            return Err(AnalysisError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Masking and slicing
// ---------------------------------------------------------------------------

/// One flag per timestamp: `true` when the sample falls inside `window`.
pub fn mask(time: &[f64], window: &TimeWindow) -> Vec<bool> {
    time.iter().map(|&t| window.contains(t)).collect()
}

/// Keep the entries of `data` whose mask flag is set, in their original order.
///
/// A mask shorter than `data` drops the unmatched tail.
pub fn slice(data: &[f64], mask: &[bool]) -> Vec<f64> {
    data.iter()
        .zip(mask)
        .filter(|&(_, &keep)| keep)
        .map(|(&v, _)| v)
        .collect()
}

/// Mask + slice in one step, refusing to hand back an empty selection.
pub fn select(series: &Series, window: &TimeWindow) -> Result<Vec<f64>> {
    let selected = slice(&series.data, &mask(&series.time, window));
    if selected.is_empty() {
        return Err(AnalysisError::EmptyWindow {
            channel: None,
            window: Some(*window),
        });
    }
    Ok(selected)
}
