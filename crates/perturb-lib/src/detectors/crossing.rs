use crate::{
    detectors::peak::{Peak, Sign},
    error::{PerturbationError, Result, ScanSide},
    metrics::baseline::BaselineStats,
};
use serde::{Deserialize, Serialize};

/// Boundaries of a single perturbation. `start_index <= peak_index <= end_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerturbationEvent {
    pub start_index: usize,
    pub peak_index: usize,
    pub end_index: usize,
    pub sign: Sign,
}

impl PerturbationEvent {
    /// Samples covered by the event, both boundaries included.
    pub fn span(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Crossing level on the baseline side of the perturbation.
///
/// Positive peaks sit above `mean + multiplier * std`; negative and zero peaks use the
/// level below the mean.
pub fn threshold(baseline: &BaselineStats, sign: Sign, multiplier: f64) -> f64 {
    match sign {
        Sign::Positive => baseline.mean + multiplier * baseline.std,
        Sign::Negative | Sign::Zero => baseline.mean - multiplier * baseline.std,
    }
}

fn returned_to_baseline(value: f64, sign: Sign, threshold: f64) -> bool {
    match sign {
        Sign::Positive => value <= threshold,
        Sign::Negative => value >= threshold,
        Sign::Zero => false,
    }
}

/// Walk outward from the peak (peak sample included) until the signal is back on the
/// baseline side of `threshold`. Fails if either walk runs off the series.
pub fn find_boundaries(data: &[f64], peak: &Peak, threshold: f64) -> Result<PerturbationEvent> {
    if peak.index >= data.len() {
        return Err(PerturbationError::BoundaryNotFound {
            side: ScanSide::Start,
        });
    }
    let start_index = (0..=peak.index)
        .rev()
        .find(|&i| returned_to_baseline(data[i], peak.sign, threshold))
        .ok_or(PerturbationError::BoundaryNotFound {
            side: ScanSide::Start,
        })?;
    let end_index = (peak.index..data.len())
        .find(|&i| returned_to_baseline(data[i], peak.sign, threshold))
        .ok_or(PerturbationError::BoundaryNotFound { side: ScanSide::End })?;
    Ok(PerturbationEvent {
        start_index,
        peak_index: peak.index,
        end_index,
        sign: peak.sign,
    })
}
