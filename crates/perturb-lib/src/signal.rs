use crate::error::{PerturbationError, Result};
use serde::{Deserialize, Serialize};

/// Uniformly sampled belt velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Sampling frequency in samples per second
    pub fs: u32,
    /// Samples
    pub data: Vec<f64>,
}

impl TimeSeries {
    pub fn new(fs: u32, data: Vec<f64>) -> Self {
        Self { fs, data }
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Recording length in seconds.
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.fs as f64
    }

    /// Reject inputs the numeric stages cannot handle: zero frequency and NaN/inf samples.
    pub fn validate(&self) -> Result<()> {
        if self.fs == 0 {
            return Err(PerturbationError::InvalidFrequency);
        }
        if let Some(index) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(PerturbationError::NonFiniteSample { index });
        }
        Ok(())
    }
}

/// Gait-event reference sample indices for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoints {
    pub touchdown: f64,
    /// `0.0` marks a missing foot-off event.
    pub footoff: f64,
}

impl ReferencePoints {
    pub fn new(touchdown: f64, footoff: f64) -> Self {
        Self { touchdown, footoff }
    }

    /// Both references must be finite sample indices.
    pub fn validate(&self) -> Result<()> {
        for (reference, value) in [("touchdown", self.touchdown), ("footoff", self.footoff)] {
            if !value.is_finite() {
                return Err(PerturbationError::NonFiniteReference { reference, value });
            }
        }
        Ok(())
    }

    /// Touchdown-to-foot-off interval in samples, `None` when foot-off is absent.
    pub fn stance_samples(&self) -> Option<f64> {
        if self.footoff == 0.0 {
            return None;
        }
        let span = self.footoff - self.touchdown;
        if span == 0.0 || !span.is_finite() {
            return None;
        }
        Some(span)
    }
}
