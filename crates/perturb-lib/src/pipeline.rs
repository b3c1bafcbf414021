use crate::{
    detectors::{
        crossing::{find_boundaries, threshold, PerturbationEvent},
        peak::detect_peak,
    },
    error::{PerturbationError, Result},
    metrics::{
        baseline::{baseline_stats, BaselineStats, DEFAULT_BASELINE_SECONDS},
        distance::perturbation_distance,
        parameters::{assemble_parameters, ParameterRecord},
    },
    signal::{ReferencePoints, TimeSeries},
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Run parameters shared by every trial of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Standard-deviation multiplier for the crossing threshold.
    pub multiplier: f64,
    /// Length of the leading quiescent window (seconds).
    pub baseline_seconds: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            baseline_seconds: DEFAULT_BASELINE_SECONDS,
        }
    }
}

impl ExtractionConfig {
    pub fn with_multiplier(multiplier: f64) -> Self {
        Self {
            multiplier,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(PerturbationError::InvalidMultiplier(self.multiplier));
        }
        if self.baseline_seconds == 0 {
            return Err(PerturbationError::EmptyBaselineWindow);
        }
        Ok(())
    }
}

/// Every intermediate quantity of a single-trial extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerturbationAnalysis {
    pub fs: u32,
    pub sample_count: usize,
    pub baseline: BaselineStats,
    pub threshold: f64,
    pub peak_value: f64,
    pub event: PerturbationEvent,
    pub parameters: ParameterRecord,
}

/// Baseline → peak → threshold → boundaries → distance → record.
pub fn analyze_trial(
    ts: &TimeSeries,
    references: &ReferencePoints,
    cfg: &ExtractionConfig,
) -> Result<PerturbationAnalysis> {
    cfg.validate()?;
    ts.validate()?;
    references.validate()?;
    if ts.is_empty() {
        return Err(PerturbationError::EmptySeries);
    }
    debug!(
        "analyzing {} samples ({:.2} s at {} Hz)",
        ts.len(),
        ts.duration(),
        ts.fs
    );

    let baseline = baseline_stats(ts, cfg.baseline_seconds)?;
    debug!(
        "baseline over {} samples: mean={:.6} std={:.6}",
        baseline.window, baseline.mean, baseline.std
    );
    let peak = detect_peak(&ts.data)?;
    let level = threshold(&baseline, peak.sign, cfg.multiplier);
    debug!(
        "peak {:.6} at sample {} ({:?}), threshold {:.6}",
        peak.value, peak.index, peak.sign, level
    );
    let event = find_boundaries(&ts.data, &peak, level)?;
    debug!(
        "perturbation spans samples {}..={} ({} samples)",
        event.start_index,
        event.end_index,
        event.span()
    );
    let distance = perturbation_distance(&ts.data, &event, &baseline, ts.fs);
    let parameters =
        assemble_parameters(&baseline, &event, peak.value, references, distance, ts.fs);

    Ok(PerturbationAnalysis {
        fs: ts.fs,
        sample_count: ts.len(),
        baseline,
        threshold: level,
        peak_value: peak.value,
        event,
        parameters,
    })
}

/// Same as [`analyze_trial`] but only returns the parameter record.
pub fn extract_parameters(
    ts: &TimeSeries,
    references: &ReferencePoints,
    cfg: &ExtractionConfig,
) -> Result<ParameterRecord> {
    analyze_trial(ts, references, cfg).map(|analysis| analysis.parameters)
}
