use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which side of the peak a crossing scan was walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSide {
    Start,
    End,
}

impl fmt::Display for ScanSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanSide::Start => f.write_str("start"),
            ScanSide::End => f.write_str("end"),
        }
    }
}

/// Per-trial failures of the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerturbationError {
    #[error("velocity series is empty")]
    EmptySeries,
    #[error("series has {available} samples, baseline window needs {required}")]
    InsufficientData { required: usize, available: usize },
    #[error("no threshold crossing found before the series ends ({side} boundary)")]
    BoundaryNotFound { side: ScanSide },
    #[error("sampling frequency must be positive")]
    InvalidFrequency,
    #[error("baseline window must span at least one second")]
    EmptyBaselineWindow,
    #[error("standard deviation multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),
    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },
    #[error("{reference} reference {value} is not a finite sample index")]
    NonFiniteReference { reference: &'static str, value: f64 },
}

impl PerturbationError {
    /// Short machine-friendly name used in ledgers.
    pub fn kind(&self) -> &'static str {
        match self {
            PerturbationError::EmptySeries => "empty_series",
            PerturbationError::InsufficientData { .. } => "insufficient_data",
            PerturbationError::BoundaryNotFound { .. } => "boundary_not_found",
            PerturbationError::InvalidFrequency => "invalid_frequency",
            PerturbationError::EmptyBaselineWindow => "empty_baseline_window",
            PerturbationError::InvalidMultiplier(_) => "invalid_multiplier",
            PerturbationError::NonFiniteSample { .. } => "non_finite_sample",
            PerturbationError::NonFiniteReference { .. } => "non_finite_reference",
        }
    }
}

pub type Result<T> = std::result::Result<T, PerturbationError>;
