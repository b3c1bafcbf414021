use crate::{
    detectors::crossing::PerturbationEvent, metrics::baseline::BaselineStats,
    signal::ReferencePoints,
};
use serde::{Deserialize, Serialize};

/// Perturbation parameters of one trial. Times are in seconds, velocities in the
/// units of the input series and distance in velocity·seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub baseline_velocity: f64,
    pub perturbation_velocity: f64,
    /// Perturbation start relative to touchdown.
    pub perturbation_offset: f64,
    /// Offset as a fraction of the touchdown-to-foot-off interval; `None` when foot-off is missing.
    pub perturbation_offset_relative: Option<f64>,
    pub acceleration1_duration: f64,
    pub acceleration2_duration: f64,
    pub perturbation_duration: f64,
    pub velocity_amplitude: f64,
    pub perturbation_distance: f64,
}

impl ParameterRecord {
    /// Column names in field order.
    pub const FIELDS: [&'static str; 9] = [
        "baseline_velocity",
        "perturbation_velocity",
        "perturbation_offset",
        "perturbation_offset_relative",
        "acceleration1_duration",
        "acceleration2_duration",
        "perturbation_duration",
        "velocity_amplitude",
        "perturbation_distance",
    ];

    /// Field values in column order, the relative offset left as `None` when absent.
    pub fn values(&self) -> [Option<f64>; 9] {
        [
            Some(self.baseline_velocity),
            Some(self.perturbation_velocity),
            Some(self.perturbation_offset),
            self.perturbation_offset_relative,
            Some(self.acceleration1_duration),
            Some(self.acceleration2_duration),
            Some(self.perturbation_duration),
            Some(self.velocity_amplitude),
            Some(self.perturbation_distance),
        ]
    }
}

pub fn assemble_parameters(
    baseline: &BaselineStats,
    event: &PerturbationEvent,
    peak_value: f64,
    references: &ReferencePoints,
    distance: f64,
    fs: u32,
) -> ParameterRecord {
    let fs = fs as f64;
    let start = event.start_index as f64;
    let peak = event.peak_index as f64;
    let end = event.end_index as f64;

    let offset = (start - references.touchdown) / fs;
    let relative = references
        .stance_samples()
        .map(|stance| offset / (stance / fs));

    ParameterRecord {
        baseline_velocity: baseline.mean,
        perturbation_velocity: peak_value,
        perturbation_offset: offset,
        perturbation_offset_relative: relative,
        acceleration1_duration: (peak - start) / fs,
        acceleration2_duration: (end - peak) / fs,
        perturbation_duration: (end - start) / fs,
        velocity_amplitude: (baseline.mean - peak_value).abs(),
        perturbation_distance: distance,
    }
}
