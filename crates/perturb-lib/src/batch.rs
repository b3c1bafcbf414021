use crate::{
    error::PerturbationError,
    metrics::parameters::ParameterRecord,
    pipeline::{extract_parameters, ExtractionConfig},
    signal::{ReferencePoints, TimeSeries},
};
use crossbeam_channel::unbounded;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One trial handed over by an input adapter.
///
/// `trial`, `sub_trial` and `measurement` are one-based positions inside their parent
/// node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Position in the input, zero-based.
    pub id: usize,
    pub participant: String,
    pub trial: usize,
    pub sub_trial: usize,
    pub measurement: usize,
    pub velocity: Vec<f64>,
    pub references: ReferencePoints,
}

impl Trial {
    /// Display identity, e.g. `P01/T2/S1/M1`.
    pub fn label(&self) -> String {
        format!(
            "{}/T{}/S{}/M{}",
            self.participant, self.trial, self.sub_trial, self.measurement
        )
    }
}

#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub id: usize,
    pub label: String,
    pub result: Result<ParameterRecord, PerturbationError>,
}

impl TrialOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failure counts keyed by error kind.
    pub failures: BTreeMap<String, usize>,
    /// Successful trials without a relative offset (foot-off missing or equal to
    /// touchdown).
    pub relative_offset_unavailable: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[TrialOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match &outcome.result {
                Ok(record) => {
                    summary.succeeded += 1;
                    if record.perturbation_offset_relative.is_none() {
                        summary.relative_offset_unavailable += 1;
                    }
                }
                Err(err) => {
                    summary.failed += 1;
                    *summary.failures.entry(err.kind().to_string()).or_default() += 1;
                }
            }
        }
        summary
    }
}

pub fn process_trial(trial: Trial, fs: u32, cfg: &ExtractionConfig) -> TrialOutcome {
    let label = trial.label();
    let ts = TimeSeries::new(fs, trial.velocity);
    let result = extract_parameters(&ts, &trial.references, cfg);
    match &result {
        Ok(_) => debug!("trial {} ({}) done", trial.id, label),
        Err(err) => warn!("trial {} ({}) failed: {}", trial.id, label, err),
    }
    TrialOutcome {
        id: trial.id,
        label,
        result,
    }
}

/// Number of workers used when the caller asks for `0`.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Process every trial on `jobs` worker threads. Outcomes come back in input order and a
/// failing trial never stops the others.
pub fn run_batch(
    trials: Vec<Trial>,
    fs: u32,
    cfg: &ExtractionConfig,
    jobs: usize,
) -> Vec<TrialOutcome> {
    let total = trials.len();
    let requested = if jobs == 0 { default_jobs() } else { jobs };
    let workers = requested.min(total).max(1);
    info!("processing {} trial(s) on {} worker(s)", total, workers);

    let (job_tx, job_rx) = unbounded::<(usize, Trial)>();
    let (done_tx, done_rx) = unbounded::<(usize, TrialOutcome)>();
    for job in trials.into_iter().enumerate() {
        if job_tx.send(job).is_err() {
            break;
        }
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                for (slot, trial) in job_rx.iter() {
                    if done_tx.send((slot, process_trial(trial, fs, cfg))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    let mut slots: Vec<Option<TrialOutcome>> = vec![None; total];
    for (slot, outcome) in done_rx.iter() {
        slots[slot] = Some(outcome);
    }
    let outcomes: Vec<TrialOutcome> = slots.into_iter().flatten().collect();
    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        "batch finished: {} ok, {} failed",
        summary.succeeded, summary.failed
    );
    outcomes
}
