//! Input adapter for nested trial files.
//!
//! The file mirrors the experiment hierarchy
//! `participants → trials → sub_trials → measurements`; every measurement holds one
//! belt velocity recording plus its touchdown and foot-off reference samples:
//!
//! ```json
//! {
//!   "participants": [
//!     { "id": "P01", "trials": [
//!       { "sub_trials": [
//!         { "measurements": [
//!           { "belt_velocity": [[0.0], [0.1]], "referencepoint_td": [640], "referencepoint_fo": 660 }
//!         ] }
//!       ] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Velocity may be a vector or a matrix (MATLAB exports column vectors); it is flattened
//! in row-major order. A missing or `null` foot-off is read as `0`, i.e. absent.

use crate::batch::Trial;
use crate::signal::ReferencePoints;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Scalar or arbitrarily nested array of numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Scalar(f64),
    Array(Vec<Numeric>),
}

impl Numeric {
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        match self {
            Numeric::Scalar(v) => out.push(*v),
            Numeric::Array(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// The single value held by a scalar or a one-element array.
    fn single(&self, what: &str) -> Result<f64> {
        let values = self.flatten();
        match values.as_slice() {
            [v] => Ok(*v),
            [] => bail!("{} is empty", what),
            _ => bail!("{} holds {} values, expected one", what, values.len()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrialFile {
    participants: Vec<ParticipantNode>,
}

#[derive(Debug, Deserialize)]
struct ParticipantNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    trials: Vec<TrialNode>,
}

#[derive(Debug, Deserialize)]
struct TrialNode {
    #[serde(default)]
    sub_trials: Vec<SubTrialNode>,
}

#[derive(Debug, Deserialize)]
struct SubTrialNode {
    #[serde(default)]
    measurements: Vec<MeasurementNode>,
}

#[derive(Debug, Deserialize)]
struct MeasurementNode {
    belt_velocity: Numeric,
    referencepoint_td: Numeric,
    #[serde(default)]
    referencepoint_fo: Option<Numeric>,
}

/// Walk the hierarchy and emit one flat trial per measurement in document order.
pub fn parse_trials(text: &str) -> Result<Vec<Trial>> {
    let file: TrialFile = serde_json::from_str(text).context("parsing trial file")?;
    let mut out = Vec::new();
    for (p_idx, participant) in file.participants.iter().enumerate() {
        let participant_label = participant
            .id
            .clone()
            .unwrap_or_else(|| format!("P{}", p_idx + 1));
        for (t_idx, trial) in participant.trials.iter().enumerate() {
            for (s_idx, sub_trial) in trial.sub_trials.iter().enumerate() {
                for (m_idx, measurement) in sub_trial.measurements.iter().enumerate() {
                    let mut entry = Trial {
                        id: out.len(),
                        participant: participant_label.clone(),
                        trial: t_idx + 1,
                        sub_trial: s_idx + 1,
                        measurement: m_idx + 1,
                        velocity: Vec::new(),
                        references: ReferencePoints::new(0.0, 0.0),
                    };
                    let label = entry.label();
                    let touchdown = measurement
                        .referencepoint_td
                        .single("referencepoint_td")
                        .with_context(|| format!("measurement {}", label))?;
                    let footoff = match &measurement.referencepoint_fo {
                        Some(fo) => fo
                            .single("referencepoint_fo")
                            .with_context(|| format!("measurement {}", label))?,
                        None => 0.0,
                    };
                    entry.velocity = measurement.belt_velocity.flatten();
                    entry.references = ReferencePoints::new(touchdown, footoff);
                    out.push(entry);
                }
            }
        }
    }
    Ok(out)
}

pub fn read_trials(path: &Path) -> Result<Vec<Trial>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_trials(&text).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flattens_hierarchy_in_order() {
        let text = r#"{
            "participants": [
                { "trials": [
                    { "sub_trials": [
                        { "measurements": [
                            { "belt_velocity": [[1.0], [2.0], [3.0]], "referencepoint_td": [[10]], "referencepoint_fo": [[20]] },
                            { "belt_velocity": [4.0, 5.0], "referencepoint_td": 11, "referencepoint_fo": 0 }
                        ] }
                    ] }
                ] },
                { "id": "P07", "trials": [
                    { "sub_trials": [
                        { "measurements": [
                            { "belt_velocity": [[6.0, 7.0], [8.0, 9.0]], "referencepoint_td": 12 }
                        ] }
                    ] }
                ] }
            ]
        }"#;
        let trials = parse_trials(text).unwrap();
        assert_eq!(trials.len(), 3);
        assert_eq!(trials[0].id, 0);
        assert_eq!(trials[0].participant, "P1");
        assert_eq!(
            (trials[0].trial, trials[0].sub_trial, trials[0].measurement),
            (1, 1, 1)
        );
        assert_eq!(trials[0].label(), "P1/T1/S1/M1");
        assert_eq!(trials[0].velocity, vec![1.0, 2.0, 3.0]);
        assert_eq!(trials[0].references, ReferencePoints::new(10.0, 20.0));
        assert_eq!(trials[1].measurement, 2);
        assert_eq!(trials[1].label(), "P1/T1/S1/M2");
        assert_eq!(trials[1].references.footoff, 0.0);
        assert_eq!(trials[2].id, 2);
        assert_eq!(trials[2].participant, "P07");
        assert_eq!(trials[2].measurement, 1);
        assert_eq!(trials[2].label(), "P07/T1/S1/M1");
        assert_eq!(trials[2].velocity, vec![6.0, 7.0, 8.0, 9.0]);
        assert_eq!(trials[2].references.footoff, 0.0);
    }

    #[test]
    fn rejects_ambiguous_reference() {
        let text = r#"{ "participants": [ { "trials": [ { "sub_trials": [ { "measurements": [
            { "belt_velocity": [1.0], "referencepoint_td": [1, 2] }
        ] } ] } ] } ] }"#;
        let err = parse_trials(text).unwrap_err();
        assert!(format!("{:#}", err).contains("expected one"));
    }

    #[test]
    fn reads_fixture_file() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(|p| p.parent())
            .expect("workspace root")
            .join("test_data/trials_small.json");
        let trials = read_trials(&path).expect("read fixture");
        assert_eq!(trials.len(), 3);
        assert!(trials.iter().all(|t| !t.velocity.is_empty()));
        assert_eq!(trials[1].references.footoff, 0.0);
    }
}
