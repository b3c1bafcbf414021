use crate::batch::TrialOutcome;
use crate::metrics::parameters::ParameterRecord;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::Path;

const IDENTITY_COLUMNS: [&str; 2] = ["trial", "label"];
const LEDGER_COLUMNS: [&str; 5] = ["trial", "label", "status", "error_kind", "error"];

/// One row per successful trial: identity columns, then the record fields in order.
/// An absent relative offset is written as an empty cell.
pub fn write_parameters<W: Write>(writer: W, outcomes: &[TrialOutcome]) -> Result<usize> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    let header: Vec<&str> = IDENTITY_COLUMNS
        .iter()
        .chain(ParameterRecord::FIELDS.iter())
        .copied()
        .collect();
    writer.write_record(&header)?;
    let mut rows = 0;
    for outcome in outcomes {
        let Ok(record) = &outcome.result else {
            continue;
        };
        let mut row = vec![outcome.id.to_string(), outcome.label.clone()];
        row.extend(
            record
                .values()
                .into_iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

pub fn write_parameters_csv(path: &Path, outcomes: &[TrialOutcome]) -> Result<usize> {
    let file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_parameters(file, outcomes).with_context(|| format!("writing {}", path.display()))
}

/// Success/failure line for every trial, in trial order.
pub fn write_ledger<W: Write>(writer: W, outcomes: &[TrialOutcome]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(LEDGER_COLUMNS)?;
    for outcome in outcomes {
        let (status, kind, message) = match &outcome.result {
            Ok(_) => ("ok", String::new(), String::new()),
            Err(err) => ("failed", err.kind().to_string(), err.to_string()),
        };
        writer.write_record([
            outcome.id.to_string(),
            outcome.label.clone(),
            status.to_string(),
            kind,
            message,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ledger_csv(path: &Path, outcomes: &[TrialOutcome]) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_ledger(file, outcomes).with_context(|| format!("writing {}", path.display()))
}
