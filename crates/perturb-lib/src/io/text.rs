use anyhow::{Context, Result};
use std::path::Path;

/// Velocity samples, one per line. Blank lines and `#` comments are skipped.
pub fn parse_velocity_samples(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample: f64 = trimmed
            .parse()
            .with_context(|| format!("line {}: {:?} is not a velocity sample", idx + 1, trimmed))?;
        out.push(sample);
    }
    if out.is_empty() {
        anyhow::bail!("no velocity samples found");
    }
    Ok(out)
}

/// Read a newline-delimited belt velocity recording from disk.
pub fn read_velocity_samples(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_velocity_samples(&text).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let samples = parse_velocity_samples("# header\n0.5\n\n -1.25 \n3\n").unwrap();
        assert_eq!(samples, vec![0.5, -1.25, 3.0]);
    }

    #[test]
    fn reports_offending_line() {
        let err = parse_velocity_samples("1.0\nabc\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = parse_velocity_samples("# nothing here\n").unwrap_err();
        assert_eq!(err.to_string(), "no velocity samples found");
    }
}
