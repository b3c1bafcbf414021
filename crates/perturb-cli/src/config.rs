use anyhow::{bail, Context, Result};
use perturb_lib::{metrics::baseline::DEFAULT_BASELINE_SECONDS, ExtractionConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FS: u32 = 200;

/// Batch run description as read from a TOML file. Every field may be overridden on
/// the command line.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub ledger: Option<PathBuf>,
    #[serde(default)]
    pub fs: Option<u32>,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub baseline_seconds: Option<u32>,
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// Fully resolved batch settings.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ledger: Option<PathBuf>,
    pub fs: u32,
    pub extraction: ExtractionConfig,
    pub jobs: usize,
}

impl RunConfig {
    /// Read a run file. Relative paths inside it are taken relative to the file itself.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read run config {}", path.display()))?;
        let mut cfg: RunConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing run config {}", path.display()))?;
        if let Some(base) = path.parent() {
            for slot in [&mut cfg.input, &mut cfg.output, &mut cfg.ledger] {
                if let Some(p) = slot.as_mut() {
                    if p.is_relative() {
                        *p = base.join(&*p);
                    }
                }
            }
        }
        Ok(cfg)
    }

    /// Command-line values win over file values.
    pub fn merge(self, overrides: RunConfig) -> RunConfig {
        RunConfig {
            input: overrides.input.or(self.input),
            output: overrides.output.or(self.output),
            ledger: overrides.ledger.or(self.ledger),
            fs: overrides.fs.or(self.fs),
            multiplier: overrides.multiplier.or(self.multiplier),
            baseline_seconds: overrides.baseline_seconds.or(self.baseline_seconds),
            jobs: overrides.jobs.or(self.jobs),
        }
    }

    pub fn resolve(self) -> Result<BatchSettings> {
        let Some(input) = self.input else {
            bail!("no input trial file given (--input or `input` in the run config)");
        };
        let Some(output) = self.output else {
            bail!("no output path given (--out or `output` in the run config)");
        };
        let fs = self.fs.unwrap_or(DEFAULT_FS);
        if fs == 0 {
            bail!("sampling frequency must be positive");
        }
        let extraction = ExtractionConfig {
            multiplier: self.multiplier.unwrap_or(1.0),
            baseline_seconds: self.baseline_seconds.unwrap_or(DEFAULT_BASELINE_SECONDS),
        };
        extraction.validate()?;
        Ok(BatchSettings {
            input,
            output,
            ledger: self.ledger,
            fs,
            extraction,
            jobs: self.jobs.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn cli_overrides_file_values() {
        let file = RunConfig {
            input: Some("a.json".into()),
            output: Some("a.csv".into()),
            fs: Some(100),
            multiplier: Some(2.0),
            ..Default::default()
        };
        let cli = RunConfig {
            fs: Some(250),
            jobs: Some(3),
            ..Default::default()
        };
        let settings = file.merge(cli).resolve().unwrap();
        assert_eq!(settings.fs, 250);
        assert_eq!(settings.jobs, 3);
        assert_eq!(settings.extraction.multiplier, 2.0);
        assert_eq!(settings.input, PathBuf::from("a.json"));
    }

    #[test]
    fn missing_output_is_an_error() {
        let cfg = RunConfig {
            input: Some("a.json".into()),
            ..Default::default()
        };
        assert!(cfg.resolve().is_err());
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let cfg = RunConfig {
            input: Some("a.json".into()),
            output: Some("a.csv".into()),
            multiplier: Some(-0.5),
            ..Default::default()
        };
        assert!(cfg.resolve().is_err());
    }

    #[test]
    fn relative_paths_follow_config_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            "input = \"trials.json\"\noutput = \"/tmp/out.csv\"\nfs = 200\nmultiplier = 1.5\n",
        )
        .unwrap();
        let cfg = RunConfig::load(&path).unwrap();
        assert_eq!(cfg.input, Some(dir.path().join("trials.json")));
        assert_eq!(cfg.output, Some(PathBuf::from("/tmp/out.csv")));
        assert_eq!(cfg.multiplier, Some(1.5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, "frequency = 200\n").unwrap();
        assert!(RunConfig::load(&path).is_err());
    }
}
