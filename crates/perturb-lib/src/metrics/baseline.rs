use crate::error::{PerturbationError, Result};
use crate::signal::TimeSeries;
use serde::{Deserialize, Serialize};

/// Seconds of quiescent belt motion assumed at the start of every trial.
pub const DEFAULT_BASELINE_SECONDS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    pub mean: f64,
    /// Population standard deviation (divisor = window length).
    pub std: f64,
    /// Number of samples the statistics were taken over.
    pub window: usize,
}

/// Number of leading samples covered by a baseline of `seconds` at `fs`.
pub fn baseline_window(fs: u32, seconds: u32) -> usize {
    fs as usize * seconds as usize
}

/// Mean and population std of the first `seconds * fs` samples.
pub fn baseline_stats(ts: &TimeSeries, seconds: u32) -> Result<BaselineStats> {
    let window = baseline_window(ts.fs, seconds);
    if window == 0 {
        return Err(PerturbationError::EmptyBaselineWindow);
    }
    if ts.len() < window {
        return Err(PerturbationError::InsufficientData {
            required: window,
            available: ts.len(),
        });
    }
    let data = &ts.data[..window];
    let mean = data.iter().sum::<f64>() / window as f64;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window as f64;
    Ok(BaselineStats {
        mean,
        std: var.sqrt(),
        window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_std_over_window() {
        // 2 s at fs=2: [1, 3, 1, 3] -> mean 2, pop. std 1
        let ts = TimeSeries::new(2, vec![1.0, 3.0, 1.0, 3.0, 100.0]);
        let stats = baseline_stats(&ts, 2).unwrap();
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert!((stats.std - 1.0).abs() < 1e-12);
        assert_eq!(stats.window, 4);
    }

    #[test]
    fn ignores_samples_after_window() {
        let mut a = vec![0.5, -0.5, 0.25, 0.0, 0.1, -0.1];
        let mut b = a.clone();
        a.extend([9.0, 9.0, 9.0]);
        b.extend([-40.0, 3.0]);
        let sa = baseline_stats(&TimeSeries::new(2, a), 3).unwrap();
        let sb = baseline_stats(&TimeSeries::new(2, b), 3).unwrap();
        assert_eq!(sa, sb);
    }

    #[test]
    fn short_series_is_insufficient() {
        let ts = TimeSeries::new(200, vec![0.0; 599]);
        assert_eq!(
            baseline_stats(&ts, DEFAULT_BASELINE_SECONDS),
            Err(PerturbationError::InsufficientData {
                required: 600,
                available: 599
            })
        );
    }

    #[test]
    fn exact_window_length_is_enough() {
        let ts = TimeSeries::new(200, vec![1.5; 600]);
        let stats = baseline_stats(&ts, DEFAULT_BASELINE_SECONDS).unwrap();
        assert!((stats.mean - 1.5).abs() < 1e-12);
        assert!(stats.std.abs() < 1e-12);
    }
}
