use crate::{detectors::crossing::PerturbationEvent, metrics::baseline::BaselineStats};

/// Trapezoidal rule with unit spacing. Fewer than two samples integrate to zero.
pub fn trapezoid(values: &[f64]) -> f64 {
    values
        .windows(2)
        .map(|w| 0.5 * (w[0] + w[1]))
        .sum::<f64>()
}

/// Belt distance covered by the perturbation relative to the baseline velocity.
///
/// Integrates `v[i] - mean` over `[start, end]` and divides by `fs` to go from
/// velocity·samples to velocity·seconds. The sign of the deviation is kept.
pub fn perturbation_distance(
    data: &[f64],
    event: &PerturbationEvent,
    baseline: &BaselineStats,
    fs: u32,
) -> f64 {
    let deviation: Vec<f64> = data[event.start_index..=event.end_index]
        .iter()
        .map(|v| v - baseline.mean)
        .collect();
    trapezoid(&deviation) / fs as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::peak::Sign;

    fn event(start: usize, peak: usize, end: usize) -> PerturbationEvent {
        PerturbationEvent {
            start_index: start,
            peak_index: peak,
            end_index: end,
            sign: Sign::Positive,
        }
    }

    fn baseline(mean: f64) -> BaselineStats {
        BaselineStats {
            mean,
            std: 0.0,
            window: 1,
        }
    }

    #[test]
    fn trapezoid_of_triangle_is_exact() {
        assert_eq!(trapezoid(&[0.0, 1.0, 2.0, 1.0, 0.0]), 4.0);
        assert_eq!(trapezoid(&[3.0]), 0.0);
        assert_eq!(trapezoid(&[]), 0.0);
    }

    #[test]
    fn constant_baseline_window_has_no_distance() {
        let data = [1.25; 20];
        let d = perturbation_distance(&data, &event(2, 5, 15), &baseline(1.25), 200);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn single_sample_window_is_zero() {
        let data = [0.0, 4.0, 0.0];
        assert_eq!(
            perturbation_distance(&data, &event(1, 1, 1), &baseline(0.0), 100),
            0.0
        );
    }

    #[test]
    fn scales_by_frequency_and_keeps_sign() {
        let data = [1.0, 0.0, -2.0, 0.0, 1.0];
        // deviation from 1.0: [0, -1, -3, -1, 0] -> trapz = -5
        let d = perturbation_distance(&data, &event(0, 2, 4), &baseline(1.0), 10);
        assert!((d + 0.5).abs() < 1e-12);
    }
}
