use crate::error::{PerturbationError, Result};
use serde::{Deserialize, Serialize};

/// Direction of the velocity perturbation, taken from the raw peak sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
    /// The largest absolute sample is exactly zero, i.e. the series is all zeros.
    Zero,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub index: usize,
    pub value: f64,
    pub sign: Sign,
}

/// Locate the sample with the largest absolute value. Ties resolve to the lowest index.
pub fn detect_peak(data: &[f64]) -> Result<Peak> {
    let first = *data.first().ok_or(PerturbationError::EmptySeries)?;
    let mut index = 0;
    let mut best = first.abs();
    for (i, v) in data.iter().enumerate().skip(1) {
        if v.abs() > best {
            best = v.abs();
            index = i;
        }
    }
    let value = data[index];
    Ok(Peak {
        index,
        value,
        sign: Sign::of(value),
    })
}
