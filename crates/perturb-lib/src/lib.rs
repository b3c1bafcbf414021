pub mod batch;
pub mod detectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod signal;

pub use detectors::*;
pub use error::{PerturbationError, ScanSide};
pub use metrics::*;
pub use pipeline::*;
pub use signal::*;
