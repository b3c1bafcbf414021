pub mod baseline;
pub mod distance;
pub mod parameters;
