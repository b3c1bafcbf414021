pub mod crossing;
pub mod peak;
