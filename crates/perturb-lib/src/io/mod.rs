pub mod export;
pub mod text;
pub mod trials;
