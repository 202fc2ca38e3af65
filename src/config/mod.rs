//! Configuration management for dirmarker
//!
//! Settings live in ~/.dirmarker/config.toml. Every value has a default, so
//! the file is optional.

pub mod settings;

// Re-export commonly used items
pub use settings::{MarkerSettings, ScanSettings, Settings};
