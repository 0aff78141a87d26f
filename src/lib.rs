//! distro_releases Library
//!
//! Discovers Debian and Ubuntu releases from the recursive directory
//! listings of public mirrors, classifies them and exports per-architecture
//! release tables for image-build automation.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
