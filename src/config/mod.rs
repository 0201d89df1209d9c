//! Configuration module for md2speech.
//!
//! Provides CLI argument parsing, env-file loading and credential resolution.

#[allow(clippy::module_inception)]
mod config;
mod env_file;

pub use config::{AppConfig, OUTPUT_FORMAT};
pub use env_file::{ApiToken, EnvFile};
