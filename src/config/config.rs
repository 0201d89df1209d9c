//! Application configuration and CLI argument parsing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::text::DEFAULT_MAX_CHARS;

/// Default markdown source, relative to the project root.
pub const DEFAULT_INPUT: &str = "public/private/for_synthesis.md";

/// Audio container requested from the speech endpoint.
pub const OUTPUT_FORMAT: &str = "wav";

/// Markdown-to-speech configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "md2speech")]
#[command(author, version, about = "Convert a markdown document into speech audio files", long_about = None)]
pub struct AppConfig {
    /// Markdown document to synthesize (relative paths resolve against --project-root)
    #[arg(long, short = 'i', default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Base directory for relative input and env-file paths
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Optional KEY=VALUE file holding REPLICATE_API_TOKEN
    #[arg(long, default_value = ".env.local")]
    pub env_file: PathBuf,

    /// Directory where output_segment_*.wav files are written
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum characters per synthesis request
    #[arg(long, default_value_t = DEFAULT_MAX_CHARS, value_parser = parse_positive::<usize>)]
    pub max_chars: usize,

    /// Speech model identifier
    #[arg(long, short = 'm', default_value = "meta/voice-se")]
    pub model: String,

    /// Voice name passed to the model
    #[arg(long, default_value = "trustworthy_man")]
    pub voice: String,

    /// Requested output sample rate in Hz
    #[arg(long, default_value = "44100", value_parser = parse_positive::<u32>)]
    pub sample_rate: u32,

    /// Replicate API root URL
    #[arg(long, env = "REPLICATE_API_BASE", default_value = "https://api.replicate.com/v1")]
    pub api_base: String,

    /// Delay in milliseconds between prediction status checks
    #[arg(long, default_value = "2000")]
    pub poll_interval_ms: u64,

    /// Maximum number of prediction status checks before giving up
    #[arg(long, default_value = "60", value_parser = parse_positive::<u32>)]
    pub max_poll_attempts: u32,

    /// Timeout in seconds for submit and status requests
    #[arg(long, default_value = "30", value_parser = parse_positive::<u64>)]
    pub request_timeout_secs: u64,

    /// Timeout in seconds for each audio download
    #[arg(long, default_value = "120", value_parser = parse_positive::<u64>)]
    pub download_timeout_secs: u64,

    /// Print the chunks that would be synthesized and exit without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Resolved path of the markdown source.
    pub fn input_path(&self) -> PathBuf {
        resolve_against(&self.project_root, &self.input)
    }

    /// Resolved path of the env file.
    pub fn env_file_path(&self) -> PathBuf {
        resolve_against(&self.project_root, &self.env_file)
    }

    /// Output path for one audio segment (both indices 1-based).
    pub fn segment_path(&self, chunk: usize, segment: usize) -> PathBuf {
        self.output_dir.join(format!("output_segment_{chunk}_{segment}.{OUTPUT_FORMAT}"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Input: {}", self.input_path().display());
        info!("  Output directory: {}", self.output_dir.display());
        info!("  Max chars per chunk: {}", self.max_chars);
        info!("  Model: {}", self.model);
        info!("  Voice: {} ({} Hz {})", self.voice, self.sample_rate, OUTPUT_FORMAT);
        info!("  API base: {}", self.api_base);
        info!("  Polling: every {}ms, up to {} attempts", self.poll_interval_ms, self.max_poll_attempts);
    }
}

/// Join `path` onto `root` unless it is already absolute.
fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { root.join(path) }
}

/// Parse a strictly positive integer.
fn parse_positive<T>(s: &str) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display,
{
    let value: T = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if value > T::default() { Ok(value) } else { Err(format!("value must be greater than 0, got {}", value)) }
}
