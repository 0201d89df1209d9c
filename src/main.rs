//! md2speech - Convert a markdown document into speech audio files.
//!
//! The document is cleaned of markdown markup, split into request-sized
//! chunks and sent to the Replicate text-to-speech API one chunk at a time.
//! Each finished prediction's audio is downloaded as
//! `output_segment_{chunk}_{segment}.wav`.

mod audio;
mod config;
mod error;
mod pipeline;
mod text;
mod tts;

use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use audio::download_audio;
use config::{ApiToken, AppConfig, EnvFile};
use tts::{ReplicateClient, Synthesizer};

/// Initialize logging: progress on stdout, warnings and errors on stderr.
fn init_logging(verbose: bool) {
    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();
}

/// Print chunk boundaries without calling the API.
fn print_chunks(chunks: &[String]) {
    for (index, chunk) in chunks.iter().enumerate() {
        println!("[chunk {}/{}] ({} chars) {}", index + 1, chunks.len(), chunk.chars().count(), chunk);
    }
}

/// Run the whole pipeline: configuration, text preparation, synthesis and download.
fn run(config: &AppConfig) -> Result<()> {
    config.log_config();

    let env_file = EnvFile::load(&config.env_file_path())?;
    let token = if config.dry_run { None } else { Some(ApiToken::from_env(&env_file)?) };

    let raw = text::load_markdown(&config.input_path())?;
    let chunks = text::prepare_chunks(&raw, config.max_chars)?;

    let Some(token) = token else {
        print_chunks(&chunks);
        return Ok(());
    };

    std::fs::create_dir_all(&config.output_dir).with_context(|| format!("Failed to create output directory {}", config.output_dir.display()))?;

    let http = Client::builder()
        .timeout(config.request_timeout())
        .user_agent(concat!("md2speech/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;
    let synthesizer = Synthesizer::new(ReplicateClient::new(http.clone(), &config.api_base, token), config);

    let started = Instant::now();
    let written = pipeline::synthesize_chunks(&synthesizer, &chunks, config, |url, dest| download_audio(&http, url, dest, config.download_timeout()))?;

    info!("✅ All {} chunk(s) processed successfully, {} file(s) written in {:.1}s", chunks.len(), written.len(), started.elapsed().as_secs_f32());
    Ok(())
}

fn main() {
    // Parse command line arguments
    let config = AppConfig::from_args();
    init_logging(config.verbose);

    info!("🗣️  md2speech v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
