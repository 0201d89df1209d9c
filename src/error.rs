//! Error types for configuration, input handling and speech synthesis.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling the runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Replicate API token not found. Add REPLICATE_API_TOKEN to {0} or export it before running")]
    MissingToken(String),

    #[error("Failed to read env file {}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading and preparing the markdown source.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Markdown source file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read markdown source {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No text remained after cleaning the markdown input")]
    EmptyAfterCleaning,

    #[error("Text chunking produced no segments to synthesize")]
    NoChunks,
}

/// Errors raised by the synthesis client, the audio collector and the downloader.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("HTTP {status}: {body}")]
    Http { status: reqwest::StatusCode, body: String },

    #[error("HTTP request failed")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response payload: {0}")]
    MalformedResponse(String),

    /// Carries the API's error message verbatim when it supplied one.
    #[error("{message}")]
    PredictionFailed { id: String, message: String },

    #[error("Prediction {0} succeeded but no output was returned")]
    MissingOutput(String),

    #[error("Prediction {id} did not complete within {attempts} polling attempts")]
    Timeout { id: String, attempts: u32 },

    #[error("No downloadable audio URLs were found in the prediction output")]
    NoAudio,

    #[error("Failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SynthResult<T> = std::result::Result<T, SynthError>;
