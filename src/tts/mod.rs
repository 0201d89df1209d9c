//! Text-to-speech module backed by the Replicate API.
//!
//! Submits text chunks as predictions, polls them to completion and extracts
//! the resulting audio URLs.

mod client;
mod output;
mod prediction;
mod synthesizer;

pub use client::{PredictionApi, ReplicateClient, ensure_success};
pub use output::collect_audio_urls;
#[cfg(test)]
pub use prediction::{Prediction, SpeechRequest};
pub use synthesizer::Synthesizer;
