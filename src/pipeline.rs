//! Per-chunk synthesis loop: submit, collect audio URLs, save each segment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::SynthResult;
use crate::tts::{PredictionApi, Synthesizer, collect_audio_urls};

/// Synthesize every chunk in order and save its audio segments.
///
/// `download` receives each audio URL together with its destination path
/// and returns the number of bytes written.
///
/// # Returns
/// Paths of the written segments, in chunk then segment order.
///
/// # Errors
/// Stops at the first chunk that fails to synthesize, yields no audio or
/// cannot be downloaded. Later chunks are not submitted.
pub fn synthesize_chunks<A, F>(synthesizer: &Synthesizer<A>, chunks: &[String], config: &AppConfig, mut download: F) -> Result<Vec<PathBuf>>
where
    A: PredictionApi,
    F: FnMut(&str, &Path) -> SynthResult<u64>,
{
    let total = chunks.len();
    let mut written = Vec::new();

    for (index, chunk) in (1..).zip(chunks.iter()) {
        info!("[chunk {}/{}] Submitting {} characters to Replicate", index, total, chunk.chars().count());

        let prediction = synthesizer.submit(chunk).with_context(|| format!("Chunk {} failed to synthesize", index))?;
        let urls = collect_audio_urls(&prediction.output_node()).with_context(|| format!("Chunk {} returned no audio", index))?;
        info!("[chunk {}] Received {} audio segment URL(s)", index, urls.len());

        for (segment, url) in (1..).zip(urls.iter()) {
            let dest = config.segment_path(index, segment);
            info!("[download] Saving segment {} for chunk {} to '{}'", segment, index, dest.display());

            let bytes = download(url, &dest).with_context(|| format!("Chunk {} segment {} failed to download", index, segment))?;
            debug!("[download] {} bytes written", bytes);
            written.push(dest);
        }
    }

    Ok(written)
}
