//! Streaming download of synthesized audio segments.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{SynthError, SynthResult};
use crate::tts::ensure_success;

/// Size of each read/write increment when streaming a body to disk.
pub const DOWNLOAD_BLOCK_SIZE: usize = 8192;

/// Download `url` to `dest`, replacing any existing file.
///
/// # Returns
/// Number of bytes written.
///
/// # Errors
/// Returns an error if the request fails, the server answers with an error
/// status, or the file cannot be written.
pub fn download_audio(client: &Client, url: &str, dest: &Path, timeout: Duration) -> SynthResult<u64> {
    debug!("GET {}", url);
    let response = ensure_success(client.get(url).timeout(timeout).send()?)?;
    save_stream(response, dest)
}

/// Write a byte stream to `dest` in fixed-size blocks.
pub fn save_stream<R: Read>(mut reader: R, dest: &Path) -> SynthResult<u64> {
    let io_error = |source| SynthError::Io { path: dest.to_path_buf(), source };

    let mut file = File::create(dest).map_err(io_error)?;
    let written = copy_in_blocks(&mut reader, &mut file).map_err(io_error)?;
    file.flush().map_err(io_error)?;

    debug!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}

fn copy_in_blocks<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = [0u8; DOWNLOAD_BLOCK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }
}
