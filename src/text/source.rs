//! Loading the markdown source and turning it into request-sized chunks.

use std::io;
use std::path::Path;

use tracing::info;

use super::chunker::chunk_text;
use super::markdown::clean_markdown;
use crate::error::InputError;

/// Read the markdown document at `path`.
///
/// # Errors
/// Returns [`InputError::NotFound`] for a missing file, [`InputError::Read`] otherwise.
pub fn load_markdown(path: &Path) -> Result<String, InputError> {
    info!("[config] Using synthesis source at {}", path.display());
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Read { path: path.to_path_buf(), source },
    })
}

/// Clean raw markdown and split it into chunks of at most `max_chars` characters.
///
/// # Errors
/// Returns an error if nothing remains after cleaning or chunking.
pub fn prepare_chunks(raw: &str, max_chars: usize) -> Result<Vec<String>, InputError> {
    let cleaned = clean_markdown(raw);
    if cleaned.is_empty() {
        return Err(InputError::EmptyAfterCleaning);
    }

    let chunks = chunk_text(&cleaned, max_chars);
    if chunks.is_empty() {
        return Err(InputError::NoChunks);
    }

    info!("Prepared {} text chunk(s) for synthesis", chunks.len());
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("for_synthesis.md");
        assert!(matches!(load_markdown(&path), Err(InputError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.md");
        std::fs::write(&path, "# Talk\n\nHello.").unwrap();
        assert_eq!(load_markdown(&path).unwrap(), "# Talk\n\nHello.");
    }

    #[test]
    fn test_prepare_chunks() {
        let chunks = prepare_chunks("# Hello **world**. This is a *test*!", 280).unwrap();
        assert_eq!(chunks, vec!["Hello **world**. This is a *test*!"]);
    }

    #[test]
    fn test_markup_only_document_is_rejected() {
        assert!(matches!(prepare_chunks("###\n- \n``````", 280), Err(InputError::EmptyAfterCleaning)));
        assert!(matches!(prepare_chunks("", 280), Err(InputError::EmptyAfterCleaning)));
    }
}
