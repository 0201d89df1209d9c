//! Text preparation: markdown cleanup and request-sized chunking.

mod chunker;
mod markdown;
mod source;

pub use chunker::DEFAULT_MAX_CHARS;
pub use source::{load_markdown, prepare_chunks};
