//! Audio output: streams synthesized segments to local files.

mod download;

pub use download::download_audio;
