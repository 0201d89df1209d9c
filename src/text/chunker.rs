//! Sentence-aware text chunking under a per-request character budget.
//!
//! Lengths are counted in characters (Unicode scalar values), not bytes.

use std::sync::LazyLock;

use regex::Regex;

/// Default maximum characters per synthesis request.
pub const DEFAULT_MAX_CHARS: usize = 280;

/// Sentence terminator followed by whitespace. The terminator stays with its sentence.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Split text into chunks of at most `max_chars` characters.
///
/// Sentences are packed greedily, joined by a single space. A sentence longer
/// than the budget flushes the pending chunk and is word-wrapped on its own;
/// a single word longer than the budget is emitted as an over-budget chunk
/// rather than broken.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let len = char_len(sentence);

        if len > max_chars {
            flush(&mut chunks, &mut current, &mut current_len);
            chunks.extend(split_long_sentence(sentence, max_chars));
            continue;
        }

        if !current.is_empty() && current_len + 1 + len > max_chars {
            flush(&mut chunks, &mut current, &mut current_len);
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(sentence);
        current_len += len;
    }

    flush(&mut chunks, &mut current, &mut current_len);
    chunks
}

/// Split text after `.`, `!` or `?` followed by whitespace, dropping empty sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        // Terminators are ASCII, so the sentence ends one byte after the match start
        push_trimmed(&mut sentences, &text[start..m.start() + 1]);
        start = m.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, sentence: &'a str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    *current_len = 0;
}

/// Word-wrap an oversized sentence; fall back to the raw sentence if wrapping yields nothing.
fn split_long_sentence(sentence: &str, max_chars: usize) -> Vec<String> {
    let wrapped = wrap_words(sentence, max_chars);
    if wrapped.is_empty() { vec![sentence.to_string()] } else { wrapped }
}

/// Greedy word wrap on whitespace. Words (hyphenated ones included) are never broken.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = char_len(word);
        if !line.is_empty() && line_len + 1 + word_len > width {
            flush(&mut lines, &mut line, &mut line_len);
        }
        if !line.is_empty() {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(word);
        line_len += word_len;
    }

    flush(&mut lines, &mut line, &mut line_len);
    lines
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
