//! Markdown-to-plain-text cleanup for speech input.

use std::sync::LazyLock;

use regex::Regex;

static BACKTICKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`+").expect("valid regex"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s*").expect("valid regex"));
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[-*]\s+").expect("valid regex"));
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\)\s*").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip markdown markers and collapse the text onto a single line.
///
/// Removes backtick runs, then heading, bullet and `N)` list markers at the
/// start of any line, then collapses whitespace and trims. Markers exposed by
/// a previous pass (for example `- # Title`) are stripped as well, so the
/// result is stable under repeated cleaning.
///
/// Returns an empty string when nothing speakable remains.
pub fn clean_markdown(raw: &str) -> String {
    let mut cleaned = clean_once(raw);
    loop {
        let next = clean_once(&cleaned);
        if next == cleaned {
            return cleaned;
        }
        cleaned = next;
    }
}

fn clean_once(text: &str) -> String {
    let text = BACKTICKS.replace_all(text, "");
    let text = HEADING.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    let text = NUMBERED.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
