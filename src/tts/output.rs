//! Audio URL extraction from prediction output payloads.
//!
//! Models return audio as a bare URL, a list of URLs, or objects carrying
//! `audio`/`url` fields, nested arbitrarily. The payload is first converted
//! into an [`OutputNode`] tree and then walked per variant.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{SynthError, SynthResult};

/// Keys checked, in order, for a URL string inside a mapping.
const URL_KEYS: [&str; 2] = ["audio", "url"];

/// Shape of a prediction output payload.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputNode {
    Null,
    Text(String),
    /// Entries in payload order.
    Mapping(Vec<(String, OutputNode)>),
    Sequence(Vec<OutputNode>),
}

impl OutputNode {
    fn get(&self, key: &str) -> Option<&OutputNode> {
        match self {
            OutputNode::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<&Value> for OutputNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => OutputNode::Text(s.clone()),
            Value::Array(items) => OutputNode::Sequence(items.iter().map(OutputNode::from).collect()),
            Value::Object(map) => OutputNode::Mapping(map.iter().map(|(k, v)| (k.clone(), OutputNode::from(v))).collect()),
            // Numbers and booleans never carry audio
            Value::Null | Value::Bool(_) | Value::Number(_) => OutputNode::Null,
        }
    }
}

/// Collect audio URLs from an output tree, deduplicated in first-seen order.
///
/// # Errors
/// Returns [`SynthError::NoAudio`] if nothing was found.
pub fn collect_audio_urls(output: &OutputNode) -> SynthResult<Vec<String>> {
    let mut collector = UrlCollector::default();
    collector.visit(output);

    if collector.urls.is_empty() {
        return Err(SynthError::NoAudio);
    }
    Ok(collector.urls)
}

#[derive(Default)]
struct UrlCollector {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl UrlCollector {
    fn visit(&mut self, node: &OutputNode) {
        match node {
            OutputNode::Null => {}
            OutputNode::Text(candidate) => self.push(candidate),
            OutputNode::Mapping(entries) => {
                for key in URL_KEYS {
                    if let Some(OutputNode::Text(candidate)) = node.get(key) {
                        self.push(candidate);
                    }
                }
                // Nested mappings are only reached through sequences
                for (_, value) in entries {
                    if let OutputNode::Sequence(_) = value {
                        self.visit(value);
                    }
                }
            }
            OutputNode::Sequence(items) => {
                for item in items {
                    self.visit(item);
                }
            }
        }
    }

    fn push(&mut self, candidate: &str) {
        let candidate = candidate.trim();
        if !candidate.is_empty() && self.seen.insert(candidate.to_string()) {
            self.urls.push(candidate.to_string());
        }
    }
}
