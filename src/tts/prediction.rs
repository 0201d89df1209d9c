//! Replicate prediction and speech request payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::output::OutputNode;

/// Lifecycle state reported by the API. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl PredictionStatus {
    /// Whether the job has stopped without producing audio.
    pub fn is_failure(&self) -> bool {
        matches!(self, PredictionStatus::Failed | PredictionStatus::Canceled)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
            PredictionStatus::Other(label) => label,
        }
    }
}

impl From<String> for PredictionStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "starting" => PredictionStatus::Starting,
            "processing" => PredictionStatus::Processing,
            "succeeded" => PredictionStatus::Succeeded,
            "failed" => PredictionStatus::Failed,
            "canceled" => PredictionStatus::Canceled,
            _ => PredictionStatus::Other(label),
        }
    }
}

impl From<PredictionStatus> for String {
    fn from(status: PredictionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesis job as returned by the speech and predictions endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: Option<String>,
    pub status: Option<PredictionStatus>,
    pub output: Option<Value>,
    pub error: Option<Value>,
}

impl Prediction {
    /// Whether the output carries anything (null, empty strings and empty containers do not).
    pub fn has_output(&self) -> bool {
        self.output.as_ref().is_some_and(is_truthy)
    }

    /// The API's error message, if it reported one.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            Value::String(_) | Value::Null => None,
            other if is_truthy(other) => Some(other.to_string()),
            _ => None,
        }
    }

    /// Prediction id, if the job was queued.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Output payload as a variant tree for URL extraction.
    pub fn output_node(&self) -> OutputNode {
        self.output.as_ref().map(OutputNode::from).unwrap_or(OutputNode::Null)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Body of a speech synthesis request.
#[derive(Debug, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub input: SpeechInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct SpeechInput<'a> {
    pub text: &'a str,
    pub voice: &'a str,
    pub format: &'a str,
    pub sample_rate: u32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_queued_prediction() {
        let prediction: Prediction = serde_json::from_value(json!({
            "id": "abc123",
            "status": "starting",
            "output": null,
            "logs": ""
        }))
        .unwrap();
        assert_eq!(prediction.id(), Some("abc123"));
        assert_eq!(prediction.status, Some(PredictionStatus::Starting));
        assert!(!prediction.has_output());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let prediction: Prediction = serde_json::from_value(json!({ "status": "booting" })).unwrap();
        assert_eq!(prediction.status, Some(PredictionStatus::Other("booting".to_string())));
        assert_eq!(prediction.status.unwrap().to_string(), "booting");
    }

    #[test]
    fn test_output_truthiness() {
        let with = |output: Value| Prediction { output: Some(output), ..Default::default() }.has_output();
        assert!(with(json!("https://example.com/a.wav")));
        assert!(with(json!(["https://example.com/a.wav"])));
        assert!(!with(json!("")));
        assert!(!with(json!([])));
        assert!(!with(json!({})));
        assert!(!with(Value::Null));
    }

    #[test]
    fn test_error_message() {
        let with = |error: Value| Prediction { error: Some(error), ..Default::default() }.error_message();
        assert_eq!(with(json!("bad input")), Some("bad input".to_string()));
        assert_eq!(with(json!("")), None);
        assert_eq!(with(json!({ "detail": "quota" })), Some(r#"{"detail":"quota"}"#.to_string()));
    }

    #[test]
    fn test_request_shape() {
        let request = SpeechRequest {
            model: "meta/voice-se",
            input: SpeechInput { text: "Hello.", voice: "trustworthy_man", format: "wav", sample_rate: 44100 },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "meta/voice-se",
                "input": { "text": "Hello.", "voice": "trustworthy_man", "format": "wav", "sample_rate": 44100 }
            })
        );
    }
}
