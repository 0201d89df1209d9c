//! Speech synthesis request lifecycle: submit, then poll until terminal.

use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::client::PredictionApi;
use super::prediction::{Prediction, PredictionStatus, SpeechInput, SpeechRequest};
use crate::config::{AppConfig, OUTPUT_FORMAT};
use crate::error::{SynthError, SynthResult};

/// Fixed-interval polling with a hard attempt ceiling.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Model and voice parameters sent with every request.
#[derive(Debug, Clone)]
pub struct VoiceSettings {
    pub model: String,
    pub voice: String,
    pub sample_rate: u32,
}

/// Text-to-speech synthesizer backed by a remote prediction service.
pub struct Synthesizer<A: PredictionApi> {
    api: A,               // Prediction transport
    voice: VoiceSettings, // Model, voice and sample rate
    poll: PollPolicy,     // Status polling policy
}

impl<A: PredictionApi> Synthesizer<A> {
    /// Create a synthesizer from the application configuration.
    pub fn new(api: A, config: &AppConfig) -> Self {
        let voice = VoiceSettings { model: config.model.clone(), voice: config.voice.clone(), sample_rate: config.sample_rate };
        let poll = PollPolicy { interval: config.poll_interval(), max_attempts: config.max_poll_attempts };
        Self::with_settings(api, voice, poll)
    }

    pub fn with_settings(api: A, voice: VoiceSettings, poll: PollPolicy) -> Self {
        Self { api, voice, poll }
    }

    /// Submit one chunk and wait for its prediction to finish.
    ///
    /// Anything other than a finished result is resolved by polling the
    /// returned id, so a failure reported at submit time surfaces from the
    /// first status check.
    ///
    /// # Returns
    /// A succeeded prediction with non-empty output.
    ///
    /// # Errors
    /// Returns an error if the request fails, the response has neither a
    /// finished result nor an id, the prediction fails or polling times out.
    pub fn submit(&self, text: &str) -> SynthResult<Prediction> {
        let request = SpeechRequest {
            model: &self.voice.model,
            input: SpeechInput { text, voice: &self.voice.voice, format: OUTPUT_FORMAT, sample_rate: self.voice.sample_rate },
        };

        let prediction = self.api.create(&request)?;
        let status = prediction.status.clone().ok_or_else(|| SynthError::MalformedResponse("response payload missing 'status'".to_string()))?;

        if status == PredictionStatus::Succeeded && prediction.has_output() {
            debug!("Prediction finished synchronously");
            return Ok(prediction);
        }
        let Some(id) = prediction.id() else {
            let raw = serde_json::to_string(&prediction).unwrap_or_default();
            return Err(SynthError::MalformedResponse(format!("prediction did not succeed immediately and no id was returned: {}", raw)));
        };

        info!("[prediction] Submitted chunk. Prediction id={}. Polling for completion...", id);
        self.poll(id)
    }

    /// Poll a queued prediction until it succeeds, fails or the attempt ceiling is reached.
    ///
    /// # Errors
    /// Returns [`SynthError::PredictionFailed`] on failure or cancellation,
    /// [`SynthError::MissingOutput`] if it succeeds without output and
    /// [`SynthError::Timeout`] when attempts run out.
    pub fn poll(&self, id: &str) -> SynthResult<Prediction> {
        let max_attempts = self.poll.max_attempts;

        for attempt in 1..=max_attempts {
            let prediction = self.api.get(id)?;
            let label = prediction.status.as_ref().map_or("unknown", PredictionStatus::as_str);
            info!("[poll] Attempt {}/{}: prediction {} status={}", attempt, max_attempts, id, label);

            match &prediction.status {
                Some(PredictionStatus::Succeeded) if prediction.has_output() => return Ok(prediction),
                Some(PredictionStatus::Succeeded) => return Err(SynthError::MissingOutput(id.to_string())),
                Some(status) if status.is_failure() => return Err(failure(&prediction, id, status)),
                _ => {}
            }

            if attempt < max_attempts {
                thread::sleep(self.poll.interval);
            }
        }

        Err(SynthError::Timeout { id: id.to_string(), attempts: max_attempts })
    }
}

fn failure(prediction: &Prediction, id: &str, status: &PredictionStatus) -> SynthError {
    let message = prediction.error_message().unwrap_or_else(|| format!("Prediction {} ended with status '{}'", id, status));
    SynthError::PredictionFailed { id: id.to_string(), message }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use serde_json::{Value, json};

    use super::*;

    /// Replays canned responses instead of calling the network.
    struct ScriptedApi {
        created: Prediction,
        polls: RefCell<VecDeque<Prediction>>,
        poll_count: Cell<u32>,
        submitted: RefCell<Option<Value>>,
    }

    impl ScriptedApi {
        fn new(created: Value, polls: Vec<Value>) -> Self {
            Self {
                created: serde_json::from_value(created).unwrap(),
                polls: RefCell::new(polls.into_iter().map(|p| serde_json::from_value(p).unwrap()).collect()),
                poll_count: Cell::new(0),
                submitted: RefCell::new(None),
            }
        }
    }

    impl PredictionApi for ScriptedApi {
        fn create(&self, request: &SpeechRequest<'_>) -> SynthResult<Prediction> {
            *self.submitted.borrow_mut() = Some(serde_json::to_value(request).unwrap());
            Ok(self.created.clone())
        }

        fn get(&self, id: &str) -> SynthResult<Prediction> {
            assert_eq!(id, "p1");
            self.poll_count.set(self.poll_count.get() + 1);
            // Once the script runs out, the job stays in progress
            Ok(self.polls.borrow_mut().pop_front().unwrap_or_else(|| serde_json::from_value(json!({ "id": "p1", "status": "processing" })).unwrap()))
        }
    }

    fn synthesizer(api: ScriptedApi) -> Synthesizer<ScriptedApi> {
        let voice = VoiceSettings { model: "meta/voice-se".to_string(), voice: "trustworthy_man".to_string(), sample_rate: 44100 };
        Synthesizer::with_settings(api, voice, PollPolicy { interval: Duration::ZERO, max_attempts: 60 })
    }

    #[test]
    fn test_synchronous_success_skips_polling() {
        let api = ScriptedApi::new(json!({ "status": "succeeded", "output": "http://a.wav" }), vec![]);
        let synth = synthesizer(api);
        let prediction = synth.submit("Hello there.").unwrap();
        assert_eq!(prediction.output, Some(json!("http://a.wav")));
        assert_eq!(synth.api.poll_count.get(), 0);

        let body = synth.api.submitted.borrow().clone().unwrap();
        assert_eq!(body["model"], "meta/voice-se");
        assert_eq!(body["input"]["text"], "Hello there.");
        assert_eq!(body["input"]["format"], "wav");
        assert_eq!(body["input"]["sample_rate"], 44100);
    }

    #[test]
    fn test_polls_until_succeeded() {
        let api = ScriptedApi::new(
            json!({ "id": "p1", "status": "starting" }),
            vec![
                json!({ "id": "p1", "status": "starting" }),
                json!({ "id": "p1", "status": "processing" }),
                json!({ "id": "p1", "status": "succeeded", "output": ["http://a.wav"] }),
            ],
        );
        let synth = synthesizer(api);
        let prediction = synth.submit("Hello.").unwrap();
        assert_eq!(prediction.output, Some(json!(["http://a.wav"])));
        assert_eq!(synth.api.poll_count.get(), 3);
    }

    #[test]
    fn test_failed_prediction_carries_message_verbatim() {
        let api = ScriptedApi::new(json!({ "id": "p1", "status": "starting" }), vec![json!({ "id": "p1", "status": "failed", "error": "bad input" })]);
        let err = synthesizer(api).submit("Hello.").unwrap_err();
        assert!(matches!(&err, SynthError::PredictionFailed { message, .. } if message == "bad input"));
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn test_failure_at_submit_is_confirmed_by_polling() {
        let api = ScriptedApi::new(
            json!({ "id": "p1", "status": "failed", "error": "bad input" }),
            vec![json!({ "id": "p1", "status": "failed", "error": "bad input" })],
        );
        let synth = synthesizer(api);
        let err = synth.submit("Hello.").unwrap_err();
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(synth.api.poll_count.get(), 1);
    }

    #[test]
    fn test_failure_at_submit_without_id_is_malformed() {
        let api = ScriptedApi::new(json!({ "status": "failed", "error": "bad input" }), vec![]);
        let synth = synthesizer(api);
        let err = synth.submit("Hello.").unwrap_err();
        assert!(matches!(&err, SynthError::MalformedResponse(msg) if msg.contains("no id") && msg.contains("bad input")));
        assert_eq!(synth.api.poll_count.get(), 0);
    }

    #[test]
    fn test_canceled_without_message() {
        let api = ScriptedApi::new(json!({ "id": "p1", "status": "processing" }), vec![json!({ "id": "p1", "status": "canceled" })]);
        let err = synthesizer(api).submit("Hello.").unwrap_err();
        assert_eq!(err.to_string(), "Prediction p1 ended with status 'canceled'");
    }

    #[test]
    fn test_succeeded_without_output() {
        let api = ScriptedApi::new(json!({ "id": "p1", "status": "starting" }), vec![json!({ "id": "p1", "status": "succeeded", "output": [] })]);
        let err = synthesizer(api).submit("Hello.").unwrap_err();
        assert!(matches!(err, SynthError::MissingOutput(id) if id == "p1"));
    }

    #[test]
    fn test_timeout_names_prediction() {
        let api = ScriptedApi::new(json!({ "id": "p1", "status": "starting" }), vec![]);
        let synth = synthesizer(api);
        let err = synth.submit("Hello.").unwrap_err();
        assert!(matches!(&err, SynthError::Timeout { id, attempts: 60 } if id == "p1"));
        assert!(err.to_string().contains("p1"));
        assert_eq!(synth.api.poll_count.get(), 60);
    }

    #[test]
    fn test_missing_status_is_malformed() {
        let api = ScriptedApi::new(json!({ "id": "p1" }), vec![]);
        assert!(matches!(synthesizer(api).submit("Hello."), Err(SynthError::MalformedResponse(_))));
    }

    #[test]
    fn test_no_id_and_no_result_is_malformed() {
        let api = ScriptedApi::new(json!({ "status": "starting" }), vec![]);
        let err = synthesizer(api).submit("Hello.").unwrap_err();
        assert!(matches!(&err, SynthError::MalformedResponse(msg) if msg.contains("no id")));
    }
}
