//! HTTP transport for the Replicate speech and predictions endpoints.

use reqwest::blocking::{Client, Response};
use tracing::debug;

use super::prediction::{Prediction, SpeechRequest};
use crate::config::ApiToken;
use crate::error::{SynthError, SynthResult};

/// Remote operations the synthesizer needs from the prediction service.
pub trait PredictionApi {
    /// Submit a speech synthesis request.
    fn create(&self, request: &SpeechRequest<'_>) -> SynthResult<Prediction>;

    /// Fetch the current state of a prediction.
    fn get(&self, id: &str) -> SynthResult<Prediction>;
}

/// Blocking Replicate API client.
pub struct ReplicateClient {
    http: Client,     // Shared HTTP client (carries the request timeout)
    api_base: String, // API root without trailing slash
    token: ApiToken,  // Bearer credential
}

impl ReplicateClient {
    pub fn new(http: Client, api_base: &str, token: ApiToken) -> Self {
        Self { http, api_base: api_base.trim_end_matches('/').to_string(), token }
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.api_base)
    }

    fn prediction_url(&self, id: &str) -> String {
        format!("{}/predictions/{}", self.api_base, urlencoding::encode(id))
    }
}

impl PredictionApi for ReplicateClient {
    fn create(&self, request: &SpeechRequest<'_>) -> SynthResult<Prediction> {
        let url = self.speech_url();
        debug!("POST {} ({} characters)", url, request.input.text.chars().count());

        let response = self.http.post(&url).bearer_auth(self.token.as_str()).json(request).send()?;
        read_prediction(response)
    }

    fn get(&self, id: &str) -> SynthResult<Prediction> {
        let url = self.prediction_url(id);
        debug!("GET {}", url);

        let response = self.http.get(&url).bearer_auth(self.token.as_str()).send()?;
        read_prediction(response)
    }
}

/// Turn a non-2xx response into [`SynthError::Http`] carrying the response body.
pub fn ensure_success(response: Response) -> SynthResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(SynthError::Http { status, body })
}

fn read_prediction(response: Response) -> SynthResult<Prediction> {
    let body = ensure_success(response)?.text()?;
    serde_json::from_str(&body).map_err(|e| SynthError::MalformedResponse(format!("{}: {}", e, body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvFile;

    fn client(base: &str) -> ReplicateClient {
        let token = ApiToken::resolve(Some("r8_test".to_string()), &EnvFile::default()).unwrap();
        ReplicateClient::new(Client::new(), base, token)
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client("https://api.replicate.com/v1/");
        assert_eq!(client.speech_url(), "https://api.replicate.com/v1/audio/speech");
        assert_eq!(client.prediction_url("abc123"), "https://api.replicate.com/v1/predictions/abc123");
    }

    #[test]
    fn test_prediction_id_is_encoded() {
        let client = client("http://localhost:5000");
        assert_eq!(client.prediction_url("a/b c"), "http://localhost:5000/predictions/a%2Fb%20c");
    }
}
