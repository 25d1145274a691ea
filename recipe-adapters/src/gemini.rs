//! Google Gemini `generateContent` adapter.

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use hyper::header::RETRY_AFTER;
use hyper::{StatusCode, Uri};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::{HyperClient, RawResponse, build_https_client, post_json};
use crate::traits::{AdapterError, AdapterMetadata, AdapterResult, GenerationAdapter};

/// Environment variable used when loading the API key automatically.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Configuration for the Gemini adapter.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    endpoint: Option<String>,
    timeout: Duration,
    json_response: bool,
}

impl GeminiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com/".to_owned(),
            endpoint: None,
            timeout: Duration::from_secs(60),
            json_response: false,
        }
    }

    /// Loads the API key from the `GEMINI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(GEMINI_API_KEY_ENV).ok();
        cfg
    }

    /// Overrides the base URL used to derive the model endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        let mut base = sanitize_url(base_url.as_ref())?;
        if !base.ends_with('/') {
            base.push('/');
        }
        self.base_url = base;
        Ok(self)
    }

    /// Uses a complete endpoint URL verbatim instead of deriving one from the
    /// base URL, model and key.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> AdapterResult<Self> {
        self.endpoint = Some(sanitize_url(endpoint.as_ref())?);
        Ok(self)
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Asks the provider to constrain its answer to `application/json`.
    #[must_use]
    pub fn with_json_response(mut self, enabled: bool) -> Self {
        self.json_response = enabled;
        self
    }

    fn endpoint(&self) -> AdapterResult<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }
        let key = self.api_key.as_deref().ok_or_else(|| {
            AdapterError::configuration("Gemini adapter requires an API key or a full endpoint")
        })?;
        Ok(format!(
            "{}v1beta/models/{}:generateContent?key={key}",
            self.base_url, self.model
        ))
    }
}

/// Gemini adapter that calls the API over HTTP(S).
pub struct GeminiAdapter {
    client: HyperClient,
    endpoint: Uri,
    metadata: AdapterMetadata,
    timeout: Duration,
    json_response: bool,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("model", &self.metadata.model())
            .field("host", &self.endpoint.host())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if neither an API key nor a full
    /// endpoint is configured, or the resulting endpoint is not a valid URI.
    pub fn new(config: GeminiConfig) -> AdapterResult<Self> {
        let endpoint = config
            .endpoint()?
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))?;

        Ok(Self {
            client: build_https_client(),
            endpoint,
            metadata: AdapterMetadata::new("gemini", config.model),
            timeout: config.timeout,
            json_response: config.json_response,
        })
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: self.json_response.then(|| GenerationConfig {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[async_trait]
impl GenerationAdapter for GeminiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate_content(&self, prompt: &str) -> AdapterResult<Value> {
        if prompt.trim().is_empty() {
            return Err(AdapterError::invalid_request("prompt must not be empty"));
        }

        let payload = self.build_request(prompt);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode Gemini request: {err}"))
        })?;

        debug!(model = self.metadata.model(), bytes = body.len(), "sending Gemini request");
        let response = post_json(&self.client, self.endpoint.clone(), body, self.timeout).await?;
        decode_response(response)
    }
}

fn decode_response(response: RawResponse) -> AdapterResult<Value> {
    let RawResponse {
        status,
        headers,
        body,
    } = response;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(error_message);
        warn!(status = status.as_u16(), message = ?message, "Gemini returned an error status");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = headers
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(AdapterError::RateLimited {
                retry_after,
                message,
            });
        }

        return Err(AdapterError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|err| AdapterError::Response {
        reason: format!("failed to decode Gemini response: {err}"),
    })
}

/// Pulls `error.message` out of a provider error body.
fn error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

fn sanitize_url(input: &str) -> AdapterResult<String> {
    let url = input.trim().to_owned();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "Gemini URL must start with http:// or https://",
        ));
    }
    url.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid Gemini URL: {err}")))?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn base_url_requires_scheme() {
        let err = GeminiConfig::new(DEFAULT_GEMINI_MODEL)
            .with_base_url("generativelanguage.googleapis.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn derived_endpoint_includes_model_and_key() {
        let cfg = GeminiConfig::new("gemini-1.5-pro")
            .with_base_url("https://example.com/gemini")
            .expect("valid URL")
            .with_api_key("secret");
        assert_eq!(
            cfg.endpoint().unwrap(),
            "https://example.com/gemini/v1beta/models/gemini-1.5-pro:generateContent?key=secret"
        );
    }

    #[test]
    fn explicit_endpoint_is_used_verbatim() {
        let cfg = GeminiConfig::new(DEFAULT_GEMINI_MODEL)
            .with_endpoint("https://proxy.local/generate?key=abc")
            .unwrap();
        assert_eq!(cfg.endpoint().unwrap(), "https://proxy.local/generate?key=abc");
    }

    #[test]
    fn adapter_requires_key_or_endpoint() {
        let err = GeminiAdapter::new(GeminiConfig::new(DEFAULT_GEMINI_MODEL))
            .expect_err("no credentials");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn request_envelope_matches_provider_shape() {
        let adapter =
            GeminiAdapter::new(GeminiConfig::new(DEFAULT_GEMINI_MODEL).with_api_key("k")).unwrap();
        let body = serde_json::to_value(adapter.build_request("make soup")).unwrap();
        assert_eq!(body, json!({"contents": [{"parts": [{"text": "make soup"}]}]}));
    }

    #[test]
    fn json_response_adds_generation_config() {
        let adapter = GeminiAdapter::new(
            GeminiConfig::new(DEFAULT_GEMINI_MODEL)
                .with_api_key("k")
                .with_json_response(true),
        )
        .unwrap();
        let body = serde_json::to_value(adapter.build_request("x")).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn error_message_is_extracted_from_body() {
        let body = json!({"error": {"code": 400, "message": "API key not valid"}});
        assert_eq!(error_message(&body).as_deref(), Some("API key not valid"));
        assert_eq!(error_message(&json!({"error": {}})), None);
    }

    /// Serves exactly one canned HTTP response on a loopback port.
    async fn serve_once(status_line: &'static str, extra: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0_u8; 16 * 1024];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                let text = String::from_utf8_lossy(&buf[..read]);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if read >= head_end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\n{extra}content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/v1beta/models/test:generateContent")
    }

    fn adapter_for(endpoint: &str) -> GeminiAdapter {
        GeminiAdapter::new(
            GeminiConfig::new("test")
                .with_endpoint(endpoint)
                .unwrap()
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn returns_envelope_on_success() {
        let envelope = json!({"candidates": [{"content": {"parts": [{"text": "{}"}]}}]});
        let endpoint = serve_once("HTTP/1.1 200 OK", "", envelope.to_string()).await;

        let value = adapter_for(&endpoint).generate_content("soup").await.unwrap();
        assert_eq!(value, envelope);
    }

    #[tokio::test]
    async fn maps_error_status_with_provider_message() {
        let body = json!({"error": {"message": "quota exhausted"}}).to_string();
        let endpoint = serve_once("HTTP/1.1 403 Forbidden", "", body).await;

        let err = adapter_for(&endpoint)
            .generate_content("soup")
            .await
            .expect_err("403");
        assert!(matches!(err, AdapterError::Status { status: 403, .. }));
        assert_eq!(err.provider_message(), Some("quota exhausted"));
    }

    #[tokio::test]
    async fn maps_too_many_requests_to_rate_limited() {
        let endpoint =
            serve_once("HTTP/1.1 429 Too Many Requests", "retry-after: 7\r\n", "{}".into()).await;

        let err = adapter_for(&endpoint)
            .generate_content("soup")
            .await
            .expect_err("429");
        match err {
            AdapterError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_response_error() {
        let endpoint = serve_once("HTTP/1.1 200 OK", "", "<html>".into()).await;

        let err = adapter_for(&endpoint)
            .generate_content("soup")
            .await
            .expect_err("html body");
        assert!(matches!(err, AdapterError::Response { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = adapter_for(&format!("http://{addr}/generate"))
            .generate_content("soup")
            .await
            .expect_err("nothing listening");
        assert!(matches!(err, AdapterError::Transport { .. }));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_sending() {
        let err = adapter_for("http://127.0.0.1:9/unused")
            .generate_content("  ")
            .await
            .expect_err("empty prompt");
        assert!(matches!(err, AdapterError::InvalidRequest { .. }));
    }
}
