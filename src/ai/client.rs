use crate::ai::traits::{ModelBackend, TextStream};
use crate::ai::types::*;
use crate::config::{Config, DEFAULT_API_BASE};
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::{debug, warn};

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Gemini REST client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            http: Client::new(),
        }
    }

    /// Build a client from config; `None` when no credential is set
    pub fn from_config(config: &Config) -> Option<Self> {
        let Some(api_key) = config.api_key.as_deref() else {
            warn!("GEMINI_API_KEY not set. AI Guide and suitability analysis will not function.");
            return None;
        };
        Some(Self::new(api_key, &config.model).with_base_url(&config.api_base))
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{}:{}", self.base_url, model_path, method)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| MarketError::Transport(format!("Invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn post(&self, url: &str, request: &GenerateContentRequest) -> Result<Response> {
        let response = self
            .http
            .post(url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            warn!(status, "Gemini API error");
            return Err(MarketError::Model { status, message });
        }

        Ok(response)
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn stream_text(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<TextStream> {
        let request = stream_request(prompt, image);
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        debug!(model = %self.model, with_image = image.is_some(), "Gemini stream request");

        let response = self.post(&url, &request).await?;
        Ok(sse_text_stream(Box::pin(response.bytes_stream())).boxed())
    }

    async fn generate_json(&self, prompt: &str, schema: &serde_json::Value) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema.clone(),
            }),
        };

        let url = self.endpoint("generateContent");
        debug!(model = %self.model, "Gemini structured request");

        let response = self.post(&url, &request).await?;
        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| MarketError::SchemaViolation(format!("Unreadable response: {e}")))?;

        if let Some(error) = body.error {
            return Err(MarketError::Model {
                status: error.code,
                message: error.message,
            });
        }

        let text = body.text();
        if text.trim().is_empty() {
            return Err(MarketError::SchemaViolation("Empty response".to_string()));
        }
        Ok(text)
    }
}

/// One user turn: the prompt text, then the image if attached
fn stream_request(prompt: &str, image: Option<&ImageAttachment>) -> GenerateContentRequest {
    let mut parts = vec![Part::text(prompt)];
    if let Some(image) = image {
        parts.push(Part::image(image));
    }
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: None,
    }
}

/// Turn an SSE body into the text of each `GenerateContentResponse` chunk
fn sse_text_stream(body: ByteStream) -> impl Stream<Item = Result<String>> + Send {
    struct State {
        body: ByteStream,
        decoder: SseDecoder,
        pending: VecDeque<String>,
        done: bool,
    }

    let state = State {
        body,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(payload) = state.pending.pop_front() {
                return Some((parse_chunk(&payload), state));
            }
            if state.done {
                return None;
            }
            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let events = state.decoder.push(&bytes);
                    state.pending.extend(events);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(MarketError::from(e)), state));
                }
                None => {
                    state.done = true;
                    let events = state.decoder.finish();
                    state.pending.extend(events);
                }
            }
        }
    })
}

fn parse_chunk(payload: &str) -> Result<String> {
    let chunk: GenerateContentResponse = serde_json::from_str(payload)
        .map_err(|e| MarketError::SchemaViolation(format!("Malformed stream chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(MarketError::Model {
            status: error.code,
            message: error.message,
        });
    }
    Ok(chunk.text())
}

/// Incremental server-sent-events decoder yielding joined `data:` payloads
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.feed_line(line.trim_end_matches(&['\n', '\r'][..]), &mut events);
        }

        events
    }

    /// Flush whatever is left once the body ends
    pub fn finish(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            self.feed_line(line.trim_end_matches(&['\n', '\r'][..]), &mut events);
        }
        self.feed_line("", &mut events);
        events
    }

    fn feed_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            if !self.data.is_empty() {
                events.push(self.data.join("\n"));
                self.data.clear();
            }
            return;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn endpoint_includes_model_path() {
        let client =
            GeminiClient::new("key", "gemini-2.5-flash").with_base_url("http://localhost/v1/");
        assert_eq!(
            client.endpoint("generateContent"),
            "http://localhost/v1/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn stream_request_puts_text_before_image() {
        let image = ImageAttachment::new("image/png", vec![0]);
        let body = serde_json::to_value(stream_request("Is this blight?", Some(&image))).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "Is this blight?"},
                        {"inlineData": {"mimeType": "image/png", "data": "AA=="}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn text_only_request_has_one_part() {
        let body = serde_json::to_value(stream_request("What should I plant?", None)).unwrap();
        assert_eq!(body["contents"].as_array().map(Vec::len), Some(1));
        assert_eq!(
            body["contents"][0]["parts"],
            serde_json::json!([{"text": "What should I plant?"}])
        );
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn from_config_requires_key() {
        assert!(GeminiClient::from_config(&Config::default()).is_none());
    }

    #[test]
    fn decoder_handles_split_events() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: {\"a\":").is_empty());
        let events = decoder.push(b"1}\r\n\r\ndata: {\"b\":2}\r\n\r\n");
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn decoder_flushes_unterminated_event() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b": keep-alive\n\ndata: tail").is_empty());
        assert_eq!(decoder.finish(), vec!["tail"]);
    }

    #[test]
    fn chunk_with_error_is_model_error() {
        let err = parse_chunk(r#"{"error":{"code":503,"message":"overloaded"}}"#).unwrap_err();
        assert!(matches!(err, MarketError::Model { status: 503, .. }));
    }

    #[tokio::test]
    async fn sse_stream_yields_text_per_chunk() {
        let body: Vec<reqwest::Result<_>> = vec![
            Ok(Bytes::from_static(
                b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Plant \"}]}}]}\n\n",
            )),
            Ok(Bytes::from_static(
                b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"beans\"}]}}]}\n\n",
            )),
        ];
        let fragments: Vec<_> = sse_text_stream(Box::pin(stream::iter(body)))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(fragments, vec!["Plant ", "beans"]);
    }
}
