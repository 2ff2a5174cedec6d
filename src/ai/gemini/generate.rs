use super::client::GeminiHttpClient;
use super::types::{
    default_safety_settings, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part,
};
use crate::ai::media::{parse_data_url, InlineImage};
use crate::ai::{GenerationService, TextStream};
use crate::models::GenerationRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;

/// Streams Gemini `generateContent` output for text and image requests.
pub struct GeminiGenerationClient {
    http: GeminiHttpClient,
}

impl GeminiGenerationClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    /// Override the API base URL, mainly for pointing tests at a stub.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

/// Build the single user turn: inline image first, text after.
pub(crate) fn build_parts(request: &GenerationRequest) -> Vec<Part> {
    let mut parts = Vec::new();

    if let Some(image) = &request.image {
        let InlineImage { mime_type, data } = parse_data_url(image);
        parts.push(Part::InlineData {
            inline_data: InlineData { mime_type, data },
        });
    }

    if let Some(input) = &request.input {
        parts.push(Part::Text {
            text: input.clone(),
        });
    }

    parts
}

fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: build_parts(request),
        }],
        generation_config: GenerationConfig::default(),
        safety_settings: default_safety_settings(),
    }
}

/// Text of the first candidate's first text part, or empty when absent.
fn extract_text(event: &GenerateContentResponse) -> String {
    event
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| {
            content.parts.iter().find_map(|part| match part {
                Part::Text { text } => Some(text.clone()),
                Part::InlineData { .. } => None,
            })
        })
        .unwrap_or_default()
}

/// Scan a complete `data:` line for a generation event.
fn parse_event_line(line: &str) -> Result<Option<String>> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim_start();
    if payload.is_empty() {
        return Ok(None);
    }

    let event: GenerateContentResponse = serde_json::from_str(payload).map_err(|e| {
        tracing::error!("Failed to parse Gemini stream event: {}\nLine: {}", e, line);
        Error::ai_provider(None, format!("Failed to parse Gemini stream event: {}", e))
    })?;

    Ok(Some(extract_text(&event)))
}

/// Drain complete lines from the buffer until one yields an event.
fn next_event(buffer: &mut String) -> Result<Option<String>> {
    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        if let Some(text) = parse_event_line(line.trim())? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Decode an `alt=sse` response body into a stream of text fragments.
///
/// SSE events arrive as `data: <json>` lines whose boundaries do not align
/// with network chunk boundaries, so bytes are buffered until a full line
/// is available.
fn decode_sse_text(response: reqwest::Response) -> TextStream {
    let state = (response.bytes_stream(), String::new());

    Box::pin(futures::stream::try_unfold(
        state,
        |(mut body, mut buffer)| async move {
            loop {
                if let Some(text) = next_event(&mut buffer)? {
                    return Ok(Some((text, (body, buffer))));
                }

                match body.next().await {
                    Some(chunk) => {
                        let chunk = chunk.map_err(Error::from)?;
                        buffer.push_str(&String::from_utf8_lossy(&chunk));
                    }
                    None => {
                        // A final event may arrive without a trailing newline.
                        let rest = std::mem::take(&mut buffer);
                        let text = parse_event_line(rest.trim())?;
                        return Ok(text.map(|t| (t, (body, buffer))));
                    }
                }
            }
        },
    ))
}

#[async_trait]
impl GenerationService for GeminiGenerationClient {
    async fn stream_generate(&self, request: &GenerationRequest) -> Result<TextStream> {
        tracing::debug!(
            has_input = request.input.is_some(),
            has_image = request.image.is_some(),
            "Opening Gemini generation stream"
        );

        let response = self
            .http
            .stream_generate_content(&build_request(request))
            .await?;

        Ok(decode_sse_text(response))
    }
}
