//! Streaming proxy endpoint.
//!
//! `POST /api/generate` takes `{ input?, image? }`, opens a retried Gemini
//! stream, and re-emits the model's text output as a chunked `text/plain`
//! body. Provider failures before the first byte map to a JSON error body;
//! failures after streaming has started truncate the body.

use crate::ai::GenerationService;
use crate::models::{ErrorBody, GenerationRequest};
use crate::retry::RetryPolicy;
use crate::Error;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please wait a moment and try again.";
const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<dyn GenerationService>,
    pub retry: RetryPolicy,
}

/// Returns the [`Router`] of this application.
pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let uri: String = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route("/api/generate", post(generate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    // Structural JSON parsing only; absent fields are optional.
    let request: GenerationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!("Unparseable request body: {}", err);
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                None,
            );
        }
    };

    let generation = Arc::clone(&state.generation);
    let stream = state
        .retry
        .run(
            || generation.stream_generate(&request),
            Error::is_rate_limited,
        )
        .await;

    let stream = match stream {
        Ok(stream) => stream,
        Err(err) => return error_response(&err),
    };

    // A mid-stream upstream failure ends the body without an error frame;
    // the caller sees a truncated response.
    let body = Body::from_stream(stream.scan((), |_, item| {
        let mapped = match item {
            Ok(text) => Some(Ok::<Bytes, Infallible>(Bytes::from(text))),
            Err(err) => {
                tracing::error!("Generation stream failed mid-response: {}", err);
                None
            }
        };
        futures::future::ready(mapped)
    }));

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

fn error_response(err: &Error) -> Response {
    tracing::error!("Generation request failed: {}", err);

    if err.is_rate_limited() {
        return json_error(
            StatusCode::TOO_MANY_REQUESTS,
            RATE_LIMIT_MESSAGE.to_string(),
            Some(RATE_LIMIT_RETRY_AFTER_SECS),
        );
    }

    let status = err
        .status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_error(status, err.to_string(), None)
}

fn json_error(status: StatusCode, error: String, retry_after: Option<u64>) -> Response {
    (status, Json(ErrorBody { error, retry_after })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockGenerationClient;
    use axum_test::TestServer;
    use std::time::Duration;

    fn make_server(mock: MockGenerationClient, max_attempts: usize) -> TestServer {
        let state = AppState {
            generation: Arc::new(mock),
            retry: RetryPolicy {
                max_attempts,
                initial_delay: Duration::from_millis(10),
            },
        };
        TestServer::new(router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_chunks_are_forwarded_verbatim() {
        let mock = MockGenerationClient::new()
            .with_chunk_response(vec!["[{\"name\":\"Tomato\",", "\"confidence\":0.9}]"]);
        let server = make_server(mock, 3);

        let response = server
            .post("/api/generate")
            .json(&serde_json::json!({
                "input": "detect ingredients",
                "image": "data:image/jpeg;base64,Zm9v"
            }))
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.text(), "[{\"name\":\"Tomato\",\"confidence\":0.9}]");
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_until_success() {
        let mock = MockGenerationClient::new()
            .with_failure(Some(429), "rate limited")
            .with_failure(Some(429), "rate limited")
            .with_chunk_response(vec!["ok"]);
        let probe = mock.clone();
        let server = make_server(mock, 3);

        let response = server
            .post("/api/generate")
            .json(&serde_json::json!({ "input": "hello" }))
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.text(), "ok");
        assert_eq!(probe.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_rate_limit_returns_429_contract() {
        let mock = MockGenerationClient::new()
            .with_failure(Some(429), "rate limited")
            .with_failure(Some(429), "rate limited")
            .with_failure(Some(429), "rate limited");
        let probe = mock.clone();
        let server = make_server(mock, 3);

        let response = server
            .post("/api/generate")
            .json(&serde_json::json!({ "input": "hello" }))
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: ErrorBody = response.json();
        assert_eq!(
            body.error,
            "Rate limit exceeded. Please wait a moment and try again."
        );
        assert_eq!(body.retry_after, Some(60));
        assert_eq!(probe.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_non_rate_limit_error_is_not_retried() {
        let mock = MockGenerationClient::new().with_failure(Some(403), "forbidden");
        let probe = mock.clone();
        let server = make_server(mock, 3);

        let response = server
            .post("/api/generate")
            .json(&serde_json::json!({ "input": "hello" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "forbidden");
        assert_eq!(body.retry_after, None);
        assert_eq!(probe.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_error_without_status_defaults_to_500() {
        let mock = MockGenerationClient::new().with_failure(None, "something broke");
        let server = make_server(mock, 3);

        let response = server
            .post("/api/generate")
            .json(&serde_json::json!({ "input": "hello" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = response.json();
        assert_eq!(body.error, "something broke");
    }

    #[tokio::test]
    async fn test_unparseable_body_returns_json_error() {
        let mock = MockGenerationClient::new();
        let probe = mock.clone();
        let server = make_server(mock, 3);

        let response = server
            .post("/api/generate")
            .bytes("not json".into())
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = response.json();
        assert!(!body.error.is_empty());
        assert_eq!(probe.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_request_body_fields_still_stream() {
        let mock = MockGenerationClient::new().with_chunk_response(vec![""]);
        let server = make_server(mock, 3);

        let response = server.post("/api/generate").json(&serde_json::json!({})).await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.text(), "");
    }
}
