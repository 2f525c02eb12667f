use std::sync::Arc;

use bytes::Bytes;
use common::configuration::GatewayConfig;
use common::consts::{
    CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN, CORS_MAX_AGE, DEFAULT_LANGUAGE,
    DEFAULT_MODEL, REQUEST_ID_HEADER, UPSTREAM_MAX_TOKENS, UPSTREAM_TEMPERATURE,
};
use common::errors::GatewayError;
use common::prompts::language_prompt;
use courierllm::{
    upstream_error_message, ChatCompletionsRequest, ChatCompletionsResponse, Message, Role,
};
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Incoming;
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::upstream::UpstreamClient;

fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, hyper::Error> {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Body accepted from the browser client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Caller-supplied key; a non-empty value overrides the configured one.
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Success envelope relayed back to the client. `timestamp` carries the
/// request id assigned by the fronting platform.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: Message,
    pub model: String,
    pub usage: Map<String, Value>,
    pub timestamp: String,
}

pub async fn chat_proxy(
    request: Request<Incoming>,
    config: Arc<GatewayConfig>,
    upstream: Arc<UpstreamClient>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let (parts, body) = request.into_parts();
    let body = body.collect().await?.to_bytes();
    Ok(handle(&parts, &body, &config, &upstream).await)
}

/// Handle one normalized request. Never fails: every rejection becomes a
/// JSON error response.
pub async fn handle(
    parts: &Parts,
    body: &[u8],
    config: &GatewayConfig,
    upstream: &UpstreamClient,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    if parts.method == Method::OPTIONS {
        return preflight_response();
    }

    let request_id = parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match respond(parts, body, config, upstream, &request_id).await {
        Ok(response) => response,
        Err(err) => {
            warn!(request_id = %request_id, status = %err.status_code(), error = %err, "request rejected");
            err.into_response()
        }
    }
}

async fn respond(
    parts: &Parts,
    body: &[u8],
    config: &GatewayConfig,
    upstream: &UpstreamClient,
    request_id: &str,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, GatewayError> {
    if parts.method != Method::POST {
        return Err(GatewayError::MethodNotAllowed);
    }

    // Checked before the body is even parsed: a client-supplied key cannot
    // rescue a deployment with no configured key.
    let server_key = config
        .openai_api_key
        .as_deref()
        .ok_or(GatewayError::ApiKeyMissing)?;

    let chat_request: ChatRequest =
        serde_json::from_slice(body).map_err(GatewayError::InvalidBody)?;

    if chat_request.messages.is_empty() {
        return Err(GatewayError::MessagesRequired);
    }

    let api_key = if chat_request.api_key.is_empty() {
        server_key
    } else {
        chat_request.api_key.as_str()
    };

    let payload = build_upstream_request(&chat_request);

    info!(
        request_id = %request_id,
        model = %payload.model,
        messages = payload.messages.len(),
        "forwarding chat request"
    );
    debug!(request_id = %request_id, language = %chat_request.language, "language prompt injected");

    let outcome = upstream
        .chat_completions(api_key, &payload)
        .await
        .map_err(|err| GatewayError::Transport(err.to_string()))?;

    if outcome.status != StatusCode::OK {
        return Err(GatewayError::Upstream {
            status: outcome.status,
            message: upstream_error_message(outcome.status.as_u16(), &outcome.body),
        });
    }

    let completion = ChatCompletionsResponse::try_from(&outcome.body[..])
        .map_err(|err| GatewayError::Unexpected(err.to_string()))?;

    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(GatewayError::EmptyCompletion);
    };

    info!(request_id = %request_id, "chat request completed");

    let response = ChatResponse {
        message: choice.message,
        model: chat_request.model,
        usage: completion.usage,
        timestamp: request_id.to_string(),
    };

    Ok(json_response(StatusCode::OK, &response))
}

/// Prepend the language system prompt and pin the sampling parameters.
fn build_upstream_request(chat_request: &ChatRequest) -> ChatCompletionsRequest {
    let mut messages = Vec::with_capacity(chat_request.messages.len() + 1);
    messages.push(Message {
        role: Role::System,
        content: language_prompt(&chat_request.language).to_string(),
    });
    messages.extend(chat_request.messages.iter().cloned());

    ChatCompletionsRequest {
        model: chat_request.model.clone(),
        messages,
        max_tokens: UPSTREAM_MAX_TOKENS,
        temperature: UPSTREAM_TEMPERATURE,
        stream: false,
    }
}

/// Preflight answer: exactly the four CORS headers, nothing else.
fn preflight_response() -> Response<BoxBody<Bytes, hyper::Error>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", CORS_ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS)
        .header("Access-Control-Max-Age", CORS_MAX_AGE)
        .body(full("{}"))
        .unwrap()
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    // our own response types always serialize
    let body = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN)
        .body(full(body))
        .unwrap()
}
