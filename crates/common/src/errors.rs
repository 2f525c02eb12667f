use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::{Error as HyperError, Response, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::consts::CORS_ALLOW_ORIGIN;

/// Everything the chat handler can reject a request with. Each variant's
/// Display string is the exact `error` field relayed to the client.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("OpenAI API key not configured. Please add OPENAI_API_KEY to project secrets.")]
    ApiKeyMissing,

    #[error("Invalid JSON in request body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Messages array is required")]
    MessagesRequired,

    /// Non-200 from the upstream API; status and message are relayed as-is.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
    },

    #[error("No response from OpenAI")]
    EmptyCompletion,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::ApiKeyMissing
            | GatewayError::InvalidBody(_)
            | GatewayError::MessagesRequired => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::EmptyCompletion
            | GatewayError::Transport(_)
            | GatewayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<BoxBody<Bytes, HyperError>> {
        let status = self.status_code();
        let body_json = json!({ "error": self.to_string() });

        let boxed_body = Full::new(Bytes::from(body_json.to_string()))
            .map_err(|never| match never {})
            .boxed();

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN)
            .body(boxed_body)
            .unwrap_or_else(|_| {
                Response::new(
                    Full::new(Bytes::from("Internal Error"))
                        .map_err(|never| match never {})
                        .boxed(),
                )
            })
    }
}
