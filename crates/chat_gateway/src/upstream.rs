use std::time::Duration;

use bytes::Bytes;
use courierllm::ChatCompletionsRequest;
use hyper::StatusCode;
use thiserror::Error;

/// Transport-level failure reaching the upstream (connect, DNS, timeout).
/// HTTP error statuses are not errors here; they come back as a normal
/// [`UpstreamResponse`] for the handler to map.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// One reqwest client for the lifetime of the process, pointed at the
/// configured chat-completions endpoint.
pub struct UpstreamClient {
    client: reqwest::Client,
    endpoint: String,
}

impl UpstreamClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(UpstreamClient { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single attempt, no retries; the caller maps whatever comes back.
    pub async fn chat_completions(
        &self,
        api_key: &str,
        payload: &ChatCompletionsRequest,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courierllm::{Message, Role, CHAT_COMPLETIONS_PATH};
    use mockito::Server;
    use pretty_assertions::assert_eq;

    fn sample_payload() -> ChatCompletionsRequest {
        ChatCompletionsRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![Message {
                role: Role::User,
                content: "hi".to_string(),
            }],
            max_tokens: 2000,
            temperature: 0.7,
            stream: false,
        }
    }

    #[tokio::test]
    async fn test_relays_success_body_and_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CHAT_COMPLETIONS_PATH)
            .match_header("authorization", "Bearer sk-test")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new(
            server.url() + CHAT_COMPLETIONS_PATH,
            Duration::from_secs(5),
        )
        .unwrap();
        let response = client
            .chat_completions("sk-test", &sample_payload())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(&response.body[..], br#"{"choices": []}"#);
    }

    #[tokio::test]
    async fn test_non_200_is_not_an_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", CHAT_COMPLETIONS_PATH)
            .with_status(429)
            .with_body(r#"{"error": {"message": "rate limited"}}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new(
            server.url() + CHAT_COMPLETIONS_PATH,
            Duration::from_secs(5),
        )
        .unwrap();
        let response = client
            .chat_completions("sk-test", &sample_payload())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        // nothing listens on port 1
        let client = UpstreamClient::new(
            "http://127.0.0.1:1".to_string() + CHAT_COMPLETIONS_PATH,
            Duration::from_secs(1),
        )
        .unwrap();

        let result = client.chat_completions("sk-test", &sample_payload()).await;
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }
}
