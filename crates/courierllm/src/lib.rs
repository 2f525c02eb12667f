//! courierllm: wire types for the OpenAI chat-completions API as relayed
//! by the chat gateway.

pub mod apis;

// Re-export important types and traits
pub use apis::openai::{
    upstream_error_message, ChatCompletionsRequest, ChatCompletionsResponse, Choice, ErrorBody,
    ErrorEnvelope, Message, OpenAIError, Role,
};

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
