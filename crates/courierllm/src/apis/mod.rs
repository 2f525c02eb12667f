pub mod openai;

pub use openai::{ChatCompletionsRequest, ChatCompletionsResponse, Choice, Message, Role};
