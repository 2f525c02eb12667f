pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LANGUAGE: &str = "ru";

// Sampling parameters pinned on every upstream payload.
pub const UPSTREAM_MAX_TOKENS: u32 = 2000;
pub const UPSTREAM_TEMPERATURE: f32 = 0.7;
pub const UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Request id assigned by the fronting platform, echoed back as `timestamp`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// CORS surface answered on preflight and echoed on every response.
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, X-API-Key, X-Model, X-Language";
pub const CORS_MAX_AGE: &str = "86400";
