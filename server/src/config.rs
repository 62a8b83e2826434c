//! Server configuration from environment variables.

use std::env;

/// Upstream text endpoint the passthrough forwards to.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta2/models/text-bison-001:generate";

/// Output budget sent with every forwarded prompt.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 300;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Credential for the upstream API. Requests fail with 500 without it.
    pub api_key: Option<String>,
    /// If set, callers must present it as a bearer token.
    pub function_secret: Option<String>,
    pub upstream_url: String,
    pub max_output_tokens: u32,
    pub bind_addr: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `GEMINI_API_KEY`: upstream credential
    /// - `CHEFGENIE_FUNCTION_SECRET`: shared secret required from callers
    /// - `CHEFGENIE_UPSTREAM_URL`: upstream endpoint
    /// - `CHEFGENIE_MAX_OUTPUT_TOKENS`: output budget (default: 300)
    /// - `CHEFGENIE_BIND`: listen address (default: "0.0.0.0:3000")
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var("GEMINI_API_KEY"),
            function_secret: non_empty_var("CHEFGENIE_FUNCTION_SECRET"),
            upstream_url: env::var("CHEFGENIE_UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string()),
            max_output_tokens: env::var("CHEFGENIE_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            bind_addr: env::var("CHEFGENIE_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
