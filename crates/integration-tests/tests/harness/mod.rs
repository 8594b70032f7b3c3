#![allow(dead_code)]

pub mod config;
pub mod mock_upstream;
pub mod server;

/// Parse SSE `data:` payloads from raw response text
pub fn parse_sse_data(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(str::to_owned)
        .collect()
}

/// Chat request with a single user message
pub fn user_message(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "google-translate",
        "messages": [{"role": "user", "content": content}],
        "stream": true
    })
}
