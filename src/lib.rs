//! A command line chat client for an OpenAI assistant that can read, write and
//! run things in the local working directory on the assistant's behalf.
//!
//! The remote assistant owns the conversation. This crate relays operator
//! input to a thread, polls each run until it settles and answers any
//! function calls the assistant makes with the tools in [`tools`].

use serde::Deserialize;
use std::env;

pub mod assistants;
pub mod chat;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod poller;
pub mod service;
pub mod tools;

pub use client::OpenAiClient;
pub use service::AssistantService;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OpenAiError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl OpenAiError {
    pub fn new(message: String, error_type: String) -> OpenAiError {
        OpenAiError {
            message,
            error_type,
            param: None,
            code: None,
        }
    }
}

impl std::fmt::Display for OpenAiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OpenAiError {}

impl From<reqwest::Error> for OpenAiError {
    fn from(value: reqwest::Error) -> Self {
        OpenAiError::new(value.to_string(), "reqwest".to_string())
    }
}

impl From<serde_json::Error> for OpenAiError {
    fn from(value: serde_json::Error) -> Self {
        OpenAiError::new(value.to_string(), "serde_json".to_string())
    }
}

pub type ApiResponseOrError<T> = Result<T, OpenAiError>;

/// Holds the API key and base URL for an OpenAI-compatible server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    base_url: String,
}

impl Credentials {
    /// Creates credentials from an API key and base URL.
    ///
    /// The base URL always ends up with a trailing slash so routes can be
    /// appended to it directly.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            api_key: api_key.into(),
            base_url,
        }
    }

    /// Reads the key from `OPENAI_KEY` (or `OPENAI_API_KEY`) and the base URL
    /// from `OPENAI_BASE_URL`, defaulting to the public API.
    ///
    /// Call `dotenvy::dotenv()` first if the values live in a `.env` file.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let api_key = env::var("OPENAI_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .map_err(|_| config::ConfigError::Missing("OPENAI_KEY"))?;
        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(api_key, base_url))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let credentials = Credentials::new("sk-test", "http://localhost:8080/v1");

        assert_eq!(credentials.base_url(), "http://localhost:8080/v1/");
        assert_eq!(credentials.api_key(), "sk-test");
    }

    #[test]
    fn debug_hides_key() {
        let credentials = Credentials::new("sk-secret", DEFAULT_BASE_URL);

        assert!(!format!("{credentials:?}").contains("sk-secret"));
    }

    #[test]
    fn error_envelope_deserializes() {
        let error: OpenAiError = serde_json::from_str(
            r#"{"message": "No thread found with id 'thread_abc'.", "type": "invalid_request_error", "param": null, "code": null}"#,
        )
        .unwrap();

        assert_eq!(error.error_type, "invalid_request_error");
        assert_eq!(error.to_string(), "No thread found with id 'thread_abc'.");
    }
}
