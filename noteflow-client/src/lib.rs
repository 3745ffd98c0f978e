//! Noteflow Backend Client
//!
//! A simple, type-safe HTTP client for the note-generation backend API.
//!
//! The task manager consumes the backend as a black box through this crate:
//! submit a generation request, fetch the status of a tracked task, delete a
//! task. All endpoints are stateless per request.
//!
//! # Example
//!
//! ```no_run
//! use noteflow_client::BackendClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), noteflow_client::ClientError> {
//!     let client = BackendClient::new("http://localhost:8000");
//!
//!     let task_id = client
//!         .submit_note("bilibili", &serde_json::json!({"video_url": "https://example.com/v/1"}))
//!         .await?;
//!
//!     println!("Submitted task: {}", task_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod tasks;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the note-generation backend API
///
/// Provides one method per backend endpoint:
/// - Submission (`submit_note`)
/// - Status polling (`fetch_task_status`)
/// - Deletion (`delete_task`)
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// Use this to configure timeouts, proxies, or TLS settings.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle an API response and deserialize the JSON body
    ///
    /// Non-success status codes are turned into `ClientError::ApiError`
    /// carrying whatever body the backend produced.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that carries no body of interest
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
