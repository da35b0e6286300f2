//! Fleetwatch HTTP Client
//!
//! Talks to the platform API on behalf of the build-worker supervisor:
//! authenticates through a shared [`TokenCache`], lists the worker fleet,
//! aggregates per-instance health into a [`FleetVerdict`] and applies
//! environment updates followed by a restage.
//!
//! # Example
//!
//! ```no_run
//! use fleetwatch_client::{AuthConfig, FleetClient, TokenCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tokens = Arc::new(TokenCache::new(
//!         AuthConfig {
//!             token_url: "https://login.example.com/oauth/token".to_string(),
//!             username: "deploy_user".to_string(),
//!             password: "deploy_pass".to_string(),
//!         },
//!         reqwest::Client::new(),
//!     ));
//!     let client = FleetClient::new("https://api.example.com", tokens);
//!
//!     let verdict = client.get_fleet_state("test-builder", 2).await?;
//!     println!("{}", serde_json::to_string(&verdict)?);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
mod apps;
mod fleet;

// Re-export commonly used types
pub use auth::{AuthConfig, Credential, TokenCache};
pub use error::{AuthError, ClientError, Result};
pub use fleet::app_instance_states;
pub use fleetwatch_core::domain::verdict::FleetVerdict;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// HTTP client for the platform API
///
/// Cheap to clone; clones share the HTTP connection pool and the token cache.
#[derive(Debug, Clone)]
pub struct FleetClient {
    /// Base URL of the platform API (e.g., "https://api.example.com")
    api_url: String,
    /// HTTP client instance
    client: Client,
    /// Shared bearer token cache
    tokens: Arc<TokenCache>,
}

impl FleetClient {
    /// Create a new fleet client
    ///
    /// # Arguments
    /// * `api_url` - The base URL of the platform API
    /// * `tokens` - Token cache shared by every client in the process
    pub fn new(api_url: impl Into<String>, tokens: Arc<TokenCache>) -> Self {
        Self::with_client(api_url, Client::new(), tokens)
    }

    /// Create a new fleet client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(api_url: impl Into<String>, client: Client, tokens: Arc<TokenCache>) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        }
    }

    /// Get the base URL of the platform API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Absolute URL for a path relative to the API root
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Start a request carrying a current bearer token
    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let credential = self.tokens.token().await?;
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(credential.raw()))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-2xx statuses become `ClientError::Platform` tagged with `endpoint`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::platform(endpoint, status.as_u16(), error_text));
        }

        response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse JSON from {}: {}", endpoint, e))
        })
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, endpoint: &str, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::platform(endpoint, status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Arc<TokenCache> {
        Arc::new(TokenCache::new(
            AuthConfig {
                token_url: "http://localhost:9999/oauth/token".to_string(),
                username: "deploy_user".to_string(),
                password: "deploy_pass".to_string(),
            },
            Client::new(),
        ))
    }

    #[test]
    fn test_client_creation() {
        let client = FleetClient::new("https://api.example.com", tokens());
        assert_eq!(client.api_url(), "https://api.example.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = FleetClient::new("https://api.example.com/", tokens());
        assert_eq!(client.api_url(), "https://api.example.com");
        assert_eq!(client.url("/v2/apps"), "https://api.example.com/v2/apps");
    }

    #[test]
    fn test_clones_share_token_cache() {
        let client = FleetClient::with_client("https://api.example.com", Client::new(), tokens());
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.tokens, &clone.tokens));
    }
}
