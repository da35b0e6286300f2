//! Error types for the fleetwatch client
//!
//! Transport failures only. An unhealthy fleet is reported as a
//! `FleetVerdict::Unhealthy` value, never as an error.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors obtaining a bearer token
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token request could not be sent or its body could not be read
    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token endpoint answered with a non-2xx status
    #[error("Token endpoint rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response or the token inside it could not be decoded
    #[error("Malformed access token: {0}")]
    MalformedToken(String),
}

/// Errors that can occur when talking to the platform
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token could be obtained
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Platform returned an error status code
    #[error("Platform error from {endpoint} (status {status}): {message}")]
    Platform {
        /// Path of the endpoint that failed
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The environment update was applied but the restage failed
    ///
    /// The update is not rolled back.
    #[error("Environment of {worker} was updated but restage failed: {source}")]
    Restage {
        worker: String,
        source: Box<ClientError>,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create a platform error from endpoint, status code and message
    pub fn platform(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Platform {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// Check if this error came from obtaining a token
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this error is a platform server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Platform { status, .. } => *status >= 500,
            Self::Restage { source, .. } => source.is_server_error(),
            _ => false,
        }
    }
}
