//! Token endpoint DTOs

use serde::{Deserialize, Serialize};

/// Form body of a password grant request
#[derive(Debug, Clone, Serialize)]
pub struct PasswordGrant<'a> {
    pub grant_type: &'static str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> PasswordGrant<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            grant_type: "password",
            username,
            password,
        }
    }
}

/// Successful token endpoint response
///
/// The expiry is read from the token itself, so the other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Claims read from an access token
///
/// Only the expiry is needed; other claims are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp in seconds, may carry a fraction)
    pub exp: f64,
}
