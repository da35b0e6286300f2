//! Token cache for the platform's OAuth2 token endpoint
//!
//! Fetches a bearer token with a password grant and keeps it until the
//! expiry declared inside the token itself. The token is a JWT signed by the
//! platform; its signature is not checked here, only the `exp` claim is read.

use chrono::Utc;
use fleetwatch_core::dto::auth::{PasswordGrant, TokenClaims, TokenResponse};
use jsonwebtoken::{DecodingKey, Validation};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::AuthError;

/// Public client id the platform's login server issues tokens for
const PLATFORM_CLIENT_ID: &str = "cf";

/// Token endpoint settings
#[derive(Clone)]
pub struct AuthConfig {
    /// Token endpoint URL (e.g., "https://login.example.com/oauth/token")
    pub token_url: String,

    /// Deploy user name
    pub username: String,

    /// Deploy user password
    pub password: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_url", &self.token_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A bearer token together with its decoded expiry
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    raw: String,
    expires_at: i64,
}

impl Credential {
    /// Decodes the expiry claim of `raw` and wraps both
    pub fn from_token(raw: impl Into<String>) -> Result<Self, AuthError> {
        let raw = raw.into();

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<TokenClaims>(
            &raw,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        Ok(Self {
            raw,
            expires_at: data.claims.exp.floor() as i64,
        })
    }

    /// The token as sent in the `Authorization` header
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Expiry instant (Unix timestamp in seconds)
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// A credential is expired once its expiry is at or before `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("raw", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Process-wide cache of the platform bearer token
///
/// Construct once and share it behind an `Arc`. Concurrent callers that
/// observe an expired token may each refresh it; the last write wins.
#[derive(Debug)]
pub struct TokenCache {
    config: AuthConfig,
    client: Client,
    credential: RwLock<Option<Credential>>,
}

impl TokenCache {
    /// Creates an empty cache; the first `token()` call fetches a token
    pub fn new(config: AuthConfig, client: Client) -> Self {
        Self {
            config,
            client,
            credential: RwLock::new(None),
        }
    }

    /// Creates a cache pre-seeded with `credential`
    pub fn with_credential(config: AuthConfig, client: Client, credential: Credential) -> Self {
        Self {
            config,
            client,
            credential: RwLock::new(Some(credential)),
        }
    }

    /// Returns a live credential, fetching a new one if none is cached or
    /// the cached one has expired
    ///
    /// Nothing is cached when the fetch fails, so the next call retries.
    pub async fn token(&self) -> Result<Credential, AuthError> {
        let now = Utc::now().timestamp();

        {
            let cached = self.credential.read().await;
            if let Some(credential) = cached.as_ref() {
                if !credential.is_expired_at(now) {
                    return Ok(credential.clone());
                }
            }
        }

        debug!("Refreshing platform access token");
        let fresh = self.fetch().await.inspect_err(|e| {
            warn!("Failed to refresh platform access token: {}", e);
        })?;

        *self.credential.write().await = Some(fresh.clone());
        debug!("Cached access token expiring at {}", fresh.expires_at());

        Ok(fresh)
    }

    /// Performs the password grant against the token endpoint
    async fn fetch(&self) -> Result<Credential, AuthError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(PLATFORM_CLIENT_ID, Some(""))
            .form(&PasswordGrant::new(
                &self.config.username,
                &self.config.password,
            ))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedToken(format!("invalid token response: {}", e)))?;

        Credential::from_token(body.access_token)
    }
}
