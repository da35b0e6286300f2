//! Server configuration
//!
//! Platform credentials, fleet shape and listener settings, read from the
//! environment.

use fleetwatch_client::AuthConfig;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Token endpoint and deploy user credentials
    pub auth: AuthConfig,

    /// Platform API base URL (e.g., "https://api.example.com")
    pub api_url: String,

    /// Common base name of the worker apps
    pub build_container_base_name: String,

    /// Number of workers the fleet should have
    pub num_build_containers: usize,

    /// Port to listen on
    pub port: u16,

    /// Deadline for one fleet health check
    pub healthcheck_timeout: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - CLOUD_FOUNDRY_OAUTH_TOKEN_URL (required)
    /// - CLOUD_FOUNDRY_API_HOST (required)
    /// - DEPLOY_USER_USERNAME (required)
    /// - DEPLOY_USER_PASSWORD (required)
    /// - BUILD_CONTAINER_BASE_NAME (required)
    /// - NUM_BUILD_CONTAINERS (optional, default: 1)
    /// - PORT (optional, default: 8080)
    /// - HEALTHCHECK_TIMEOUT_SECS (optional, seconds, default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };

        let token_url = required("CLOUD_FOUNDRY_OAUTH_TOKEN_URL")?;
        let api_url = required("CLOUD_FOUNDRY_API_HOST")?;
        let username = required("DEPLOY_USER_USERNAME")?;
        let password = required("DEPLOY_USER_PASSWORD")?;
        let build_container_base_name = required("BUILD_CONTAINER_BASE_NAME")?;

        let num_build_containers = match lookup("NUM_BUILD_CONTAINERS") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("NUM_BUILD_CONTAINERS must be a number, got '{}'", raw))?,
            None => 1,
        };

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        let healthcheck_timeout = lookup("HEALTHCHECK_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Ok(Self {
            auth: AuthConfig {
                token_url,
                username,
                password,
            },
            api_url,
            build_container_base_name,
            num_build_containers,
            port,
            healthcheck_timeout,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("CLOUD_FOUNDRY_OAUTH_TOKEN_URL", &self.auth.token_url),
            ("CLOUD_FOUNDRY_API_HOST", &self.api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.auth.username.is_empty() {
            anyhow::bail!("DEPLOY_USER_USERNAME cannot be empty");
        }

        if self.build_container_base_name.is_empty() {
            anyhow::bail!("BUILD_CONTAINER_BASE_NAME cannot be empty");
        }

        if self.num_build_containers == 0 {
            anyhow::bail!("NUM_BUILD_CONTAINERS must be greater than 0");
        }

        if self.healthcheck_timeout.as_secs() == 0 {
            anyhow::bail!("HEALTHCHECK_TIMEOUT_SECS must be greater than 0");
        }

        Ok(())
    }
}
