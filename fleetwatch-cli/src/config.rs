//! Configuration module
//!
//! Platform connection settings and fleet shape shared by all commands.

use fleetwatch_client::{AuthConfig, FleetClient, TokenCache};
use std::sync::Arc;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Token endpoint and deploy user credentials
    pub auth: AuthConfig,

    /// Platform API base URL
    pub api_url: String,

    /// Common base name of the worker apps
    pub build_container_base_name: String,

    /// Number of workers the fleet should have
    pub num_build_containers: usize,

    /// Base URL workers report build results to
    pub builder_callback: String,
}

impl Config {
    /// Build a platform client for this configuration
    pub fn client(&self) -> FleetClient {
        let http = reqwest::Client::new();
        let tokens = Arc::new(TokenCache::new(self.auth.clone(), http.clone()));
        FleetClient::with_client(self.api_url.clone(), http, tokens)
    }
}
