//! Fleet Service
//!
//! Runs the fleet health check under a deadline.

use async_trait::async_trait;
use fleetwatch_client::{ClientError, FleetClient};
use fleetwatch_core::domain::verdict::FleetVerdict;
use std::time::Duration;

/// Source of fleet verdicts
///
/// Implemented by `FleetClient`; handlers depend on the trait so they can be
/// exercised without a platform.
#[async_trait]
pub trait FleetStateSource: Send + Sync {
    async fn fleet_state(
        &self,
        name_prefix: &str,
        expected: usize,
    ) -> std::result::Result<FleetVerdict, ClientError>;
}

#[async_trait]
impl FleetStateSource for FleetClient {
    async fn fleet_state(
        &self,
        name_prefix: &str,
        expected: usize,
    ) -> std::result::Result<FleetVerdict, ClientError> {
        self.get_fleet_state(name_prefix, expected).await
    }
}

/// Service error type
#[derive(Debug)]
pub enum FleetError {
    /// The platform could not be reached or answered with an error
    Transport(ClientError),
    /// The check did not finish before the deadline
    TimedOut(Duration),
}

impl From<ClientError> for FleetError {
    fn from(err: ClientError) -> Self {
        FleetError::Transport(err)
    }
}

impl std::fmt::Display for FleetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetError::Transport(err) => write!(f, "{}", err),
            FleetError::TimedOut(_) => write!(f, "Timed out checking build containers."),
        }
    }
}

impl FleetError {
    /// Whether the failure lies with the platform rather than with this
    /// service's credentials or deadline
    pub fn is_platform_fault(&self) -> bool {
        match self {
            FleetError::Transport(err) => err.is_server_error(),
            FleetError::TimedOut(_) => false,
        }
    }

    /// Whether no token could be obtained
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, FleetError::Transport(err) if err.is_auth_error())
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;

/// Check the build containers, giving up after `timeout`
///
/// Dropping the check on timeout also drops its in-flight requests.
pub async fn check_build_containers(
    source: &dyn FleetStateSource,
    name_prefix: &str,
    expected: usize,
    timeout: Duration,
) -> Result<FleetVerdict> {
    let verdict = tokio::time::timeout(timeout, source.fleet_state(name_prefix, expected))
        .await
        .map_err(|_| FleetError::TimedOut(timeout))??;

    if let Some(error) = verdict.error() {
        tracing::warn!("Build containers unhealthy: {}", error);
    }

    Ok(verdict)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fixed answer, optionally after a delay
    pub(crate) struct StubSource {
        pub verdict: Option<FleetVerdict>,
        pub delay: Duration,
    }

    impl StubSource {
        pub(crate) fn answering(verdict: FleetVerdict) -> Self {
            Self {
                verdict: Some(verdict),
                delay: Duration::ZERO,
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                verdict: None,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl FleetStateSource for StubSource {
        async fn fleet_state(
            &self,
            _name_prefix: &str,
            _expected: usize,
        ) -> std::result::Result<FleetVerdict, ClientError> {
            tokio::time::sleep(self.delay).await;
            self.verdict
                .clone()
                .ok_or_else(|| ClientError::platform("/v2/apps", 502, "bad gateway"))
        }
    }

    #[tokio::test]
    async fn test_passes_verdict_through() {
        let healthy = FleetVerdict::Healthy {
            expected: 2,
            found: 2,
            started: 2,
        };
        let source = StubSource::answering(healthy.clone());

        let verdict = check_build_containers(&source, "test-builder", 2, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(verdict, healthy);
    }

    #[tokio::test]
    async fn test_unhealthy_verdict_is_not_an_error() {
        let source = StubSource::answering(FleetVerdict::Unhealthy {
            error: "test-builder-2 has 0 running instances".to_string(),
        });

        let verdict = check_build_containers(&source, "test-builder", 2, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!verdict.is_healthy());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let source = StubSource::failing();

        let err = check_build_containers(&source, "test-builder", 2, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::Transport(_)));
        assert!(err.is_platform_fault());
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_auth_failure_is_not_a_platform_fault() {
        let err = FleetError::from(ClientError::from(
            fleetwatch_client::AuthError::MalformedToken("no exp".to_string()),
        ));
        assert!(err.is_auth_failure());
        assert!(!err.is_platform_fault());
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let source = StubSource {
            verdict: None,
            delay: Duration::from_secs(60),
        };

        let err = check_build_containers(&source, "test-builder", 2, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::TimedOut(_)));
        assert_eq!(err.to_string(), "Timed out checking build containers.");
        assert!(!err.is_platform_fault());
    }
}
