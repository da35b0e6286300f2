//! Fleet health verdict
//!
//! Count and state checks run over the whole listing first and every problem
//! found there is reported together. Only a fleet that passes them gets its
//! per-instance status checked.

use fleetwatch_core::domain::instance::{InstanceState, InstanceStatusMap, StateHistogram};
use fleetwatch_core::domain::verdict::FleetVerdict;
use fleetwatch_core::domain::worker::WorkerRef;
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::FleetClient;
use crate::error::Result;

/// Count how many instances are in each state
///
/// Labels appear in the order first seen while walking the map in
/// instance order. An empty map gives an empty histogram.
pub fn app_instance_states(instances: &InstanceStatusMap) -> StateHistogram {
    let mut histogram = StateHistogram::new();
    for (_, status) in instances.iter() {
        histogram.record(&status.state);
    }
    histogram
}

/// Problems with the fleet as a whole, in reporting order
fn fleet_problems(expected: usize, found: usize, started: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if found != expected {
        errors.push(format!(
            "Expected {} build containers but only {} found.",
            expected, found
        ));
    }

    // Compared against `expected`: a short fleet cannot have all of its
    // expected containers started.
    if started != expected {
        errors.push("Not all build containers are in the STARTED state.".to_string());
    }

    errors
}

/// Problem with one worker's instances, if any
fn instance_problem(worker: &WorkerRef, histogram: &StateHistogram) -> Option<String> {
    if histogram.is_empty() {
        return Some(format!("{} has 0 running instances", worker.name));
    }

    if histogram.count(&InstanceState::Running) != histogram.total() {
        // Serializing a map of strings to integers cannot fail
        let counts = serde_json::to_string(histogram).unwrap_or_default();
        return Some(format!(
            "{}:\tNot all instances for are running. {}",
            worker.name, counts
        ));
    }

    None
}

impl FleetClient {
    /// Compute the health verdict for the fleet named by `name_prefix`
    ///
    /// An unhealthy fleet is a successful call returning
    /// `FleetVerdict::Unhealthy`; `Err` is reserved for transport failures.
    ///
    /// # Arguments
    /// * `name_prefix` - Common base name of the worker apps
    /// * `expected` - Number of workers the fleet should have
    pub async fn get_fleet_state(&self, name_prefix: &str, expected: usize) -> Result<FleetVerdict> {
        let workers = self.list_workers(name_prefix).await?;
        let found = workers.len();
        let started: Vec<&WorkerRef> = workers.iter().filter(|w| w.is_started()).collect();

        let errors = fleet_problems(expected, found, started.len());
        if let Some(verdict) = FleetVerdict::from_errors(&errors) {
            info!(
                "Fleet '{}' unhealthy: expected={}, found={}, started={}",
                name_prefix,
                expected,
                found,
                started.len()
            );
            return Ok(verdict);
        }

        // Fetched concurrently, evaluated in listing order
        let statuses =
            try_join_all(started.iter().map(|w| self.fetch_instance_status(&w.id))).await?;

        let errors: Vec<String> = started
            .iter()
            .zip(&statuses)
            .filter_map(|(worker, instances)| {
                let histogram = app_instance_states(instances);
                debug!("{} instance states: {:?}", worker.name, histogram);
                instance_problem(worker, &histogram)
            })
            .collect();

        if let Some(verdict) = FleetVerdict::from_errors(&errors) {
            info!(
                "Fleet '{}' unhealthy: {} worker(s) with failing instances",
                name_prefix,
                errors.len()
            );
            return Ok(verdict);
        }

        debug!("Fleet '{}' healthy: {} worker(s) running", name_prefix, found);

        Ok(FleetVerdict::Healthy {
            expected,
            found,
            started: started.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::tests::{app, client_for, mock_app_stats, mock_list_apps};
    use crate::error::ClientError;
    use fleetwatch_core::domain::instance::InstanceStatus;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE_NAME: &str = "test-builder";
    const NUM_CONTAINERS: usize = 2;

    fn error_of(verdict: FleetVerdict) -> String {
        match verdict {
            FleetVerdict::Unhealthy { error } => error,
            healthy => panic!("expected unhealthy verdict, got {:?}", healthy),
        }
    }

    #[test]
    fn test_app_instance_states_counts_states() {
        let instances: InstanceStatusMap = [
            ("0", InstanceStatus::new(InstanceState::Running)),
            ("1", InstanceStatus::new(InstanceState::Running)),
            ("2", InstanceStatus::new(InstanceState::Flapping)),
        ]
        .into_iter()
        .collect();

        let histogram = app_instance_states(&instances);

        assert_eq!(histogram.count(&InstanceState::Running), 2);
        assert_eq!(histogram.count(&InstanceState::Flapping), 1);
        assert_eq!(histogram.total(), instances.len());
    }

    #[test]
    fn test_app_instance_states_empty_map() {
        let histogram = app_instance_states(&InstanceStatusMap::new());
        assert!(histogram.is_empty());
        assert_eq!(serde_json::to_string(&histogram).unwrap(), "{}");
    }

    #[test]
    fn test_app_instance_states_sums_to_map_size() {
        let states = [
            InstanceState::Running,
            InstanceState::Crashed,
            InstanceState::Down,
            InstanceState::Running,
            InstanceState::Other("UNKNOWN".to_string()),
        ];
        let instances: InstanceStatusMap = states
            .iter()
            .enumerate()
            .map(|(i, s)| (i.to_string(), InstanceStatus::new(s.clone())))
            .collect();

        let histogram = app_instance_states(&instances);
        assert_eq!(histogram.total(), states.len());
        assert_eq!(histogram.iter().count(), 4);
    }

    #[test]
    fn test_fleet_problems_order() {
        assert_eq!(
            fleet_problems(2, 0, 0),
            vec![
                "Expected 2 build containers but only 0 found.".to_string(),
                "Not all build containers are in the STARTED state.".to_string(),
            ]
        );
        assert!(fleet_problems(2, 2, 2).is_empty());
    }

    #[tokio::test]
    async fn test_healthy_fleet() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(
            &server,
            vec![
                app("123abc", "test-builder-1", "STARTED"),
                app("456def", "test-builder-2", "STARTED"),
            ],
        )
        .await;
        mock_app_stats(&server, "123abc", json!({ "0": { "state": "RUNNING" } })).await;
        mock_app_stats(&server, "456def", json!({ "0": { "state": "RUNNING" } })).await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(
            verdict,
            FleetVerdict::Healthy {
                expected: 2,
                found: 2,
                started: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_no_containers_reports_both_fleet_problems() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(&server, vec![]).await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(
            error_of(verdict),
            "Expected 2 build containers but only 0 found.\n\
             Not all build containers are in the STARTED state."
        );
    }

    #[tokio::test]
    async fn test_too_few_containers_skips_instance_checks() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(&server, vec![app("123abc", "test-builder-1", "STARTED")]).await;
        Mock::given(method("GET"))
            .and(path("/v2/apps/123abc/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(
            error_of(verdict),
            "Expected 2 build containers but only 1 found.\n\
             Not all build containers are in the STARTED state."
        );
    }

    #[tokio::test]
    async fn test_not_all_started() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(
            &server,
            vec![
                app("123abc", "test-builder-1", "STOPPED"),
                app("456def", "test-builder-2", "STARTED"),
            ],
        )
        .await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(
            error_of(verdict),
            "Not all build containers are in the STARTED state."
        );
    }

    #[tokio::test]
    async fn test_failing_instances() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(
            &server,
            vec![
                app("123abc", "test-builder-1", "STARTED"),
                app("456def", "test-builder-2", "STARTED"),
            ],
        )
        .await;
        mock_app_stats(&server, "123abc", json!({ "0": { "state": "RUNNING" } })).await;
        mock_app_stats(
            &server,
            "456def",
            json!({ "1": { "state": "CRASHED" }, "0": { "state": "RUNNING" } }),
        )
        .await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(
            error_of(verdict),
            "test-builder-2:\tNot all instances for are running. {\"RUNNING\":1,\"CRASHED\":1}"
        );
    }

    #[tokio::test]
    async fn test_zero_instances() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(
            &server,
            vec![
                app("123abc", "test-builder-1", "STARTED"),
                app("456def", "test-builder-2", "STARTED"),
            ],
        )
        .await;
        mock_app_stats(&server, "123abc", json!({ "0": { "state": "RUNNING" } })).await;
        mock_app_stats(&server, "456def", json!({})).await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(error_of(verdict), "test-builder-2 has 0 running instances");
    }

    #[tokio::test]
    async fn test_every_failing_worker_is_reported_in_listing_order() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(
            &server,
            vec![
                app("123abc", "test-builder-1", "STARTED"),
                app("456def", "test-builder-2", "STARTED"),
            ],
        )
        .await;
        mock_app_stats(&server, "123abc", json!({})).await;
        mock_app_stats(&server, "456def", json!({ "0": { "state": "DOWN" } })).await;

        let verdict = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap();

        assert_eq!(
            error_of(verdict),
            "test-builder-1 has 0 running instances\n\
             test-builder-2:\tNot all instances for are running. {\"DOWN\":1}"
        );
    }

    #[tokio::test]
    async fn test_stats_failure_is_a_transport_error() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        mock_list_apps(
            &server,
            vec![
                app("123abc", "test-builder-1", "STARTED"),
                app("456def", "test-builder-2", "STARTED"),
            ],
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/v2/apps/123abc/stats"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "0": { "state": "RUNNING" } })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/apps/456def/stats"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client
            .get_fleet_state(BASE_NAME, NUM_CONTAINERS)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Platform { status: 500, .. }));
    }
}
