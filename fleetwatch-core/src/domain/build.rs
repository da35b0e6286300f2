//! Build job descriptor
//!
//! Describes one build job handed to a worker: an id, the target container
//! name and the environment the worker is restaged with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Environment variable the worker posts its build result to
pub const CALLBACK_ENV_VAR: &str = "FEDERALIST_BUILDER_CALLBACK";

/// One environment entry of a queued build message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

/// Build parameters as they arrive from a job queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildParams {
    pub name: String,
    #[serde(default)]
    pub environment: Vec<EnvironmentVariable>,
}

/// A build job ready to be applied to a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildJob {
    pub build_id: String,
    pub container_name: String,
    pub container_environment: HashMap<String, String>,
}

impl BuildJob {
    /// Creates a build job with a fresh id
    ///
    /// # Arguments
    /// * `params` - Parameters from the queue message
    /// * `callback_base` - Base URL the worker reports back to (e.g., "http://localhost:3000")
    pub fn new(params: BuildParams, callback_base: &str) -> Self {
        let build_id = Uuid::new_v4().to_string();

        let mut container_environment: HashMap<String, String> = params
            .environment
            .into_iter()
            .map(|var| (var.name, var.value))
            .collect();

        container_environment.insert(
            CALLBACK_ENV_VAR.to_string(),
            format!(
                "{}/builds/{}/callback",
                callback_base.trim_end_matches('/'),
                build_id
            ),
        );

        Self {
            build_id,
            container_name: params.name,
            container_environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BuildParams {
        BuildParams {
            name: "Container Name".to_string(),
            environment: vec![
                EnvironmentVariable {
                    name: "OVERRIDE_A".to_string(),
                    value: "VALUE A".to_string(),
                },
                EnvironmentVariable {
                    name: "OVERRIDE_B".to_string(),
                    value: "VALUE B".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_sets_build_id() {
        let build = BuildJob::new(params(), "http://localhost:3000");
        assert!(Uuid::parse_str(&build.build_id).is_ok());
        assert_eq!(build.container_name, "Container Name");
    }

    #[test]
    fn test_copies_queue_environment() {
        let build = BuildJob::new(params(), "http://localhost:3000");
        assert_eq!(
            build.container_environment.get("OVERRIDE_A"),
            Some(&"VALUE A".to_string())
        );
        assert_eq!(
            build.container_environment.get("OVERRIDE_B"),
            Some(&"VALUE B".to_string())
        );
    }

    #[test]
    fn test_adds_callback_url() {
        let build = BuildJob::new(params(), "http://localhost:3000/");
        assert_eq!(
            build.container_environment.get(CALLBACK_ENV_VAR),
            Some(&format!(
                "http://localhost:3000/builds/{}/callback",
                build.build_id
            ))
        );
    }
}
