//! Worker domain model
//!
//! A worker is a platform application dedicated to running build jobs.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a platform application
///
/// Serialized as the raw upper-case label the platform uses. Labels this
/// crate does not know about are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppState {
    Started,
    Stopped,
    Other(String),
}

impl From<String> for AppState {
    fn from(label: String) -> Self {
        match label.as_str() {
            "STARTED" => AppState::Started,
            "STOPPED" => AppState::Stopped,
            _ => AppState::Other(label),
        }
    }
}

impl From<AppState> for String {
    fn from(state: AppState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppState::Started => write!(f, "STARTED"),
            AppState::Stopped => write!(f, "STOPPED"),
            AppState::Other(label) => write!(f, "{}", label),
        }
    }
}

/// Snapshot of one worker as reported by the platform's app listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRef {
    /// Platform identifier (guid) of the application
    pub id: String,

    /// Application name, a common base name plus an ordinal suffix
    pub name: String,

    /// Current application state
    pub state: AppState,

    /// Path of the application resource, relative to the API root
    pub self_link: String,
}

impl WorkerRef {
    pub fn is_started(&self) -> bool {
        self.state == AppState::Started
    }
}

/// App environment as stored by the platform
///
/// Values are arbitrary JSON; only patches written by this crate are strings.
pub type Environment = serde_json::Map<String, serde_json::Value>;

/// Result of updating a worker's environment and restaging it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedWorker {
    pub id: String,
    pub name: String,

    /// Environment as stored by the platform after the update
    pub environment: Environment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_known_labels() {
        let started: AppState = serde_json::from_str("\"STARTED\"").unwrap();
        let stopped: AppState = serde_json::from_str("\"STOPPED\"").unwrap();
        assert_eq!(started, AppState::Started);
        assert_eq!(stopped, AppState::Stopped);
    }

    #[test]
    fn test_app_state_preserves_unknown_label() {
        let state: AppState = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(state, AppState::Other("PENDING".to_string()));
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"PENDING\"");
    }

    #[test]
    fn test_is_started() {
        let mut worker = WorkerRef {
            id: "123abc".to_string(),
            name: "test-builder-1".to_string(),
            state: AppState::Started,
            self_link: "/v2/apps/123abc".to_string(),
        };
        assert!(worker.is_started());

        worker.state = AppState::Stopped;
        assert!(!worker.is_started());
    }
}
