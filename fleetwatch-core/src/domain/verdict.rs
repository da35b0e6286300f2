//! Fleet verdict
//!
//! The outcome of a fleet health check. An unhealthy verdict is a normal
//! result value, not a transport failure.

use serde::{Deserialize, Serialize};

/// Health verdict for the worker fleet
///
/// Serialized untagged so the wire shape is exactly
/// `{"expected":2,"found":2,"started":2}` or `{"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FleetVerdict {
    Healthy {
        expected: usize,
        found: usize,
        started: usize,
    },
    Unhealthy {
        /// One or more problems, separated by `\n`
        error: String,
    },
}

impl FleetVerdict {
    /// Builds an unhealthy verdict from a list of problems
    ///
    /// Returns `None` when there are no problems to report.
    pub fn from_errors(errors: &[String]) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        Some(FleetVerdict::Unhealthy {
            error: errors.join("\n"),
        })
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, FleetVerdict::Healthy { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FleetVerdict::Healthy { .. } => None,
            FleetVerdict::Unhealthy { error } => Some(error),
        }
    }
}
