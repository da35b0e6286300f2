//! Application DTOs
//!
//! Paginated resource envelopes and app entities as returned by the
//! platform's `/v2/apps` endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::worker::{AppState, Environment, WorkerRef};

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub total_pages: usize,

    /// Path of the next page relative to the API root, `None` on the last page
    #[serde(default)]
    pub next_url: Option<String>,

    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<T>>,
}

/// Resource envelope: platform metadata plus the entity itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<T> {
    pub metadata: Metadata,
    pub entity: T,
}

/// Resource metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub guid: String,
    pub url: String,
}

/// Application as seen in a listing
///
/// Other apps share the listing, so nothing beyond name and state is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSummary {
    pub name: String,
    pub state: AppState,
}

/// Application entity including its environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEntity {
    pub name: String,
    pub state: AppState,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub environment_json: Environment,
}

/// The platform sends `"environment_json": null` for apps without overrides
fn null_as_empty<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of an app update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppEnvironment {
    pub environment_json: Environment,
}

impl From<Resource<AppSummary>> for WorkerRef {
    fn from(resource: Resource<AppSummary>) -> Self {
        WorkerRef {
            id: resource.metadata.guid,
            name: resource.entity.name,
            state: resource.entity.state,
            self_link: resource.metadata.url,
        }
    }
}
