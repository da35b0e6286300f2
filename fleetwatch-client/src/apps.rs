//! Application endpoints: listing, stats, environment update and restage

use fleetwatch_core::domain::instance::InstanceStatusMap;
use fleetwatch_core::domain::worker::{UpdatedWorker, WorkerRef};
use fleetwatch_core::dto::app::{AppEntity, AppSummary, Page, Resource, UpdateAppEnvironment};
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::FleetClient;
use crate::error::{ClientError, Result};

const APPS_PATH: &str = "/v2/apps";

impl FleetClient {
    // =============================================================================
    // Fleet Listing
    // =============================================================================

    /// List the workers whose name starts with `name_prefix`
    ///
    /// Follows pagination until the last page and filters only once the
    /// listing is complete. An empty result is not an error.
    pub async fn list_workers(&self, name_prefix: &str) -> Result<Vec<WorkerRef>> {
        let mut apps: Vec<WorkerRef> = Vec::new();
        let mut next = Some(APPS_PATH.to_string());
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(path) = next {
            if !visited.insert(path.clone()) {
                return Err(ClientError::ParseError(format!(
                    "Pagination loop: {} was already listed",
                    path
                )));
            }

            let response = self.authorized(Method::GET, &path).await?.send().await?;
            let page: Page<AppSummary> = self.handle_response(&path, response).await?;

            next = page.next_url;
            apps.extend(page.resources.into_iter().map(WorkerRef::from));
        }

        let workers: Vec<WorkerRef> = apps
            .into_iter()
            .filter(|app| app.name.starts_with(name_prefix))
            .collect();

        debug!(
            "Listed {} worker(s) matching '{}' across {} page(s)",
            workers.len(),
            name_prefix,
            visited.len()
        );

        Ok(workers)
    }

    /// Fetch the raw per-instance status of one worker
    ///
    /// # Arguments
    /// * `worker_id` - Platform id (guid) of the worker
    pub async fn fetch_instance_status(&self, worker_id: &str) -> Result<InstanceStatusMap> {
        let path = format!("{}/{}/stats", APPS_PATH, worker_id);
        let response = self.authorized(Method::GET, &path).await?.send().await?;

        self.handle_response(&path, response).await
    }

    // =============================================================================
    // Worker Update
    // =============================================================================

    /// Merge `env_patch` into a worker's environment and restage it
    ///
    /// Keys in `env_patch` overwrite existing values; other keys are kept
    /// as the platform stored them, whatever their JSON type.
    /// The restage is only attempted once the update succeeded, and a failed
    /// restage does not roll the update back.
    ///
    /// # Returns
    /// The worker with the environment the platform stored
    pub async fn update_worker(
        &self,
        worker: &WorkerRef,
        env_patch: &HashMap<String, String>,
    ) -> Result<UpdatedWorker> {
        let current = self.fetch_app(&worker.self_link).await?;

        let mut environment_json = current.entity.environment_json;
        environment_json.extend(
            env_patch
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone()))),
        );

        let response = self
            .authorized(Method::PUT, &worker.self_link)
            .await?
            .json(&UpdateAppEnvironment { environment_json })
            .send()
            .await?;
        let updated: Resource<AppEntity> =
            self.handle_response(&worker.self_link, response).await?;

        info!(
            "Updated environment of {} ({} key(s) patched)",
            worker.name,
            env_patch.len()
        );

        self.restage(&worker.id).await.map_err(|e| {
            warn!("Restage of {} failed after environment update: {}", worker.name, e);
            ClientError::Restage {
                worker: worker.name.clone(),
                source: Box::new(e),
            }
        })?;

        info!("Restaged {}", worker.name);

        Ok(UpdatedWorker {
            id: updated.metadata.guid,
            name: updated.entity.name,
            environment: updated.entity.environment_json,
        })
    }

    /// Fetch a single app by its resource path
    async fn fetch_app(&self, self_link: &str) -> Result<Resource<AppEntity>> {
        let response = self.authorized(Method::GET, self_link).await?.send().await?;

        self.handle_response(self_link, response).await
    }

    /// Redeploy an app in place so it picks up its new environment
    async fn restage(&self, worker_id: &str) -> Result<()> {
        let path = format!("{}/{}/restage", APPS_PATH, worker_id);
        let response = self.authorized(Method::POST, &path).await?.send().await?;

        self.handle_empty_response(&path, response).await
    }
}
