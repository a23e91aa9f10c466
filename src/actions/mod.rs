//! Action endpoints: generation, preprocessing, triplet formation, training

pub mod types;

use log::{debug, info};
use reqwest::Client;

use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::Fetch;
use crate::resources::{settle_all, BulkOutcome, Dataset, TrainedModel, Triplet};

pub use types::*;

/// Client for the backend's action endpoints
///
/// Actions never touch a local collection; callers refresh the affected
/// list view themselves.
#[derive(Debug, Clone)]
pub struct ActionsClient {
    api_url: String,
    http_client: Client,
    options: ClientOptions,
}

impl ActionsClient {
    /// Create a new ActionsClient
    pub fn new(api_url: &str, http_client: Client, options: ClientOptions) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client,
            options,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_url, self.options.api_version, path)
    }

    /// Validate and send any action request
    pub async fn submit<R: ActionRequest>(&self, request: &R) -> Result<R::Output> {
        request.validate()?;
        debug!("submitting {}", R::NAME);

        let output = Fetch::post(&self.http_client, &self.endpoint(R::PATH))
            .header("X-Client-Info", &self.options.client_info)
            .json(request)?
            .execute::<R::Output>()
            .await?;

        info!("{} accepted", R::NAME);
        Ok(output)
    }

    /// Generate new scenarios
    pub async fn generate_scenarios(
        &self,
        request: &GenerateScenariosRequest,
    ) -> Result<serde_json::Value> {
        self.submit(request).await
    }

    /// Preprocess scenarios into training-ready scenarios
    pub async fn process_scenarios(&self, scenario_ids: &[String]) -> Result<serde_json::Value> {
        self.submit(&ProcessScenarioRequest::new(scenario_ids.to_vec()))
            .await
    }

    /// Form a triplet from one processed scenario
    pub async fn form_triplets(&self, training_ready_scenario_id: &str) -> Result<Triplet> {
        self.submit(&FormTripletsRequest::new(training_ready_scenario_id))
            .await
    }

    /// Form triplets from several processed scenarios, one request each
    pub async fn form_triplets_many(&self, ids: &[String]) -> BulkOutcome<Triplet> {
        let outcome = settle_all(ids, |id| self.form_triplets(id)).await;
        info!("triplet formation: {}", outcome.summary());
        outcome
    }

    /// Start a training run
    pub async fn train_model(&self, config: &TrainingConfig) -> Result<TrainedModel> {
        self.submit(config).await
    }

    /// Evaluate a trained model against a test dataset
    pub async fn evaluate_model(&self, request: &EvaluateModelRequest) -> Result<EvaluationResult> {
        self.submit(request).await
    }

    /// Create a dataset from triplets
    pub async fn compose_dataset(&self, request: &ComposeDatasetRequest) -> Result<Dataset> {
        self.submit(request).await
    }

    /// Backend liveness check
    pub async fn health(&self) -> Result<HealthStatus> {
        Fetch::get(&self.http_client, &self.endpoint("health"))
            .header("X-Client-Info", &self.options.client_info)
            .execute()
            .await
    }
}
