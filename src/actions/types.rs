//! Request and response bodies of the action endpoints

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resources::{Dataset, TrainedModel, Triplet};

/// A POST endpoint that starts a backend action
///
/// Requests check themselves before anything is sent; a failed check is an
/// [`Error::Validation`].
pub trait ActionRequest: Serialize + Send + Sync {
    /// Decoded response body
    type Output: DeserializeOwned + Send;

    /// Path under the API version
    const PATH: &'static str;

    /// Human-readable action name for messages
    const NAME: &'static str;

    fn validate(&self) -> Result<()>;
}

fn require_non_blank(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(format!("{} must not be empty", what)))
    } else {
        Ok(())
    }
}

fn require_ids(ids: &[String], what: &str) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::validation(format!("select at least one {}", what)));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(Error::validation(format!("{} ids must not be empty", what)));
    }
    Ok(())
}

/// A method the scenario generator may draw from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl MethodProfile {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A context the generated scenarios take place in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Situation {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Body of `POST scenarios/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateScenariosRequest {
    pub output_count: u32,
    pub method_pool: Vec<MethodProfile>,
    pub situations: Vec<Situation>,
}

impl Default for GenerateScenariosRequest {
    fn default() -> Self {
        Self {
            output_count: 5,
            method_pool: vec![
                MethodProfile::new("addToCart", "Add product to the shopping cart"),
                MethodProfile::new("viewCart", "View the contents of the shopping cart"),
            ],
            situations: vec![Situation::new(
                "On Product Page",
                "User is viewing a product detail page",
            )],
        }
    }
}

impl GenerateScenariosRequest {
    pub fn with_output_count(mut self, value: u32) -> Self {
        self.output_count = value;
        self
    }

    pub fn with_method(mut self, method: MethodProfile) -> Self {
        self.method_pool.push(method);
        self
    }

    pub fn with_situation(mut self, situation: Situation) -> Self {
        self.situations.push(situation);
        self
    }
}

impl ActionRequest for GenerateScenariosRequest {
    type Output = serde_json::Value;
    const PATH: &'static str = "scenarios/generate";
    const NAME: &'static str = "scenario generation";

    fn validate(&self) -> Result<()> {
        if self.method_pool.is_empty() || self.situations.is_empty() {
            return Err(Error::validation(
                "at least one method and one situation are required",
            ));
        }
        if self.output_count == 0 {
            return Err(Error::validation("output count must be greater than 0"));
        }
        for method in &self.method_pool {
            require_non_blank(&method.name, "method name")?;
        }
        for situation in &self.situations {
            require_non_blank(&situation.name, "situation name")?;
        }
        Ok(())
    }
}

/// Body of `POST scenarios/process`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessScenarioRequest {
    pub scenario_ids: Vec<String>,
}

impl ProcessScenarioRequest {
    pub fn new(scenario_ids: Vec<String>) -> Self {
        Self { scenario_ids }
    }
}

impl ActionRequest for ProcessScenarioRequest {
    type Output = serde_json::Value;
    const PATH: &'static str = "scenarios/process";
    const NAME: &'static str = "scenario processing";

    fn validate(&self) -> Result<()> {
        require_ids(&self.scenario_ids, "scenario")
    }
}

/// Body of `POST triplets/form`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTripletsRequest {
    pub training_ready_scenario_id: String,
}

impl FormTripletsRequest {
    pub fn new(training_ready_scenario_id: &str) -> Self {
        Self {
            training_ready_scenario_id: training_ready_scenario_id.to_string(),
        }
    }
}

impl ActionRequest for FormTripletsRequest {
    type Output = Triplet;
    const PATH: &'static str = "triplets/form";
    const NAME: &'static str = "triplet formation";

    fn validate(&self) -> Result<()> {
        require_non_blank(&self.training_ready_scenario_id, "processed scenario id")
    }
}

/// Hyperparameters and metadata of a training run, body of `POST models/train`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub dataset_id: String,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
    pub name: String,
    pub description: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_id: String::new(),
            epochs: 10,
            batch_size: 32,
            learning_rate: 0.001,
            name: "My New Training Run".to_string(),
            description: "Training a custom model with updated parameters.".to_string(),
        }
    }
}

impl TrainingConfig {
    pub fn new(dataset_id: &str) -> Self {
        Self {
            dataset_id: dataset_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, value: &str) -> Self {
        self.name = value.to_string();
        self
    }

    pub fn with_description(mut self, value: &str) -> Self {
        self.description = value.to_string();
        self
    }

    pub fn with_epochs(mut self, value: u32) -> Self {
        self.epochs = value;
        self
    }

    pub fn with_batch_size(mut self, value: u32) -> Self {
        self.batch_size = value;
        self
    }

    pub fn with_learning_rate(mut self, value: f64) -> Self {
        self.learning_rate = value;
        self
    }

    /// Set epochs, batch size and learning rate from form text
    pub fn with_numeric_fields(
        mut self,
        epochs: &str,
        batch_size: &str,
        learning_rate: &str,
    ) -> Result<Self> {
        let invalid = || {
            Error::validation(
                "epochs, batch size and learning rate must be valid numbers greater than 0",
            )
        };
        self.epochs = epochs.trim().parse().map_err(|_| invalid())?;
        self.batch_size = batch_size.trim().parse().map_err(|_| invalid())?;
        self.learning_rate = learning_rate.trim().parse().map_err(|_| invalid())?;
        Ok(self)
    }
}

impl ActionRequest for TrainingConfig {
    type Output = TrainedModel;
    const PATH: &'static str = "models/train";
    const NAME: &'static str = "model training";

    fn validate(&self) -> Result<()> {
        if self.dataset_id.trim().is_empty() {
            return Err(Error::validation("select a dataset"));
        }
        require_non_blank(&self.name, "model name")?;
        if self.epochs == 0
            || self.batch_size == 0
            || !self.learning_rate.is_finite()
            || self.learning_rate <= 0.0
        {
            return Err(Error::validation(
                "epochs, batch size and learning rate must be valid numbers greater than 0",
            ));
        }
        Ok(())
    }
}

/// Body of `POST models/evaluate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateModelRequest {
    pub model_id: String,
    pub test_dataset_id: String,
}

impl EvaluateModelRequest {
    pub fn new(model_id: &str, test_dataset_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            test_dataset_id: test_dataset_id.to_string(),
        }
    }
}

impl ActionRequest for EvaluateModelRequest {
    type Output = EvaluationResult;
    const PATH: &'static str = "models/evaluate";
    const NAME: &'static str = "model evaluation";

    fn validate(&self) -> Result<()> {
        require_non_blank(&self.model_id, "model id")?;
        require_non_blank(&self.test_dataset_id, "test dataset id")
    }
}

/// Aggregate metrics of an evaluation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub average_inference_time_ms: f64,
    #[serde(default)]
    pub average_power_consumption_mw: f64,
    #[serde(default)]
    pub total_test_cases: u64,
}

/// Response of `POST models/evaluate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "TrainedModel_ID")]
    pub trained_model_id: String,
    #[serde(rename = "Dataset_ID")]
    pub dataset_id: String,
    pub summary_metrics: SummaryMetrics,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST datasets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeDatasetRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub triplet_ids: Vec<String>,
}

impl ComposeDatasetRequest {
    pub fn new(name: &str, description: &str, triplet_ids: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            triplet_ids,
        }
    }
}

impl ActionRequest for ComposeDatasetRequest {
    type Output = Dataset;
    const PATH: &'static str = "datasets";
    const NAME: &'static str = "dataset composition";

    fn validate(&self) -> Result<()> {
        require_non_blank(&self.name, "dataset name")?;
        require_ids(&self.triplet_ids, "triplet")
    }
}

/// Response of `GET health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
