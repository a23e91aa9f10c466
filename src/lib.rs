//! Pipeline Admin Client Library
//!
//! A Rust client for the ML pipeline admin API, providing typed access to the
//! collection endpoints (scenarios, processed scenarios, triplets, models,
//! datasets), the action endpoints (generation, preprocessing, triplet
//! formation, training, evaluation), and list views that filter, sort,
//! paginate and select over the fetched collections.

pub mod actions;
pub mod config;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod resources;
pub mod session;

pub use pipeline_admin_listview as listview;

use reqwest::Client;

use crate::actions::ActionsClient;
use crate::config::{ClientOptions, PipelineConfig};
use crate::error::Result;
use crate::resources::{
    Dataset, ProcessedScenario, Resource, ResourceClient, Scenario, TrainedModel, Triplet,
};
use crate::session::{ActionSession, ListSession};

/// The main entry point for the pipeline admin client
#[derive(Debug, Clone)]
pub struct PipelineAdmin {
    /// The base URL of the backend, without the API version
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl PipelineAdmin {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use pipeline_admin::PipelineAdmin;
    ///
    /// let admin = PipelineAdmin::new("http://localhost:8000");
    /// ```
    pub fn new(api_url: &str) -> Self {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use pipeline_admin::{PipelineAdmin, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_request_timeout(Some(Duration::from_secs(10)));
    /// let admin = PipelineAdmin::new_with_options("http://localhost:8000", options);
    /// ```
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_else(|err| {
            log::warn!("falling back to default HTTP client: {}", err);
            Client::new()
        });

        Self {
            url: api_url.trim_end_matches('/').to_string(),
            http_client,
            options,
        }
    }

    /// Create a client from `PIPELINE_API_URL` and `PIPELINE_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let config = PipelineConfig::from_env()?;
        Ok(Self::new_with_options(&config.api_url, config.options))
    }

    /// Client for any collection, by record type
    ///
    /// # Example
    ///
    /// ```
    /// use pipeline_admin::{PipelineAdmin, resources::Dataset};
    ///
    /// let admin = PipelineAdmin::new("http://localhost:8000");
    /// let datasets = admin.resource::<Dataset>();
    /// assert_eq!(datasets.collection_url(), "http://localhost:8000/v1/datasets");
    /// ```
    pub fn resource<T: Resource>(&self) -> ResourceClient<T> {
        ResourceClient::new(&self.url, self.http_client.clone(), self.options.clone())
    }

    pub fn scenarios(&self) -> ResourceClient<Scenario> {
        self.resource()
    }

    pub fn processed_scenarios(&self) -> ResourceClient<ProcessedScenario> {
        self.resource()
    }

    pub fn triplets(&self) -> ResourceClient<Triplet> {
        self.resource()
    }

    pub fn models(&self) -> ResourceClient<TrainedModel> {
        self.resource()
    }

    pub fn datasets(&self) -> ResourceClient<Dataset> {
        self.resource()
    }

    /// Client for the action endpoints
    pub fn actions(&self) -> ActionsClient {
        ActionsClient::new(&self.url, self.http_client.clone(), self.options.clone())
    }

    /// A list view over one collection, backed by this client
    pub fn list_session<T: Resource>(&self) -> ListSession<T, ResourceClient<T>> {
        ListSession::new(self.resource(), &self.options)
    }

    /// A session for a single-form action page
    pub fn action_session<T>(&self) -> ActionSession<T> {
        ActionSession::new(&self.options)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::actions::{
        ActionRequest, ActionsClient, ComposeDatasetRequest, EvaluateModelRequest,
        GenerateScenariosRequest, TrainingConfig,
    };
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::listview::{ListViewEngine, PageSize, SortDirection, SortState};
    pub use crate::notify::{Toast, ToastKind};
    pub use crate::resources::{
        BulkOutcome, BulkSummary, CollectionSource, Dataset, ProcessedScenario, Resource,
        ResourceClient, Scenario, TrainedModel, Triplet,
    };
    pub use crate::session::{ActionSession, ListSession};
    pub use crate::PipelineAdmin;
}
