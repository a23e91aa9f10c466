//! Configuration options for the pipeline admin client

use pipeline_admin_listview::PageSize;
use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the backend base URL
pub const ENV_API_URL: &str = "PIPELINE_API_URL";

/// Environment variable holding the request timeout in seconds
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PIPELINE_REQUEST_TIMEOUT_SECS";

/// Configuration options for the pipeline admin client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// API version path segment
    pub api_version: String,

    /// Value of the `X-Client-Info` header
    pub client_info: String,

    /// How long a toast stays visible
    pub toast_duration: Duration,

    /// Page size new list views start with
    pub default_page_size: PageSize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            api_version: "v1".to_string(),
            client_info: format!("pipeline-admin/{}", env!("CARGO_PKG_VERSION")),
            toast_duration: Duration::from_secs(3),
            default_page_size: PageSize::Size50,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the API version
    pub fn with_api_version(mut self, value: &str) -> Self {
        self.api_version = value.trim_matches('/').to_string();
        self
    }

    /// Set the client info header
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }

    /// Set the toast duration
    pub fn with_toast_duration(mut self, value: Duration) -> Self {
        self.toast_duration = value;
        self
    }

    /// Set the default page size
    pub fn with_default_page_size(mut self, value: PageSize) -> Self {
        self.default_page_size = value;
        self
    }
}

/// Backend location and options read from the environment
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub api_url: String,
    pub options: ClientOptions,
}

impl PipelineConfig {
    /// Read `PIPELINE_API_URL` and the optional `PIPELINE_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::config(format!("{} must be set", ENV_API_URL)))?;
        url::Url::parse(api_url.trim())
            .map_err(|e| Error::config(format!("{} is not a valid URL: {}", ENV_API_URL, e)))?;

        let mut options = ClientOptions::default();
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_REQUEST_TIMEOUT_SECS, raw
                ))
            })?;
            let timeout = if secs == 0 {
                None
            } else {
                Some(Duration::from_secs(secs))
            };
            options = options.with_request_timeout(timeout);
        }

        Ok(Self {
            api_url: api_url.trim().to_string(),
            options,
        })
    }
}
