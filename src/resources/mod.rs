//! Collection endpoints: fetch, delete and bulk delete
//!
//! Each backend collection (`scenarios`, `processed-scenarios`, `triplets`,
//! `models`, `datasets`) is reached through a [`ResourceClient`] typed by the
//! record it returns.

pub mod types;

use async_trait::async_trait;
use futures_util::future::join_all;
use log::{debug, info, warn};
use pipeline_admin_listview::ListViewEngine;
use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::Fetch;

pub use types::*;

/// Succeeded and failed counts of a batch of independent requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for BulkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)
    }
}

/// Per-id results of a batch, partitioned by outcome
#[derive(Debug)]
pub struct BulkOutcome<T = ()> {
    /// Ids whose request succeeded, with the response, in request order
    pub succeeded: Vec<(String, T)>,
    /// Ids whose request failed, with the error, in request order
    pub failed: Vec<(String, Error)>,
}

impl<T> Default for BulkOutcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BulkOutcome<T> {
    /// Partition settled results by success
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<T>)>,
    {
        let mut outcome = Self::default();
        for (id, result) in results {
            match result {
                Ok(value) => outcome.succeeded.push((id, value)),
                Err(err) => outcome.failed.push((id, err)),
            }
        }
        outcome
    }

    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.succeeded.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn summary(&self) -> BulkSummary {
        BulkSummary {
            succeeded: self.succeeded.len(),
            failed: self.failed.len(),
        }
    }

    /// True when no request failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Consume the outcome, keeping only the successful responses
    pub fn into_values(self) -> Vec<T> {
        self.succeeded.into_iter().map(|(_, value)| value).collect()
    }
}

/// Run one request per id concurrently and wait for all of them to settle
pub(crate) async fn settle_all<'a, T, F, Fut>(ids: &'a [String], request: F) -> BulkOutcome<T>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let requests = ids.iter().map(|id| {
        let fut = request(id.as_str());
        async move { (id.clone(), fut.await) }
    });
    let outcome = BulkOutcome::from_results(join_all(requests).await);

    for (id, err) in &outcome.failed {
        warn!("request for {} failed: {}", id, err);
    }
    outcome
}

/// Backend operations a list view needs
#[async_trait]
pub trait CollectionSource<T: Send + 'static>: Send + Sync {
    /// The full current collection
    async fn fetch_collection(&self) -> Result<Vec<T>>;

    /// Delete one item
    async fn delete_item(&self, id: &str) -> Result<()>;

    /// Delete several items with independent concurrent requests
    async fn delete_items(&self, ids: &[String]) -> BulkOutcome {
        settle_all(ids, |id| self.delete_item(id)).await
    }
}

/// Client for one backend collection
#[derive(Debug, Clone)]
pub struct ResourceClient<T> {
    api_url: String,
    http_client: Client,
    options: ClientOptions,
    _record: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceClient<T> {
    /// Create a new ResourceClient
    pub fn new(api_url: &str, http_client: Client, options: ClientOptions) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client,
            options,
            _record: PhantomData,
        }
    }

    /// URL of the collection, e.g. `http://host/v1/scenarios`
    pub fn collection_url(&self) -> String {
        format!("{}/{}/{}", self.api_url, self.options.api_version, T::PATH)
    }

    /// URL of one item, with the id escaped as a single path segment
    pub fn item_url(&self, id: &str) -> Result<String> {
        let mut url = Url::parse(&self.collection_url())?;
        url.path_segments_mut()
            .map_err(|_| Error::general(format!("cannot append to {}", self.api_url)))?
            .push(id);
        Ok(url.to_string())
    }

    /// An engine configured with this collection's list defaults
    pub fn list_view(&self) -> ListViewEngine<T> {
        ListViewEngine::new(
            T::list_config().with_default_page_size(self.options.default_page_size),
        )
    }

    /// Fetch the whole collection
    pub async fn fetch_collection(&self) -> Result<Vec<T>> {
        let items: Vec<T> = Fetch::get(&self.http_client, &self.collection_url())
            .header("X-Client-Info", &self.options.client_info)
            .execute()
            .await?;
        debug!("fetched {} {} records", items.len(), T::LABEL);
        Ok(items)
    }

    /// Delete one item. Succeeds only on a 2xx response.
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        let url = self.item_url(id)?;
        Fetch::delete(&self.http_client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .execute_unit()
            .await?;
        debug!("deleted {} {}", T::LABEL, id);
        Ok(())
    }

    /// Delete several items, one request per id, all dispatched at once
    pub async fn delete_items(&self, ids: &[String]) -> BulkOutcome {
        let outcome = settle_all(ids, |id| self.delete_item(id)).await;
        info!("bulk delete of {}: {}", T::LABEL, outcome.summary());
        outcome
    }
}

#[async_trait]
impl<T: Resource> CollectionSource<T> for ResourceClient<T> {
    async fn fetch_collection(&self) -> Result<Vec<T>> {
        ResourceClient::fetch_collection(self).await
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        ResourceClient::delete_item(self, id).await
    }

    async fn delete_items(&self, ids: &[String]) -> BulkOutcome {
        ResourceClient::delete_items(self, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ResourceClient<Scenario> {
        ResourceClient::new("http://localhost:8000/", Client::new(), ClientOptions::default())
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(client.collection_url(), "http://localhost:8000/v1/scenarios");
        assert_eq!(
            client.item_url("a b/c").unwrap(),
            "http://localhost:8000/v1/scenarios/a%20b%2Fc"
        );
    }

    #[test]
    fn test_bulk_summary_display() {
        let outcome: BulkOutcome = BulkOutcome::from_results(vec![
            ("x".to_string(), Ok(())),
            ("z".to_string(), Err(Error::general("boom"))),
            ("y".to_string(), Ok(())),
        ]);
        assert_eq!(outcome.succeeded_ids(), vec!["x", "y"]);
        assert_eq!(outcome.failed_ids(), vec!["z"]);
        assert_eq!(outcome.summary().to_string(), "2 succeeded, 1 failed");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_list_view_uses_configured_page_size() {
        let options = ClientOptions::default()
            .with_default_page_size(pipeline_admin_listview::PageSize::Size100);
        let client: ResourceClient<Triplet> =
            ResourceClient::new("http://localhost:8000", Client::new(), options);
        let engine = client.list_view();
        assert_eq!(engine.page_state().size.get(), 100);
        assert_eq!(engine.sort().field, TripletField::CreatedAt);
    }
}
