//! View controllers that connect the list engine to the backend
//!
//! A [`ListSession`] owns one collection view: it fetches through a
//! [`CollectionSource`], feeds results into the [`ListViewEngine`], and turns
//! every failure into an error-panel message and/or a toast. Nothing here
//! returns an error to the caller; the session is always left consistent and
//! retryable.

use log::{info, warn};
use pipeline_admin_listview::ListViewEngine;
use std::future::Future;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::notify::Toaster;
use crate::resources::{settle_all, BulkOutcome, BulkSummary, CollectionSource, Resource};

/// One list view bound to a backend collection
pub struct ListSession<T: Resource, S> {
    source: S,
    engine: ListViewEngine<T>,
    toaster: Toaster,
    error: Option<String>,
}

impl<T, S> ListSession<T, S>
where
    T: Resource,
    S: CollectionSource<T>,
{
    /// Create a session with the collection's list defaults
    pub fn new(source: S, options: &ClientOptions) -> Self {
        let engine =
            ListViewEngine::new(T::list_config().with_default_page_size(options.default_page_size));
        Self::with_engine(source, engine, Toaster::new(options.toast_duration))
    }

    pub fn with_engine(source: S, engine: ListViewEngine<T>, toaster: Toaster) -> Self {
        Self {
            source,
            engine,
            toaster,
            error: None,
        }
    }

    pub fn engine(&self) -> &ListViewEngine<T> {
        &self.engine
    }

    /// Mutable access for search, sort, paging and selection
    pub fn engine_mut(&mut self) -> &mut ListViewEngine<T> {
        &mut self.engine
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Message of the error panel
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reload the collection. Returns whether the fetch succeeded.
    ///
    /// A failed fetch empties the collection and keeps the message in the
    /// error panel until the next success or [`ListSession::dismiss_error`].
    pub async fn refresh(&mut self) -> bool {
        match self.source.fetch_collection().await {
            Ok(items) => {
                self.engine.replace_collection(items);
                self.error = None;
                true
            }
            Err(err) => {
                warn!("fetching {}s failed: {}", T::LABEL, err);
                self.engine.replace_collection(Vec::new());
                self.error = Some(format!("Failed to fetch {}s: {}", T::LABEL, err));
                false
            }
        }
    }

    /// Delete one item; it leaves the view only once the backend confirms
    pub async fn delete_one(&mut self, id: &str) -> bool {
        match self.source.delete_item(id).await {
            Ok(()) => {
                self.engine.remove_items([id]);
                self.toaster
                    .success(format!("Deleted {} {}", T::LABEL, id))
                    .await;
                true
            }
            Err(err) => {
                let message = format!("Failed to delete {} {}: {}", T::LABEL, id, err);
                self.fail(message).await;
                false
            }
        }
    }

    /// Delete every selected item with independent requests
    ///
    /// Confirmed ids leave the collection and the selection; failed ids stay
    /// in both. Returns `None` when nothing was selected.
    pub async fn delete_selected(&mut self) -> Option<BulkSummary> {
        let ids = self.engine.selected_ids();
        if ids.is_empty() {
            self.toaster
                .error(format!("No {}s selected", T::LABEL))
                .await;
            return None;
        }

        let outcome = self.source.delete_items(&ids).await;
        self.engine.remove_items(outcome.succeeded_ids());

        let summary = outcome.summary();
        info!("deleted {}s: {}", T::LABEL, summary);
        if outcome.is_success() {
            self.toaster
                .success(format!("Deleted {}s: {}", T::LABEL, summary))
                .await;
        } else {
            let message = format!("Some {}s could not be deleted: {}", T::LABEL, summary);
            self.fail(message).await;
        }
        Some(summary)
    }

    /// Send one action request carrying every selected id
    ///
    /// The selection is cleared only on success. The collection is never
    /// touched; refresh the affected view to see the result.
    pub async fn submit_for_selection<R, F, Fut>(&mut self, action: F) -> Option<R>
    where
        F: FnOnce(Vec<String>) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let ids = self.engine.selected_ids();
        if ids.is_empty() {
            self.toaster
                .error(format!("Select at least one {}", T::LABEL))
                .await;
            return None;
        }

        let count = ids.len();
        match action(ids).await {
            Ok(result) => {
                self.error = None;
                self.engine.clear_selection();
                self.toaster
                    .success(format!("Submitted {} {}s", count, T::LABEL))
                    .await;
                Some(result)
            }
            Err(err) => {
                self.report(err).await;
                None
            }
        }
    }

    /// Send one action request per selected id, concurrently
    ///
    /// The selection is cleared only when every request succeeded.
    pub async fn submit_for_each_selected<R, F, Fut>(&mut self, action: F) -> Option<BulkOutcome<R>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let ids = self.engine.selected_ids();
        if ids.is_empty() {
            self.toaster
                .error(format!("Select at least one {}", T::LABEL))
                .await;
            return None;
        }

        let outcome = settle_all(&ids, |id| action(id.to_string())).await;
        let summary = outcome.summary();
        if outcome.is_success() {
            self.error = None;
            self.engine.clear_selection();
            self.toaster
                .success(format!("Sent {} requests", summary.succeeded))
                .await;
        } else {
            let detail = outcome
                .failed
                .first()
                .map(|(id, err)| format!(" ({}: {})", id, err))
                .unwrap_or_default();
            let message = format!("Some requests failed: {}{}", summary, detail);
            self.fail(message).await;
        }
        Some(outcome)
    }

    async fn report(&mut self, err: Error) {
        if err.is_validation() {
            self.toaster.error(err.to_string()).await;
        } else {
            warn!("{} action failed: {}", T::LABEL, err);
            self.fail(err.to_string()).await;
        }
    }

    async fn fail(&mut self, message: String) {
        self.error = Some(message.clone());
        self.toaster.error(message).await;
    }
}

/// A single-form action page, such as the generator or the trainer
pub struct ActionSession<T> {
    toaster: Toaster,
    error: Option<String>,
    last_result: Option<T>,
}

impl<T> ActionSession<T> {
    pub fn new(options: &ClientOptions) -> Self {
        Self::with_toaster(Toaster::new(options.toast_duration))
    }

    pub fn with_toaster(toaster: Toaster) -> Self {
        Self {
            toaster,
            error: None,
            last_result: None,
        }
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Result of the last successful submission
    pub fn last_result(&self) -> Option<&T> {
        self.last_result.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Await an action and surface its outcome
    ///
    /// Validation failures only raise a toast and leave the session as it
    /// was. Other failures set the error panel as well.
    pub async fn submit<Fut>(&mut self, action: Fut, success_message: &str) -> Option<&T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match action.await {
            Ok(result) => {
                self.error = None;
                self.last_result = Some(result);
                self.toaster.success(success_message).await;
                self.last_result.as_ref()
            }
            Err(err) if err.is_validation() => {
                self.toaster.error(err.to_string()).await;
                None
            }
            Err(err) => {
                warn!("action failed: {}", err);
                let message = err.to_string();
                self.error = Some(message.clone());
                self.last_result = None;
                self.toaster.error(message).await;
                None
            }
        }
    }
}
