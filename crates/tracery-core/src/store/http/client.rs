//! reqwest-backed store talking to the tracing service REST API

use super::query::{
    QueryParams, dataset_params, example_params, feedback_params, page_params, run_params,
    truncate_body,
};
use crate::config::ClientConfig;
use crate::error::{TraceError, TraceResult};
use crate::pagination::{Page, PageRequest};
use crate::schemas::{
    Dataset, DatasetCreate, Example, ExampleCreate, ExampleId, ExampleUpdate, Feedback,
    FeedbackCreate, Project, ProjectCreate, Run, RunCreate, RunId, RunUpdate, Selector,
};
use crate::store::filters::{DatasetFilter, ExampleFilter, FeedbackFilter, RunFilter};
use crate::store::trait_def::{CatalogStore, RunStore};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use uuid::Uuid;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Store backed by the tracing service HTTP API
///
/// Each trait method maps to exactly one request, except selectors and
/// project-name filters, which are first resolved to an id.
pub struct HttpStore {
    config: ClientConfig,
    http_client: Client,
}

impl HttpStore {
    /// Create a store from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tracery_core::config::ClientConfig;
    /// use tracery_core::store::HttpStore;
    ///
    /// # fn example() -> tracery_core::error::TraceResult<()> {
    /// let store = HttpStore::new(ClientConfig::new("http://localhost:1984"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> TraceResult<Self> {
        config.validate().map_err(|e| {
            TraceError::config_with_context(
                format!("Invalid client config: {}", e),
                format!("Creating HTTP store for '{}'", config.api_url),
            )
        })?;

        let mut client_builder = Client::builder()
            .connect_timeout(config.timeouts.connection_timeout())
            .timeout(config.timeouts.request_timeout());

        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                reqwest::header::HeaderName::from_bytes(key.as_bytes()),
                reqwest::header::HeaderValue::from_str(value),
            ) {
                headers.insert(name, val);
            }
        }
        if !headers.is_empty() {
            client_builder = client_builder.default_headers(headers);
        }

        let http_client = client_builder
            .build()
            .map_err(|e| TraceError::config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            "Created HTTP store for '{}' with timeouts: connection={}s, request={}s",
            config.base_url(),
            config.timeouts.connection_timeout_secs,
            config.timeouts.request_timeout_secs
        );

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    async fn check(response: Response, url: &str) -> TraceResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let body = truncate_body(&body, MAX_ERROR_BODY_CHARS);
        if status == StatusCode::NOT_FOUND {
            return Err(TraceError::not_found(format!("{} returned 404: {}", url, body)));
        }
        Err(TraceError::http_status(
            format!("Request failed with status {}: {}", status, body),
            url,
            status.as_u16(),
        ))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> TraceResult<T> {
        let response = Self::check(request.send().await?, url).await?;
        let value = response.json::<T>().await?;
        Ok(value)
    }

    async fn send_empty(request: RequestBuilder, url: &str) -> TraceResult<()> {
        Self::check(request.send().await?, url).await?;
        Ok(())
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: QueryParams,
        page: PageRequest,
    ) -> TraceResult<Page<T>> {
        let url = self.url(path);
        let items: Vec<T> =
            Self::send_json(self.http_client.get(&url).query(&params), &url).await?;
        let next = page.next_after(items.len());
        Ok(Page::new(items, next))
    }

    /// Look up a single record through a name-filtered list endpoint
    async fn find_by_name<T: DeserializeOwned>(
        &self,
        path: &str,
        name: &str,
        resource_type: &str,
    ) -> TraceResult<T> {
        let url = self.url(path);
        let items: Vec<T> =
            Self::send_json(self.http_client.get(&url).query(&[("name", name)]), &url).await?;
        items.into_iter().next().ok_or_else(|| {
            TraceError::not_found_resource(
                format!("No {} named '{}'", resource_type, name),
                resource_type,
            )
        })
    }

    async fn resolve_project_id(&self, selector: &Selector) -> TraceResult<Uuid> {
        match selector {
            Selector::Id(id) => Ok(*id),
            Selector::Name(_) => Ok(self.read_project(selector).await?.id),
        }
    }

    async fn resolve_dataset_id(&self, selector: &Selector) -> TraceResult<Uuid> {
        match selector {
            Selector::Id(id) => Ok(*id),
            Selector::Name(_) => Ok(self.read_dataset(selector).await?.id),
        }
    }
}

#[async_trait]
impl RunStore for HttpStore {
    #[instrument(skip(self, run), fields(run_id = %run.id), level = "debug")]
    async fn create_run(&self, run: &RunCreate) -> TraceResult<()> {
        let url = self.url("/runs");
        Self::send_empty(self.http_client.post(&url).json(run), &url).await
    }

    #[instrument(skip(self, update), level = "debug")]
    async fn update_run(&self, run_id: RunId, update: &RunUpdate) -> TraceResult<()> {
        let url = self.url(&format!("/runs/{}", run_id));
        Self::send_empty(self.http_client.patch(&url).json(update), &url).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn read_run(&self, run_id: RunId) -> TraceResult<Run> {
        let url = self.url(&format!("/runs/{}", run_id));
        Self::send_json(self.http_client.get(&url), &url).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete_run(&self, run_id: RunId) -> TraceResult<()> {
        let url = self.url(&format!("/runs/{}", run_id));
        Self::send_empty(self.http_client.delete(&url), &url).await
    }

    #[instrument(skip(self, filter), level = "debug")]
    async fn list_runs(&self, filter: &RunFilter, page: PageRequest) -> TraceResult<Page<Run>> {
        let session_id = match (&filter.project_id, &filter.project_name) {
            (Some(id), _) => Some(*id),
            (None, Some(name)) => Some(
                self.resolve_project_id(&Selector::Name(name.clone()))
                    .await?,
            ),
            (None, None) => None,
        };
        self.get_page("/runs", run_params(filter, session_id, page), page)
            .await
    }

    #[instrument(skip(self), level = "debug")]
    async fn read_example(&self, example_id: ExampleId) -> TraceResult<Example> {
        let url = self.url(&format!("/examples/{}", example_id));
        Self::send_json(self.http_client.get(&url), &url).await
    }

    #[instrument(skip(self, feedback), fields(run_id = %feedback.run_id, key = %feedback.key), level = "debug")]
    async fn create_feedback(&self, feedback: &FeedbackCreate) -> TraceResult<Feedback> {
        let url = self.url("/feedback");
        Self::send_json(self.http_client.post(&url).json(feedback), &url).await
    }

    #[instrument(skip(self, filter), level = "debug")]
    async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Feedback>> {
        self.get_page("/feedback", feedback_params(filter, page), page)
            .await
    }
}

#[async_trait]
impl CatalogStore for HttpStore {
    async fn create_project(&self, project: &ProjectCreate) -> TraceResult<Project> {
        let url = self.url("/sessions");
        Self::send_json(self.http_client.post(&url).json(project), &url).await
    }

    async fn read_project(&self, selector: &Selector) -> TraceResult<Project> {
        match selector {
            Selector::Id(id) => {
                let url = self.url(&format!("/sessions/{}", id));
                Self::send_json(self.http_client.get(&url), &url).await
            }
            Selector::Name(name) => self.find_by_name("/sessions", name, "project").await,
        }
    }

    async fn list_projects(&self, page: PageRequest) -> TraceResult<Page<Project>> {
        self.get_page("/sessions", page_params(page), page).await
    }

    async fn delete_project(&self, selector: &Selector) -> TraceResult<()> {
        let id = self.resolve_project_id(selector).await?;
        let url = self.url(&format!("/sessions/{}", id));
        Self::send_empty(self.http_client.delete(&url), &url).await
    }

    async fn create_dataset(&self, dataset: &DatasetCreate) -> TraceResult<Dataset> {
        let url = self.url("/datasets");
        Self::send_json(self.http_client.post(&url).json(dataset), &url).await
    }

    async fn read_dataset(&self, selector: &Selector) -> TraceResult<Dataset> {
        match selector {
            Selector::Id(id) => {
                let url = self.url(&format!("/datasets/{}", id));
                Self::send_json(self.http_client.get(&url), &url).await
            }
            Selector::Name(name) => self.find_by_name("/datasets", name, "dataset").await,
        }
    }

    async fn list_datasets(
        &self,
        filter: &DatasetFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Dataset>> {
        self.get_page("/datasets", dataset_params(filter, page), page)
            .await
    }

    async fn delete_dataset(&self, selector: &Selector) -> TraceResult<()> {
        let id = self.resolve_dataset_id(selector).await?;
        let url = self.url(&format!("/datasets/{}", id));
        Self::send_empty(self.http_client.delete(&url), &url).await
    }

    async fn create_example(&self, example: &ExampleCreate) -> TraceResult<Example> {
        let url = self.url("/examples");
        Self::send_json(self.http_client.post(&url).json(example), &url).await
    }

    async fn list_examples(
        &self,
        filter: &ExampleFilter,
        page: PageRequest,
    ) -> TraceResult<Page<Example>> {
        self.get_page("/examples", example_params(filter, page), page)
            .await
    }

    async fn update_example(
        &self,
        example_id: ExampleId,
        update: &ExampleUpdate,
    ) -> TraceResult<Example> {
        let url = self.url(&format!("/examples/{}", example_id));
        Self::send_json(self.http_client.patch(&url).json(update), &url).await
    }

    async fn delete_example(&self, example_id: ExampleId) -> TraceResult<()> {
        let url = self.url(&format!("/examples/{}", example_id));
        Self::send_empty(self.http_client.delete(&url), &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = HttpStore::new(ClientConfig::new("not a url"));
        assert!(matches!(result, Err(TraceError::Config { .. })));
    }

    #[test]
    fn test_url_joins_base_without_double_slash() {
        let store = HttpStore::new(ClientConfig::new("http://localhost:1984/")).unwrap();
        assert_eq!(store.url("/runs"), "http://localhost:1984/runs");
    }

    #[test]
    fn test_custom_headers_accepted() {
        let config = ClientConfig::new("https://api.example.com").with_header("x-api-key", "secret");
        let store = HttpStore::new(config).unwrap();
        assert_eq!(store.config().headers.len(), 1);
    }
}
