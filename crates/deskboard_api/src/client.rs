use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::{
    ApiError, ListQuery, Page, Record, envelope::written_record,
};

const REQUEST_TIMEOUT_SECS: u64 = 15;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// A remote collection of records that can be listed and edited
#[async_trait::async_trait]
pub trait Collection: Send + Sync {
    /// Read one page of the collection
    async fn list(&self, query: &ListQuery) -> Result<Page, ApiError>;

    /// Create a record; returns the stored record when the server echoes it
    async fn create(&self, record: &Record) -> Result<Option<Record>, ApiError>;

    /// Replace the fields of the record with identity `id`
    async fn update(
        &self,
        id: &str,
        record: &Record,
    ) -> Result<Option<Record>, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Shared HTTP client for one API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        // Joining relative paths only appends when the base ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Handle on the collection served at `path`, relative to the base URL
    pub fn collection(&self, path: &str) -> Result<RestCollection, ApiError> {
        let endpoint = self.endpoint(path)?;
        Ok(RestCollection {
            client: self.clone(),
            create_endpoint: endpoint.clone(),
            endpoint,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }
}

/// A collection reached over HTTP
#[derive(Debug, Clone)]
pub struct RestCollection {
    client: ApiClient,
    endpoint: Url,
    /// Where new records are posted; the listing endpoint unless overridden
    create_endpoint: Url,
}

impl RestCollection {
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub const fn create_endpoint(&self) -> &Url {
        &self.create_endpoint
    }

    /// Post new records to `path`, relative to the base URL, instead of the
    /// listing endpoint
    pub fn with_create_path(mut self, path: &str) -> Result<Self, ApiError> {
        self.create_endpoint = self.client.endpoint(path)?;
        Ok(self)
    }

    /// URL of a single record, with `id` escaped as one path segment
    pub fn item_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.http.request(method, url);
        match &self.client.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait::async_trait]
impl Collection for RestCollection {
    async fn list(&self, query: &ListQuery) -> Result<Page, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, ?query, "listing");
        let body = Self::send(
            self.request(Method::GET, self.endpoint.clone()).query(query),
        )
        .await?;
        Page::from_json(body)
    }

    async fn create(&self, record: &Record) -> Result<Option<Record>, ApiError> {
        tracing::debug!(endpoint = %self.create_endpoint, "creating record");
        let body = Self::send(
            self.request(Method::POST, self.create_endpoint.clone())
                .json(record),
        )
        .await?;
        Ok(written_record(body))
    }

    async fn update(
        &self,
        id: &str,
        record: &Record,
    ) -> Result<Option<Record>, ApiError> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "updating record");
        let body = Self::send(self.request(Method::PUT, url).json(record)).await?;
        Ok(written_record(body))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "deleting record");
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}
