use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::models::{Item, ItemId};

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("hn-mcp/", env!("CARGO_PKG_VERSION"));

/// Story id lists published by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryCategory {
    Latest,
    Top,
    Best,
}

impl StoryCategory {
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Latest => "newstories",
            Self::Top => "topstories",
            Self::Best => "beststories",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Top => "top",
            Self::Best => "best",
        }
    }
}

impl fmt::Display for StoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub enum ClientError {
    Request(reqwest::Error),
    Status { url: String, status: StatusCode },
    Decode { url: String, source: reqwest::Error },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(err) => write!(f, "upstream request failed: {err}"),
            Self::Status { url, status } => write!(f, "upstream returned {status} for {url}"),
            Self::Decode { url, source } => {
                write!(f, "failed to decode upstream response from {url}: {source}")
            }
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) | Self::Decode { source: err, .. } => Some(err),
            Self::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Configuration for the upstream HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Thin wrapper over the upstream JSON endpoints.
///
/// Every call is a single GET. Failures are returned to the caller, never
/// retried.
#[derive(Debug, Clone)]
pub struct HnClient {
    http: Client,
    base_url: String,
}

impl HnClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// Returns `ClientError::Request` if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the ordered id list for a story category.
    ///
    /// # Errors
    /// Returns `ClientError` on network failure, non-2xx status, or a body
    /// that is not an id array.
    pub async fn list_ids(&self, category: StoryCategory) -> ClientResult<Vec<ItemId>> {
        let url = format!("{}/{}.json", self.base_url, category.endpoint());
        let ids: Option<Vec<ItemId>> = self.get_json(&url).await?;
        let ids = ids.unwrap_or_default();
        debug!(%category, count = ids.len(), "fetched story ids");
        Ok(ids)
    }

    /// Fetches a single item. A `null` body yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns `ClientError` on network failure, non-2xx status, or an
    /// undecodable body.
    pub async fn fetch_item(&self, id: ItemId) -> ClientResult<Option<Item>> {
        let url = format!("{}/item/{id}.json", self.base_url);
        self.get_json(&url).await
    }

    async fn get_json<T>(&self, url: &str) -> ClientResult<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
            });
        }
        response
            .json::<Option<T>>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HnClient {
        HnClient::new(&ClientConfig::new(server.uri())).expect("client should build")
    }

    #[tokio::test]
    async fn list_ids_reads_category_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beststories.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![3, 1, 2]))
            .mount(&server)
            .await;

        let ids = client_for(&server)
            .list_ids(StoryCategory::Best)
            .await
            .expect("id list should load");
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/topstories.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_ids(StoryCategory::Top)
            .await
            .expect_err("503 should fail");
        assert!(matches!(err, ClientError::Status { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn null_item_body_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/42.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let item = client_for(&server)
            .fetch_item(42)
            .await
            .expect("null body is not an error");
        assert!(item.is_none());
    }

    #[tokio::test]
    async fn garbage_item_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/7.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_item(7)
            .await
            .expect_err("html should not decode");
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = HnClient::new(&ClientConfig::new("http://localhost:1/v0/"))
            .expect("client should build");
        assert_eq!(client.base_url(), "http://localhost:1/v0");
    }
}
