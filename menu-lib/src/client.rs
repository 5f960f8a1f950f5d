//! HTTP client for the menu REST API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::MenuApi;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Menu;
use crate::model::MenuDraft;
use crate::model::MenuId;
use crate::model::MenuPatch;
use crate::response::ApiResponse;
use crate::response::MenuRecord;
use crate::response::flatten_records;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Client for the menu REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// # Example
///
/// ```ignore
/// use menu_lib::MenuClient;
/// use menu_lib::api::MenuApi;
///
/// let client = MenuClient::builder()
///     .url("http://localhost:4000")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let menus = client.fetch_all().await?;
/// ```
#[derive(Clone)]
pub struct MenuClient {
    inner: Arc<MenuClientInner>,
}

struct MenuClientInner {
    base_url: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

#[derive(Serialize)]
struct MoveBody {
    parent_id: Option<MenuId>,
}

#[derive(Serialize)]
struct ReorderBody {
    new_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_index: Option<i32>,
}

impl MenuClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> MenuClientBuilder<Missing> {
        MenuClientBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn menus_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&["api", "menus"])
    }

    fn menu_url(&self, id: MenuId, action: Option<&str>) -> Result<Url, ApiError> {
        let id = id.to_string();
        match action {
            Some(action) => self.endpoint(&["api", "menus", &id, action]),
            None => self.endpoint(&["api", "menus", &id]),
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.inner.http_client.request(method, url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        request
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send().await.map_err(|err| self.map_transport(err))?;
        let status = response.status();
        let body = response.text().await.map_err(|err| self.map_transport(err))?;
        Ok((status, body))
    }

    fn map_transport(&self, err: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(err),
        }
    }

    /// Sends `request` and unwraps the response envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = self.execute(request).await?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|err| ApiError::parse_with_body(err.to_string(), body.clone()))?;
        envelope.into_data()
    }
}

fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        Ok(envelope) => match envelope.error {
            Some(detail) => ApiError::http_with_detail(status.as_u16(), envelope.message, detail),
            None => ApiError::http(status.as_u16(), envelope.message),
        },
        Err(_) => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                body.to_string()
            };
            ApiError::http(status.as_u16(), message)
        }
    }
}

fn not_found_as(id: MenuId, err: ApiError) -> Error {
    match err.status_code() {
        Some(404) => Error::NotFound(id),
        _ => Error::Api(err),
    }
}

#[async_trait]
impl MenuApi for MenuClient {
    async fn fetch_all(&self) -> Result<Vec<Menu>, Error> {
        let request = self.request(Method::GET, self.menus_url()?);
        let records: Vec<MenuRecord> = self.send(request).await?;
        let menus = flatten_records(records);
        log::debug!("Fetched {} menu(s)", menus.len());
        Ok(menus)
    }

    async fn fetch_one(&self, id: MenuId) -> Result<Option<Menu>, Error> {
        let request = self.request(Method::GET, self.menu_url(id, None)?);
        match self.send::<Menu>(request).await {
            Ok(menu) => Ok(Some(menu)),
            Err(err) if err.status_code() == Some(404) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn apply_reparent(&self, id: MenuId, new_parent: Option<MenuId>) -> Result<Menu, Error> {
        let request = self
            .request(Method::PATCH, self.menu_url(id, Some("move"))?)
            .json(&MoveBody {
                parent_id: new_parent,
            });
        self.send(request).await.map_err(|err| not_found_as(id, err))
    }

    async fn apply_reorder(
        &self,
        id: MenuId,
        new_index: usize,
        previous_index: Option<i32>,
    ) -> Result<Menu, Error> {
        let request = self
            .request(Method::PATCH, self.menu_url(id, Some("reorder"))?)
            .json(&ReorderBody {
                new_index,
                old_index: previous_index,
            });
        self.send(request).await.map_err(|err| not_found_as(id, err))
    }

    async fn create(&self, draft: &MenuDraft) -> Result<Menu, Error> {
        let request = self.request(Method::POST, self.menus_url()?).json(draft);
        Ok(self.send(request).await?)
    }

    async fn update(&self, id: MenuId, patch: &MenuPatch) -> Result<Menu, Error> {
        let request = self.request(Method::PUT, self.menu_url(id, None)?).json(patch);
        self.send(request).await.map_err(|err| not_found_as(id, err))
    }

    async fn delete(&self, id: MenuId) -> Result<bool, Error> {
        let request = self.request(Method::DELETE, self.menu_url(id, None)?);
        let (status, body) = self.execute(request).await?;
        if status.is_success() {
            Ok(true)
        } else {
            Err(not_found_as(id, error_from_body(status, &body)))
        }
    }
}

impl std::fmt::Debug for MenuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`MenuClient`].
///
/// Uses the typestate pattern to ensure the base URL is set at compile time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use menu_lib::MenuClient;
///
/// let client = MenuClient::builder()
///     .url("http://localhost:4000")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url().as_str(), "http://localhost:4000/");
/// ```
pub struct MenuClientBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl MenuClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `http://localhost:4000`.
    pub fn url(self, url: impl Into<String>) -> MenuClientBuilder<Set<String>> {
        MenuClientBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for MenuClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> MenuClientBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl MenuClientBuilder<Set<String>> {
    /// Builds the [`MenuClient`].
    ///
    /// Fails if the URL cannot be parsed or cannot carry a path.
    pub fn build(self) -> Result<MenuClient, ApiError> {
        let base_url = Url::parse(self.url.0.trim())
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {}", self.url.0, err)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.url.0));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(MenuClient {
            inner: Arc::new(MenuClientInner {
                base_url,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
