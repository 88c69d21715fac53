//! Crate for interacting with the GitLab REST API.
//!
//! This crate provides a client for making authenticated requests to GitLab using a
//! personal (or OAuth) access token. It covers the group, project and namespace endpoints
//! the provider needs and nothing more.
//!
//! Consumers should depend on the [`GitLabApi`] trait rather than on [`GitLabClient`]
//! directly, so that tests can substitute an in-memory implementation.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod lookup;
pub use lookup::Lookup;

pub mod models;
pub use models::{Group, Namespace, NamespaceKind, Project, VisibilityLevel};

pub mod payloads;
pub use payloads::{
    GroupCreatePayload, GroupUpdatePayload, ProjectCreatePayload, ProjectTransferPayload,
    ProjectUpdatePayload,
};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Base URL used when the provider is not pointed at a self-hosted instance.
pub const DEFAULT_BASE_URL: &str = "https://gitlab.com/api/v4/";

/// Header GitLab reads the access token from.
const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Header carrying the next page number on paginated list endpoints.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Page size requested from list endpoints (GitLab's maximum).
const PAGE_SIZE: u32 = 100;

/// Operations the provider performs against GitLab.
///
/// Every method is a single request/response round trip, except
/// [`GitLabApi::list_namespaces`] which walks all result pages.
#[async_trait]
pub trait GitLabApi: Send + Sync {
    /// Fetches a group by its numeric ID.
    async fn get_group(&self, id: u64) -> Lookup<Group>;

    /// Creates a group.
    async fn create_group(&self, payload: &GroupCreatePayload) -> Result<Group, Error>;

    /// Updates a group. Only the fields set in `payload` are changed.
    async fn update_group(&self, id: u64, payload: &GroupUpdatePayload) -> Result<Group, Error>;

    /// Deletes a group.
    async fn delete_group(&self, id: u64) -> Result<(), Error>;

    /// Fetches a project by its numeric ID.
    async fn get_project(&self, id: u64) -> Lookup<Project>;

    /// Creates a project.
    async fn create_project(&self, payload: &ProjectCreatePayload) -> Result<Project, Error>;

    /// Edits a project. Only the fields set in `payload` are changed.
    async fn update_project(
        &self,
        id: u64,
        payload: &ProjectUpdatePayload,
    ) -> Result<Project, Error>;

    /// Moves a project into another namespace.
    async fn transfer_project(
        &self,
        id: u64,
        payload: &ProjectTransferPayload,
    ) -> Result<Project, Error>;

    /// Deletes a project.
    async fn delete_project(&self, id: u64) -> Result<(), Error>;

    /// Lists every namespace visible to the authenticated token.
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, Error>;
}

/// A client for interacting with the GitLab API, authenticated with an access token.
///
/// The client holds no mutable state; one instance can be shared by any number of
/// concurrent callers.
#[derive(Debug)]
pub struct GitLabClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl GitLabClient {
    /// Creates a new `GitLabClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the REST API, e.g. `https://gitlab.example.com/api/v4/`.
    ///   A missing trailing slash is added so relative endpoint paths resolve below it.
    /// * `token` - Access token sent in the `PRIVATE-TOKEN` header.
    ///
    /// # Errors
    /// Returns `Error::Http` if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url, token: SecretString) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gitlab-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            token,
        })
    }

    /// Returns the API root this client sends requests to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let url = self.endpoint(path)?;
        debug!(method = %method, url = %url, "Sending GitLab API request");
        Ok(self
            .http
            .request(method, url)
            .header(PRIVATE_TOKEN_HEADER, self.token.expose_secret()))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GitLabApi for GitLabClient {
    #[instrument(skip(self), fields(group_id = id))]
    async fn get_group(&self, id: u64) -> Lookup<Group> {
        let result = match self.request(Method::GET, &format!("groups/{id}")) {
            Ok(request) => self.fetch(request).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            if !matches!(e, Error::NotFound) {
                log_api_error("Failed to get group", e);
            }
        }
        Lookup::from_result(result)
    }

    #[instrument(skip(self, payload), fields(name = %payload.name, path = %payload.path))]
    async fn create_group(&self, payload: &GroupCreatePayload) -> Result<Group, Error> {
        let request = self.request(Method::POST, "groups")?.json(payload);
        let group: Group = self.fetch(request).await.inspect_err(|e| {
            log_api_error("Failed to create group", e);
        })?;

        info!(group_id = group.id, "Created group");
        Ok(group)
    }

    #[instrument(skip(self, payload), fields(group_id = id))]
    async fn update_group(&self, id: u64, payload: &GroupUpdatePayload) -> Result<Group, Error> {
        let request = self
            .request(Method::PUT, &format!("groups/{id}"))?
            .json(payload);
        self.fetch(request).await.inspect_err(|e| {
            log_api_error("Failed to update group", e);
        })
    }

    #[instrument(skip(self), fields(group_id = id))]
    async fn delete_group(&self, id: u64) -> Result<(), Error> {
        let request = self.request(Method::DELETE, &format!("groups/{id}"))?;
        self.execute(request).await.inspect_err(|e| {
            log_api_error("Failed to delete group", e);
        })?;

        info!(group_id = id, "Deleted group");
        Ok(())
    }

    #[instrument(skip(self), fields(project_id = id))]
    async fn get_project(&self, id: u64) -> Lookup<Project> {
        let result = match self.request(Method::GET, &format!("projects/{id}")) {
            Ok(request) => self.fetch(request).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            if !matches!(e, Error::NotFound) {
                log_api_error("Failed to get project", e);
            }
        }
        Lookup::from_result(result)
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_project(&self, payload: &ProjectCreatePayload) -> Result<Project, Error> {
        let request = self.request(Method::POST, "projects")?.json(payload);
        let project: Project = self.fetch(request).await.inspect_err(|e| {
            log_api_error("Failed to create project", e);
        })?;

        info!(project_id = project.id, "Created project");
        Ok(project)
    }

    #[instrument(skip(self, payload), fields(project_id = id))]
    async fn update_project(
        &self,
        id: u64,
        payload: &ProjectUpdatePayload,
    ) -> Result<Project, Error> {
        let request = self
            .request(Method::PUT, &format!("projects/{id}"))?
            .json(payload);
        self.fetch(request).await.inspect_err(|e| {
            log_api_error("Failed to update project", e);
        })
    }

    #[instrument(skip(self, payload), fields(project_id = id, namespace_id = payload.namespace))]
    async fn transfer_project(
        &self,
        id: u64,
        payload: &ProjectTransferPayload,
    ) -> Result<Project, Error> {
        let request = self
            .request(Method::PUT, &format!("projects/{id}/transfer"))?
            .json(payload);
        self.fetch(request).await.inspect_err(|e| {
            log_api_error("Failed to transfer project", e);
        })
    }

    #[instrument(skip(self), fields(project_id = id))]
    async fn delete_project(&self, id: u64) -> Result<(), Error> {
        let request = self.request(Method::DELETE, &format!("projects/{id}"))?;
        self.execute(request).await.inspect_err(|e| {
            log_api_error("Failed to delete project", e);
        })?;

        info!(project_id = id, "Deleted project");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, Error> {
        let mut namespaces = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = self.request(Method::GET, "namespaces")?.query(&[
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ]);
            let response = self.execute(request).await.inspect_err(|e| {
                log_api_error("Failed to list namespaces", e);
            })?;

            let next_page = next_page(response.headers());
            let bytes = response.bytes().await?;
            let batch: Vec<Namespace> = serde_json::from_slice(&bytes)?;
            namespaces.extend(batch);

            match next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        debug!(count = namespaces.len(), "Retrieved namespaces");
        Ok(namespaces)
    }
}

/// Creates a `GitLabClient` from a base URL string and a plain token.
///
/// # Errors
/// Returns `Error::InvalidUrl` if `base_url` does not parse, or `Error::Http` if the HTTP
/// client cannot be built.
///
/// # Example
///
/// ```rust
/// use gitlab_client::create_token_client;
///
/// let client = create_token_client("https://gitlab.example.com/api/v4", "glpat-xxxx").unwrap();
/// assert_eq!(client.base_url().as_str(), "https://gitlab.example.com/api/v4/");
/// ```
#[instrument(skip(token))]
pub fn create_token_client(base_url: &str, token: &str) -> Result<GitLabClient, Error> {
    let url = Url::parse(base_url)?;
    GitLabClient::new(url, SecretString::from(token.to_string()))
}

fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// Maps a non-success HTTP status to an [`Error`].
fn error_for_status(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::AuthError(format!("{}: {}", status, error_message(status, body)))
        }
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
        _ => Error::Api {
            status: status.as_u16(),
            message: error_message(status, body),
        },
    }
}

/// Extracts GitLab's error text from a response body.
///
/// GitLab replies with `{"message": ...}` (a string, or an object of per-field errors for
/// validation failures) or `{"error": "..."}`.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return s.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

fn log_api_error(message: &str, e: &Error) {
    match e {
        Error::Api { status, message: body } => error!(
            status = status,
            error_message = body.as_str(),
            "{}. Received an error from GitLab",
            message
        ),
        Error::AuthError(detail) => error!(
            error_message = detail.as_str(),
            "{}. The token was rejected",
            message
        ),
        Error::Http(detail) => error!(
            error_message = detail.as_str(),
            "{}. The request did not complete",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
