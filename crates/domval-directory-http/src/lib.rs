// # HTTP Domain Directory Client
//
// This crate provides an HTTP/JSON Domain Directory client for the domain
// validation system.
//
// ## API
//
// The directory service exposes operation-named endpoints under one base
// URL, all invoked with POST and JSON bodies:
//
// - `POST {base_url}/getDomainsPendingValidation` with an empty body,
//   answered with `{"Items": [ ...records... ]}`
// - `POST {base_url}/setDomainValidationState` with the organisation id,
//   domain name and new state
//
// Records travel with PascalCase field names and the three uppercase state
// literals; the serde derives on `DomainRecord` keep that format intact.
//
// ## Constraints
//
// - Makes one HTTP request per directory call
// - Full error propagation to the caller (no retry, no backoff — a failed
//   update is the batch runner's problem)
// - HTTP timeout configured (30 seconds)
// - Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - NO caching of records (the service is the source of truth)
//
// ## Security
//
// - The API token NEVER appears in logs or Debug output
// - The client fails fast on an empty token

use async_trait::async_trait;
use domval_core::config::DirectoryConfig;
use domval_core::traits::{
    DomainDirectory, DomainDirectoryFactory, DomainRecord, ValidationState,
};
use domval_core::{ComponentRegistry, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default HTTP timeout for directory requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Caller name reported to the directory service when none is configured
const DEFAULT_CALLER_NAME: &str = "domain_validator";

/// Request header carrying the caller name
const CALLER_NAME_HEADER: &str = "X-Caller-Name";

/// List response envelope used by the directory service
#[derive(Debug, Deserialize)]
struct PendingValidationResponse {
    #[serde(rename = "Items")]
    items: Vec<DomainRecord>,
}

/// Payload for `setDomainValidationState`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SetValidationStateRequest<'a> {
    organisation_id: &'a str,
    domain_name: &'a str,
    validation_state: ValidationState,
}

/// HTTP/JSON Domain Directory client
///
/// Stateless and single-shot: every trait call is exactly one request to
/// the directory service.
pub struct HttpDomainDirectory {
    /// Base URL of the directory API
    base_url: String,

    /// Bearer token for the directory API
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Caller name sent with every request
    caller_name: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HttpDomainDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDomainDirectory")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .field("caller_name", &self.caller_name)
            .finish()
    }
}

impl HttpDomainDirectory {
    /// Create a new directory client
    ///
    /// # Parameters
    ///
    /// - `base_url`: base URL of the directory API
    /// - `api_token`: bearer token; must not be empty
    /// - `caller_name`: caller name reported to the service, or `None` for
    ///   the default
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        caller_name: Option<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let api_token = api_token.into();

        if base_url.is_empty() {
            return Err(Error::config("Directory base URL cannot be empty"));
        }
        if api_token.is_empty() {
            return Err(Error::config("Directory API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_token,
            caller_name: caller_name.unwrap_or_else(|| DEFAULT_CALLER_NAME.to_string()),
            client,
        })
    }

    /// Build the URL for an operation-named endpoint
    fn endpoint(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), operation)
    }

    /// POST a JSON body to one directory operation
    ///
    /// Maps non-success status codes onto the error taxonomy; the caller
    /// gets the response back only on 2xx.
    async fn post<T: Serialize + ?Sized>(
        &self,
        operation: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.endpoint(operation))
            .bearer_auth(&self.api_token)
            .header(CALLER_NAME_HEADER, &self.caller_name)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", operation, e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid API token or insufficient permissions. Status: {}",
                status
            )),
            404 => Error::not_found(format!("Directory operation not found: {}", operation)),
            429 => Error::rate_limited(format!(
                "Directory rate limit exceeded. Please retry later. Status: {}",
                status
            )),
            500..=599 => Error::http(format!(
                "Directory server error (transient): {} - {}",
                status, error_text
            )),
            _ => Error::http(format!(
                "Directory call {} failed: {} - {}",
                operation, status, error_text
            )),
        })
    }
}

#[async_trait]
impl DomainDirectory for HttpDomainDirectory {
    async fn list_pending_validation(&self) -> Result<Vec<DomainRecord>> {
        tracing::debug!("Listing domains pending validation");

        let response = self
            .post("getDomainsPendingValidation", &serde_json::json!({}))
            .await?;

        let body: PendingValidationResponse = response
            .json()
            .await
            .map_err(|e| Error::http(format!("Failed to parse listing response: {}", e)))?;

        tracing::debug!("Directory returned {} pending record(s)", body.items.len());
        Ok(body.items)
    }

    async fn set_validation_state(
        &self,
        organisation_id: &str,
        domain_name: &str,
        state: ValidationState,
    ) -> Result<()> {
        if organisation_id.is_empty() || domain_name.is_empty() {
            return Err(Error::invalid_input(
                "Organisation id and domain name cannot be empty",
            ));
        }

        tracing::debug!("Setting validation state of {} to {}", domain_name, state);

        let request = SetValidationStateRequest {
            organisation_id,
            domain_name,
            validation_state: state,
        };
        self.post("setDomainValidationState", &request).await?;

        Ok(())
    }
}

/// Factory for registry-based construction of [`HttpDomainDirectory`]
pub struct HttpDirectoryFactory;

impl DomainDirectoryFactory for HttpDirectoryFactory {
    fn create(&self, config: &DirectoryConfig) -> Result<Box<dyn DomainDirectory>> {
        match config {
            DirectoryConfig::Http {
                base_url,
                api_token,
                caller_name,
            } => Ok(Box::new(HttpDomainDirectory::new(
                base_url.clone(),
                api_token.clone(),
                caller_name.clone(),
            )?)),
            other => Err(Error::config(format!(
                "HTTP directory factory cannot build '{}' config",
                other.type_name()
            ))),
        }
    }
}

/// Register this crate's factory with a registry
pub fn register(registry: &ComponentRegistry) {
    registry.register_directory("http", Box::new(HttpDirectoryFactory));
}
