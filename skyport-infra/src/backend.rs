//! Single-shot HTTP client shared by the catalog and ledger adapters.
//!
//! One call is one attempt. The response status is classified here and the
//! adapters decide which statuses mean something specific for their endpoint.

use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use skyport_core::{Backend, GatewayError};
use skyport_shared::{CallerIdentity, IDENTITY_HEADER};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request could not be encoded: {0}")]
    Encode(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("client error {status}")]
    ClientError { status: u16, body: String },
    #[error("server error {status}")]
    ServerError { status: u16, body: String },
    #[error("response did not match the expected shape: {0}")]
    Decode(String),
}

impl BackendError {
    /// HTTP status for 4xx/5xx outcomes.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::ClientError { status, .. } | BackendError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Raw downstream body for 4xx/5xx outcomes.
    pub fn body(&self) -> Option<&str> {
        match self {
            BackendError::ClientError { body, .. } | BackendError::ServerError { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// Default translation into the gateway taxonomy.
    pub fn into_gateway(self, backend: Backend) -> GatewayError {
        match self {
            BackendError::Transport(reason) => GatewayError::BackendUnavailable { backend, reason },
            BackendError::ClientError { status, body } | BackendError::ServerError { status, body } => {
                GatewayError::BackendRejected {
                    backend,
                    status,
                    body,
                }
            }
            BackendError::Decode(reason) | BackendError::Encode(reason) => {
                GatewayError::DecodeFailure { backend, reason }
            }
        }
    }
}

/// Immutable description of one downstream service.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub backend: Backend,
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(backend: Backend, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backend,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

/// One outbound call, built up before it is sent.
#[derive(Debug)]
pub struct BackendRequest<'a> {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
    identity: Option<&'a CallerIdentity>,
}

impl<'a> BackendRequest<'a> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            identity: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query pair. Repeating a key sends it repeatedly.
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, BackendError> {
        let value = serde_json::to_value(body).map_err(|e| BackendError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn identity(mut self, identity: &'a CallerIdentity) -> Self {
        self.identity = Some(identity);
        self
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: BackendConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Reuse an existing pool. The pool's own timeout applies.
    pub fn with_client(http: Client, config: BackendConfig) -> Self {
        Self { http, config }
    }

    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    /// Send and decode a 2xx payload into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: BackendRequest<'_>) -> Result<T, BackendError> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(backend = %self.config.backend, "Undecodable payload: {}", e);
            BackendError::Decode(e.to_string())
        })
    }

    /// Send and accept any 2xx without looking at the body.
    pub async fn execute(&self, request: BackendRequest<'_>) -> Result<(), BackendError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: BackendRequest<'_>) -> Result<Vec<u8>, BackendError> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let method = request.method.clone();

        let mut builder = self.http.request(request.method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(identity) = request.identity {
            // Raw bytes so that UTF-8 names are forwarded unchanged.
            let value = HeaderValue::from_bytes(identity.as_str().as_bytes())
                .map_err(|e| BackendError::Encode(e.to_string()))?;
            builder = builder.header(IDENTITY_HEADER, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(backend = %self.config.backend, %method, %url, "Transport failure: {}", e);
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        tracing::debug!(backend = %self.config.backend, %method, %url, status = status.as_u16(), "Backend call finished");

        classify(status, body.to_vec())
    }
}

fn classify(status: StatusCode, body: Vec<u8>) -> Result<Vec<u8>, BackendError> {
    if status.is_success() {
        return Ok(body);
    }

    let body = String::from_utf8_lossy(&body).into_owned();
    if status.is_client_error() {
        Err(BackendError::ClientError {
            status: status.as_u16(),
            body,
        })
    } else {
        Err(BackendError::ServerError {
            status: status.as_u16(),
            body,
        })
    }
}
