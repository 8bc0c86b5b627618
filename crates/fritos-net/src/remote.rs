//! Remote calls
//!
//! The request itself runs on a blocking reqwest client inside smol's
//! blocking pool. The caller's timeout is a `smol::Timer` raced against it;
//! whichever finishes first decides the outcome.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{NetConfig, RemoteError};

/// Timeout used when the caller gives none
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Everything about a call except the URL and the callbacks
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl Default for RemoteRequest {
    fn default() -> Self {
        Self {
            method: Method::Get,
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RemoteRequest {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self { method: Method::Post, ..Default::default() }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn with_json(self, json: &str) -> Self {
        self.with_header("Content-Type", "application/json").with_body(json)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Response payload: parsed JSON, or the raw text when it is not JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RemoteData {
    Json(serde_json::Value),
    Text(String),
}

impl RemoteData {
    /// Parse a response body, falling back to text
    pub fn parse(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(_) => None,
        }
    }
}

pub type SuccessCallback = Box<dyn FnOnce(RemoteData) + Send>;
pub type ErrorCallback = Box<dyn FnOnce(RemoteError) + Send>;

/// Options for `remote_call`
#[derive(Default)]
pub struct RemoteCallOptions {
    pub request: RemoteRequest,
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl RemoteCallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request = self.request.with_header(key, value);
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.request = self.request.with_body(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = timeout;
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    pub fn on_success(mut self, callback: impl FnOnce(RemoteData) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(RemoteError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Run whichever callback fits the outcome
    fn settle(self, result: Result<RemoteData, RemoteError>) {
        match result {
            Ok(data) => {
                if let Some(callback) = self.on_success {
                    callback(data);
                }
            }
            Err(error) => {
                if let Some(callback) = self.on_error {
                    callback(error);
                }
            }
        }
    }
}

impl fmt::Debug for RemoteCallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCallOptions")
            .field("request", &self.request)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// HTTP client for remote calls
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::blocking::Client,
    config: NetConfig,
}

impl RemoteClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_config(NetConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: NetConfig) -> Result<Self, RemoteError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RemoteError::Client(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Perform one request. Resolves to `Timeout` once `request.timeout`
    /// passes, even if the request is still in flight.
    ///
    /// The abandoned request is not cancelled at that instant: its socket
    /// stays open until the HTTP layer's own deadline of `request.timeout`
    /// plus `NetConfig::timeout_grace` expires.
    pub async fn send(&self, url: &str, request: &RemoteRequest) -> Result<RemoteData, RemoteError> {
        let parsed = Url::parse(url).map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", url, e)))?;
        tracing::info!("HTTP {} {}", request.method.as_str(), parsed);

        let mut builder = self
            .http
            .request(request.method.into(), parsed)
            .timeout(request.timeout.saturating_add(self.config.timeout_grace));
        for (name, value) in self.config.default_headers.iter().chain(&request.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let timeout = request.timeout;
        let call = smol::unblock(move || execute(builder));
        let timer = async move {
            smol::Timer::after(timeout).await;
            Err(RemoteError::Timeout(timeout))
        };
        smol::future::or(call, timer).await
    }

    /// Fire-and-forget: spawn the call on smol's global executor
    pub fn spawn(&self, url: &str, options: RemoteCallOptions) {
        let client = self.clone();
        let url = url.to_string();
        smol::spawn(async move {
            let result = client.send(&url, &options.request).await;
            match &result {
                Ok(_) => tracing::debug!("Remote call to {} succeeded", url),
                Err(e) => tracing::warn!("Remote call to {} failed: {}", url, e),
            }
            options.settle(result);
        })
        .detach();
    }
}

fn execute(builder: reqwest::blocking::RequestBuilder) -> Result<RemoteData, RemoteError> {
    let response = builder.send().map_err(|e| RemoteError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let body = response.text().map_err(|e| RemoteError::Network(e.to_string()))?;
    Ok(RemoteData::parse(body))
}

/// Await one request with a default client
pub async fn fetch_remote(url: &str, request: &RemoteRequest) -> Result<RemoteData, RemoteError> {
    RemoteClient::new()?.send(url, request).await
}

/// Start a remote call and return immediately. Exactly one of the option's
/// callbacks runs later, on a background thread.
pub fn remote_call(url: &str, options: RemoteCallOptions) {
    match RemoteClient::new() {
        Ok(client) => client.spawn(url, options),
        Err(e) => {
            tracing::warn!("Remote call to {} failed: {}", url, e);
            options.settle(Err(e));
        }
    }
}
