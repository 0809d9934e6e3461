//! Client Configuration - passed from the host

use std::time::Duration;

use reqwest::Url;

use crate::error::ApiError;

pub const DEFAULT_THREAD_NAME: &str = "bcc-client";
pub const DEFAULT_USER_AGENT: &str = concat!("bcc-client/", env!("CARGO_PKG_VERSION"));

/// Client configuration. Only `base_url` is required.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Worker threads of the owned runtime; `None` uses tokio's default.
    pub worker_threads: Option<usize>,
    pub thread_name: String,
    pub user_agent: String,
    /// Applies to the default HTTP transport only.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            worker_threads: None,
            thread_name: DEFAULT_THREAD_NAME.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self { self.base_url = url.into(); self }
    pub fn with_worker_threads(mut self, n: usize) -> Self { self.worker_threads = Some(n); self }
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self { self.thread_name = name.into(); self }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self { self.user_agent = ua.into(); self }
    pub fn with_request_timeout(mut self, t: Duration) -> Self { self.request_timeout = Some(t); self }

    /// Parse `base_url`, trimming whitespace and forcing a trailing `/` so
    /// resource paths resolve under it (`.../v2` and `.../v2/` are equivalent).
    pub fn normalized_url(&self) -> Result<Url, ApiError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidConfig("base url must not be empty".into()));
        }
        let with_slash = if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{trimmed}/") };
        let url = Url::parse(&with_slash)
            .map_err(|e| ApiError::InvalidConfig(format!("invalid base url '{trimmed}': {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ApiError::InvalidConfig(format!("unsupported url scheme '{other}'"))),
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::InvalidConfig("base url must not carry a query or fragment".into()));
        }
        Ok(url)
    }
}
