use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use super::{BccClient, ClientConfig};
use crate::bridge::{Bridge, HttpExecutor, RequestExecutor};
use crate::error::ApiError;
use crate::request::Catalog;
use crate::runtime::ExecutionContext;

/// Assembles a [`BccClient`]. Omitted pieces are created at build time and
/// owned by the client. Building never contacts the network.
pub struct BccClientBuilder {
    config: ClientConfig,
    executor: Option<Arc<dyn RequestExecutor>>,
    runtime: Option<Handle>,
}

impl BccClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self { Self::from_config(ClientConfig::new(base_url)) }
    pub fn from_config(config: ClientConfig) -> Self { Self { config, executor: None, runtime: None } }

    /// Replace the HTTP transport entirely.
    pub fn with_executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self { self.executor = Some(executor); self }
    /// Run on the caller's runtime instead of an owned one.
    pub fn with_runtime(mut self, handle: Handle) -> Self { self.runtime = Some(handle); self }
    pub fn with_worker_threads(mut self, n: usize) -> Self { self.config = self.config.with_worker_threads(n); self }
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self { self.config = self.config.with_thread_name(name); self }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self { self.config = self.config.with_user_agent(ua); self }
    pub fn with_request_timeout(mut self, t: Duration) -> Self { self.config = self.config.with_request_timeout(t); self }

    pub fn config(&self) -> &ClientConfig { &self.config }

    pub fn build(self) -> Result<BccClient, ApiError> {
        let base = self.config.normalized_url()?;
        let executor: Arc<dyn RequestExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(HttpExecutor::new(&self.config.user_agent, self.config.request_timeout)?),
        };
        let context = match self.runtime {
            Some(handle) => ExecutionContext::external(handle),
            None => ExecutionContext::owned(self.config.worker_threads, &self.config.thread_name)?,
        };
        tracing::info!(base_url = %base, owns_runtime = context.owns_runtime(), "bcc client ready");
        Ok(BccClient::new(Catalog::new(base), Bridge::new(executor, Arc::new(context))))
    }
}

impl std::fmt::Debug for BccClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BccClientBuilder")
            .field("config", &self.config)
            .field("custom_executor", &self.executor.is_some())
            .field("external_runtime", &self.runtime.is_some())
            .finish()
    }
}
