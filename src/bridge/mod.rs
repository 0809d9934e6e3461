//! Execution Bridge: runs a typed [`Request`] through a pluggable
//! [`RequestExecutor`] and resolves it to `Result<T, ApiError>`.
//!
//! ```text
//! Request<T> ──spawn──► executor.execute(&ApiRequest)
//!                            │
//!            ┌───────────────┼──────────────────┬───────────────────┐
//!            ▼               ▼                  ▼                   ▼
//!     Raw 2xx → decode   Raw non-2xx →     Decoded(Box<Any>)   Transport(err)
//!     (DECODE on fail)   ErrorMessage body   → downcast T        → TRANSPORT
//!                        or UNKNOWN
//! ```
//!
//! Each call submits its request exactly once. No retries.

mod future;
mod http;

pub use future::ApiFuture;
pub use http::HttpExecutor;

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{ApiError, ErrorMessage};
use crate::request::{ApiRequest, Request};
use crate::runtime::ExecutionContext;

/// Undecoded backend answer: status plus raw body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self { Self { status, body: body.into() } }
    pub fn json(status: u16, body: &serde_json::Value) -> Self { Self::new(status, body.to_string()) }
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// What an executor hands back on a completed exchange.
pub enum ExecutorResponse {
    Raw(RawResponse),
    /// Already decoded by the executor; must be the request's result type.
    Decoded(Box<dyn Any + Send>),
}

impl ExecutorResponse {
    pub fn decoded<T: Send + 'static>(value: T) -> Self { Self::Decoded(Box::new(value)) }
}

impl From<RawResponse> for ExecutorResponse {
    fn from(raw: RawResponse) -> Self { Self::Raw(raw) }
}

impl std::fmt::Debug for ExecutorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorResponse::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
            ExecutorResponse::Decoded(_) => f.write_str("Decoded(..)"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Connection refused, timeout, truncated response.
    #[error(transparent)]
    Transport(anyhow::Error),

    /// The executor already parsed a structured backend error.
    #[error("{}: {}", .0.code, .0.message)]
    Api(ErrorMessage),
}

/// The single capability the bridge needs from a transport.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ExecutorResponse, ExecutorError>;
}

#[derive(Clone)]
pub struct Bridge {
    executor: Arc<dyn RequestExecutor>,
    context: Arc<ExecutionContext>,
}

impl Bridge {
    pub fn new(executor: Arc<dyn RequestExecutor>, context: Arc<ExecutionContext>) -> Self { Self { executor, context } }

    pub fn context(&self) -> &Arc<ExecutionContext> { &self.context }

    /// Submit a built request. Build failures resolve immediately without
    /// touching the executor.
    pub fn execute<T: Send + 'static>(&self, request: Result<Request<T>, ApiError>) -> ApiFuture<T> {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(code = e.code(), error = %e, "request rejected before submission");
                return ApiFuture::ready(Err(e));
            }
        };
        let api = request.api();
        tracing::debug!(operation = api.operation(), method = %api.method(), path = api.path(), "submitting request");
        match self.context.spawn(run(self.executor.clone(), request)) {
            Ok(handle) => ApiFuture::spawned(handle),
            Err(e) => ApiFuture::ready(Err(e)),
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge").field("context", &self.context).finish_non_exhaustive()
    }
}

async fn run<T: Send + 'static>(executor: Arc<dyn RequestExecutor>, request: Request<T>) -> Result<T, ApiError> {
    let outcome = executor.execute(request.api()).await;
    let result = classify(&request, outcome);
    let operation = request.api().operation();
    match &result {
        Ok(_) => tracing::debug!(operation, "request succeeded"),
        Err(e) => tracing::warn!(operation, code = e.code(), error = %e, "request failed"),
    }
    result
}

/// Map an executor outcome onto the request's result type.
pub fn classify<T: 'static>(
    request: &Request<T>,
    outcome: Result<ExecutorResponse, ExecutorError>,
) -> Result<T, ApiError> {
    match outcome {
        Err(ExecutorError::Transport(cause)) => Err(ApiError::transport(cause)),
        Err(ExecutorError::Api(message)) => Err(message.into()),
        Ok(ExecutorResponse::Decoded(value)) => value.downcast::<T>().map(|v| *v).map_err(|_| {
            ApiError::decode(
                request.api().entity(),
                format!("executor returned a pre-decoded value of the wrong type for {}", request.api().operation()),
            )
        }),
        Ok(ExecutorResponse::Raw(raw)) if raw.is_success() => request.decode(&raw.body),
        Ok(ExecutorResponse::Raw(raw)) => Err(error_from_body(raw.status, &raw.body)),
    }
}

fn error_from_body(status: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorMessage>(body) {
        Ok(m) => ApiError::Api { status: Some(status), code: m.code, message: m.message },
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            let message = if text.is_empty() { format!("HTTP {status} with empty body") } else { text };
            ApiError::unknown(Some(status), message)
        }
    }
}
