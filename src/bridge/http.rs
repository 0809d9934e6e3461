//! Default transport over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::{ExecutorError, ExecutorResponse, RawResponse, RequestExecutor};
use crate::error::ApiError;
use crate::request::{ApiRequest, Body, Method};

#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
}

impl HttpExecutor {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("cannot build http client: {e}")))?;
        Ok(Self { client })
    }

    /// Reuse an already configured client (proxies, custom roots).
    pub fn with_client(client: reqwest::Client) -> Self { Self { client } }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: &ApiRequest) -> Result<ExecutorResponse, ExecutorError> {
        let mut builder = self
            .client
            .request(method(request.method()), request.url().clone())
            .header(ACCEPT, "application/json");
        builder = match request.body() {
            Some(Body::Json(value)) => builder.json(value),
            Some(Body::Bytes(bytes)) => builder.header(CONTENT_TYPE, "application/octet-stream").body(bytes.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| ExecutorError::Transport(e.into()))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| ExecutorError::Transport(e.into()))?;
        tracing::trace!(status, len = body.len(), url = %request.url(), "http response");
        Ok(RawResponse::new(status, body.to_vec()).into())
    }
}
