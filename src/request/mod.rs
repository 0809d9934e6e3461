//! Request Catalog: one declarative, typed request per wallet operation.
//!
//! ```text
//! Catalog::get_wallet("abc")
//!     │   template "wallets/{walletId}" + placeholder check
//!     ▼
//! Request<Wallet> { ApiRequest { GET, <base>/wallets/abc }, decoder }
//!     │
//!     ▼
//! Bridge → RequestExecutor
//! ```
//!
//! Placeholders are checked when the request is built, so a missing or empty
//! id fails with `INVALID_REQUEST` before any executor sees it.

mod catalog;

pub use catalog::Catalog;

use reqwest::Url;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Bytes(Vec<u8>),
}

/// Typed path placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    WalletId,
    TransactionId,
    StakePoolId,
    AddressId,
}

impl Placeholder {
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::WalletId => "walletId",
            Placeholder::TransactionId => "transactionId",
            Placeholder::StakePoolId => "stakePoolId",
            Placeholder::AddressId => "addressId",
        }
    }
}

/// Resource path relative to the versioned base URL, e.g. `wallets/{walletId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    pub const fn new(template: &'static str) -> Self { Self(template) }

    pub fn as_str(&self) -> &'static str { self.0 }

    /// Substitute placeholders, returning the path segments in order.
    pub fn render(&self, args: &[(Placeholder, &str)]) -> Result<Vec<String>, ApiError> {
        self.0
            .split('/')
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = args
                        .iter()
                        .find(|(p, _)| p.name() == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| ApiError::InvalidRequest(format!("missing path parameter '{name}' for {}", self.0)))?;
                    if value.trim().is_empty() {
                        return Err(ApiError::InvalidRequest(format!("path parameter '{name}' must not be empty")));
                    }
                    Ok(value.to_string())
                }
                None => Ok(segment.to_string()),
            })
            .collect()
    }
}

/// Untyped, fully resolved HTTP request handed to executors.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) operation: &'static str,
    pub(crate) method: Method,
    pub(crate) template: PathTemplate,
    pub(crate) url: Url,
    pub(crate) path: String,
    pub(crate) body: Option<Body>,
    pub(crate) entity: &'static str,
}

impl ApiRequest {
    /// Operation name, e.g. `getWallet`.
    pub fn operation(&self) -> &'static str { self.operation }
    pub fn method(&self) -> Method { self.method }
    pub fn template(&self) -> PathTemplate { self.template }
    /// Absolute URL including the query string.
    pub fn url(&self) -> &Url { &self.url }
    /// Path relative to the base URL, e.g. `wallets/abc/addresses`.
    pub fn path(&self) -> &str { &self.path }
    /// First path segment, e.g. `wallets`.
    pub fn resource(&self) -> &str { self.path.split('/').next().unwrap_or_default() }
    pub fn body(&self) -> Option<&Body> { self.body.as_ref() }
    /// Entity name used in decode errors.
    pub fn entity(&self) -> &'static str { self.entity }

    pub fn query(&self) -> Vec<(String, String)> {
        self.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url.query_pairs().find(|(k, _)| k == name).map(|(_, v)| v.into_owned())
    }
}

pub type Decoder<T> = fn(&str, &[u8]) -> Result<T, ApiError>;

/// An [`ApiRequest`] paired with the decoder for its success response.
pub struct Request<T> {
    api: ApiRequest,
    decoder: Decoder<T>,
}

impl<T> Request<T> {
    pub(crate) fn new(api: ApiRequest, decoder: Decoder<T>) -> Self { Self { api, decoder } }

    pub fn api(&self) -> &ApiRequest { &self.api }

    pub fn decode(&self, body: &[u8]) -> Result<T, ApiError> { (self.decoder)(self.api.entity, body) }
}

impl<T> std::fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request").field("api", &self.api).finish_non_exhaustive()
    }
}
