//! ApiError - the single failure type every operation resolves to
//!
//! | Variant | Code | Raised |
//! |---------|------|--------|
//! | `InvalidRequest` | `INVALID_REQUEST` | before transmission |
//! | `InvalidAmount` | `INVALID_AMOUNT` | before transmission |
//! | `InvalidMetadata` | `INVALID_METADATA` | before transmission |
//! | `InvalidConfig` | `INVALID_CONFIG` | at build time |
//! | `Decode` | `DECODE` | response did not match the schema |
//! | `Api` | backend code | backend returned a structured error |
//! | `Transport` | `TRANSPORT` | connection / socket failure |
//! | `Unknown` | `UNKNOWN` | unclassifiable failure |
//! | `Closed` | `CLOSED` | client already shut down |

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const INVALID_AMOUNT: &str = "INVALID_AMOUNT";
pub const INVALID_METADATA: &str = "INVALID_METADATA";
pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
pub const DECODE: &str = "DECODE";
pub const TRANSPORT: &str = "TRANSPORT";
pub const UNKNOWN: &str = "UNKNOWN";
pub const CLOSED: &str = "CLOSED";

/// Structured error body returned by the wallet backend on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("cannot decode {entity}: {message}")]
    Decode { entity: String, message: String },

    #[error("api error {code}: {message}")]
    Api { status: Option<u16>, code: String, message: String },

    #[error("transport failure: {cause}")]
    Transport {
        #[source]
        cause: anyhow::Error,
    },

    #[error("unknown failure: {message}")]
    Unknown { status: Option<u16>, message: String },

    #[error("client is shut down")]
    Closed,
}

impl ApiError {
    pub fn decode(entity: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Decode { entity: entity.into(), message: message.to_string() }
    }

    pub fn transport(cause: impl Into<anyhow::Error>) -> Self {
        Self::Transport { cause: cause.into() }
    }

    pub fn unknown(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Unknown { status, message: message.into() }
    }

    /// Stable error code; the backend's own code for `Api`.
    pub fn code(&self) -> &str {
        match self {
            ApiError::InvalidRequest(_) => INVALID_REQUEST,
            ApiError::InvalidAmount(_) => INVALID_AMOUNT,
            ApiError::InvalidMetadata(_) => INVALID_METADATA,
            ApiError::InvalidConfig(_) => INVALID_CONFIG,
            ApiError::Decode { .. } => DECODE,
            ApiError::Api { code, .. } => code,
            ApiError::Transport { .. } => TRANSPORT,
            ApiError::Unknown { .. } => UNKNOWN,
            ApiError::Closed => CLOSED,
        }
    }

    /// Human message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest(m)
            | ApiError::InvalidAmount(m)
            | ApiError::InvalidMetadata(m)
            | ApiError::InvalidConfig(m) => m.clone(),
            ApiError::Decode { entity, message } => format!("{entity}: {message}"),
            ApiError::Api { message, .. } | ApiError::Unknown { message, .. } => message.clone(),
            ApiError::Transport { cause } => cause.to_string(),
            ApiError::Closed => "client is shut down".into(),
        }
    }

    /// HTTP status when the failure came from a backend response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Unknown { status, .. } => *status,
            _ => None,
        }
    }

    /// True for errors raised locally before any request was submitted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidRequest(_)
                | ApiError::InvalidAmount(_)
                | ApiError::InvalidMetadata(_)
                | ApiError::InvalidConfig(_)
        )
    }
}

impl From<ErrorMessage> for ApiError {
    fn from(msg: ErrorMessage) -> Self {
        ApiError::Api { status: None, code: msg.code, message: msg.message }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
