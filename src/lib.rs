//! bcc-client: typed async client for the bcc wallet HTTP/JSON backend.
//!
//! # Architecture
//!
//! ```text
//! BccClient (facade, one method per operation)
//!   │
//!   ├── Catalog (request/)      typed request per operation: verb, path, query, body, decoder
//!   │
//!   ├── Bridge (bridge/)        submit once → RequestExecutor → Result<T, ApiError>
//!   │     ├── HttpExecutor      default transport (reqwest)
//!   │     └── ApiFuture<T>      awaitable result, resolves exactly once
//!   │
//!   ├── ExecutionContext        owned tokio runtime or caller Handle
//!   │
//!   └── codec/                  wire entities, metadata, validation
//! ```
//!
//! # Errors
//!
//! Every call resolves to `Result<T, ApiError>`. Input problems
//! (`INVALID_REQUEST`, `INVALID_AMOUNT`, `INVALID_METADATA`) are reported
//! without submitting anything; backend errors keep the backend's code.
//!
//! # Usage
//!
//! ```ignore
//! use bcc_client::{Amount, BccClient, Payment};
//!
//! let client = BccClient::builder("http://localhost:8090/v2").build()?;
//!
//! let wallet = client.get_wallet("2512a00e9653fe49a44a5886202e24d77eeb998f").await?;
//! println!("{} holds {}", wallet.name, wallet.balance.total.quantity);
//!
//! let payment = Payment::new("addr1...", Amount::entropic(1_000_000));
//! let tx = client.create_transaction(&wallet.id, "passphrase", vec![payment]).await?;
//!
//! client.shutdown();
//! ```

pub mod bridge;
pub mod client;
pub mod codec;
pub mod error;
pub mod logging;
pub mod request;
pub mod runtime;

pub use bridge::{ApiFuture, ExecutorError, ExecutorResponse, HttpExecutor, RawResponse, RequestExecutor};
pub use client::{BccClient, BccClientBuilder, ClientConfig, ListTransactionsParams, TransactionOptions};
pub use codec::*;
pub use error::{ApiError, ApiResult, ErrorMessage};
pub use logging::init_logging;
pub use request::{ApiRequest, Body, Method};
pub use runtime::Shutdown;
