//! Codec: wire entities, validation and JSON (de)serialization.
//!
//! Every entity ignores unknown fields on decode. Required fields that are
//! missing, enum values outside the fixed set, negative amounts and malformed
//! metadata all fail decoding; the bridge reports them as `DECODE` errors
//! naming the entity.

pub mod enums;
pub mod metadata;
pub mod network;
pub mod quantity;
pub mod transaction;
pub mod wallet;

pub use enums::{AddressFilter, DelegationStatus, MaintenanceStatus, NtpStatus, Order, SyncState, TxDirection, TxStatus, Unit};
pub use metadata::{JsonMetadata, MetadataBuilder, MetadataMap, MetadataValue, TxMetadata};
pub use network::{
    GcStakePools, MaintenanceActions, NetworkClock, NetworkInfo, NetworkParameters, StakePool, StakePoolMetadata,
    StakePoolMetrics,
};
pub use quantity::{Amount, Quantity};
pub use transaction::{
    Block, CoinSelectionChange, CoinSelectionInput, EstimateFeeResponse, FundPaymentsResponse, MigrationCostResponse,
    Payment, PostExternalTransactionResponse, StakeWithdrawal, TimedBlock, Transaction, TxInput, TxOutput, Withdrawal,
};
pub use wallet::{
    Balance, Delegation, DelegationActive, DelegationNext, MnemonicSentence, NetworkTip, NextEpoch, Passphrase,
    SyncStatus, UtxoStatistics, Wallet, WalletAddress, WalletAddressId,
};

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a response body as `T`, naming `entity` on failure.
pub fn decode_json<T: DeserializeOwned>(entity: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::decode(entity, e))
}

/// Empty-bodied responses (204) carry nothing to decode.
pub fn decode_unit(_entity: &str, _body: &[u8]) -> Result<(), ApiError> { Ok(()) }
