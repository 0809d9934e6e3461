//! Payments, transactions, fee estimates, coin selections and migrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use super::enums::{TxDirection, TxStatus};
use super::metadata::MetadataMap;
use super::quantity::{Amount, Quantity};
use super::wallet::MnemonicSentence;
use crate::error::ApiError;

/// One target output: address + amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub address: String,
    pub amount: Amount,
}

impl Payment {
    pub fn new(address: impl Into<String>, amount: Amount) -> Self { Self { address: address.into(), amount } }
}

/// Check a payment list before it is put on the wire.
pub(crate) fn validate_payments(payments: &[Payment]) -> Result<(), ApiError> {
    if payments.is_empty() {
        return Err(ApiError::InvalidRequest("at least one payment is required".into()));
    }
    if let Some(i) = payments.iter().position(|p| p.address.trim().is_empty()) {
        return Err(ApiError::InvalidRequest(format!("payment {i} has an empty address")));
    }
    Ok(())
}

/// Reward withdrawal instruction for outgoing transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Withdrawal {
    /// Withdraw the source wallet's own rewards (`"self"`).
    SelfWallet,
    /// Withdraw rewards of an external reward account given by its mnemonic.
    External(MnemonicSentence),
}

impl Serialize for Withdrawal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Withdrawal::SelfWallet => serializer.serialize_str("self"),
            Withdrawal::External(words) => words.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<TimedBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_since: Option<TimedBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Quantity<u64>>,
    pub direction: TxDirection,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    #[serde(default)]
    pub withdrawals: Vec<StakeWithdrawal>,
    pub status: TxStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedBlock {
    pub time: DateTime<Utc>,
    pub block: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub slot_number: u64,
    pub epoch_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Quantity<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_slot_number: Option<u64>,
}

/// Address and amount are only known for inputs the wallet owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub id: String,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeWithdrawal {
    pub stake_address: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateFeeResponse {
    pub estimated_min: Amount,
    pub estimated_max: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<Amount>,
}

/// Coin selection covering a set of payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundPaymentsResponse {
    pub inputs: Vec<CoinSelectionInput>,
    pub outputs: Vec<TxOutput>,
    #[serde(default)]
    pub change: Vec<CoinSelectionChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSelectionInput {
    pub id: String,
    pub index: u32,
    pub address: String,
    pub amount: Amount,
    #[serde(default)]
    pub derivation_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSelectionChange {
    pub address: String,
    pub amount: Amount,
    #[serde(default)]
    pub derivation_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostExternalTransactionResponse {
    pub id: String,
}

/// Cost of moving every fund out of a legacy wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationCostResponse {
    pub migration_cost: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leftovers: Option<Amount>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateTransactionBody {
    pub passphrase: String,
    pub payments: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal: Option<Withdrawal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EstimateFeeBody {
    pub payments: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal: Option<Withdrawal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PaymentsBody {
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MigrationBody {
    pub passphrase: String,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PassphraseBody {
    pub passphrase: String,
}
