//! Wallet snapshots, addresses and the request bodies that create or change wallets.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AddressFilter, DelegationStatus, SyncState};
use super::quantity::{Amount, Quantity};
use crate::error::ApiError;

/// Accepted mnemonic sentence lengths.
pub const MNEMONIC_WORDS: std::ops::RangeInclusive<usize> = 15..=24;
pub const SECOND_FACTOR_WORDS: std::ops::RangeInclusive<usize> = 9..=12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub address_pool_gap: u32,
    pub balance: Balance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegation: Option<Delegation>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<Passphrase>,
    pub state: SyncStatus,
    pub tip: NetworkTip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub available: Amount,
    pub reward: Amount,
    pub total: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub active: DelegationActive,
    #[serde(default)]
    pub next: Vec<DelegationNext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationActive {
    pub status: DelegationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationNext {
    pub status: DelegationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_at: Option<NextEpoch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextEpoch {
    pub epoch_start_time: DateTime<Utc>,
    pub epoch_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passphrase {
    pub last_updated_at: DateTime<Utc>,
}

/// `progress` is present only while syncing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub status: SyncState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Quantity<f64>>,
}

impl SyncStatus {
    pub fn ready() -> Self { Self { status: SyncState::Ready, progress: None } }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkTip {
    pub epoch_number: u64,
    pub slot_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Quantity<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_slot_number: Option<u64>,
}

/// Address entry from `list_addresses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddressId {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AddressFilter>,
}

/// Structure of an address as reported by `inspect_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddress {
    pub address_style: String,
    pub stake_reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_tag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spending_key_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stake_key_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
}

/// UTxO histogram: bucket upper bound → number of outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoStatistics {
    pub total: Amount,
    pub scale: String,
    pub distribution: BTreeMap<u64, u64>,
}

/// Validated list of mnemonic words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MnemonicSentence(Vec<String>);

impl MnemonicSentence {
    pub fn new(words: Vec<String>) -> Result<Self, ApiError> { Self::checked(words, MNEMONIC_WORDS, "mnemonic sentence") }

    pub fn second_factor(words: Vec<String>) -> Result<Self, ApiError> {
        Self::checked(words, SECOND_FACTOR_WORDS, "mnemonic second factor")
    }

    fn checked(words: Vec<String>, range: std::ops::RangeInclusive<usize>, what: &str) -> Result<Self, ApiError> {
        if !range.contains(&words.len()) {
            return Err(ApiError::InvalidRequest(format!(
                "{what} must have {}..={} words, got {}",
                range.start(),
                range.end(),
                words.len()
            )));
        }
        if words.iter().any(|w| w.trim().is_empty()) {
            return Err(ApiError::InvalidRequest(format!("{what} contains an empty word")));
        }
        Ok(Self(words))
    }

    pub fn words(&self) -> &[String] { &self.0 }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateRestoreBody {
    pub name: String,
    pub passphrase: String,
    pub mnemonic_sentence: MnemonicSentence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic_second_factor: Option<MnemonicSentence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_pool_gap: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateWithKeyBody {
    pub name: String,
    pub account_public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_pool_gap: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateNameBody {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdatePassphraseBody {
    pub old_passphrase: String,
    pub new_passphrase: String,
}
