//! Client Facade: one method per wallet capability.
//!
//! Every method validates its input, builds the matching catalog request and
//! hands it to the bridge. Nothing blocks: the returned [`ApiFuture`] is
//! either already settled (validation failure, closed client) or backed by a
//! task on the client's runtime.
//!
//! | Area | Methods |
//! |------|---------|
//! | wallets | `create_restore*`, `get_wallet`, `list_wallets`, `update_*`, `delete_wallet`, `get_utxo_statistics` |
//! | transactions | `create_transaction*`, `estimate_fee*`, `fund_payments`, `get/delete/list_transaction(s)`, `post_external_transaction` |
//! | addresses | `list_addresses`, `inspect_address` |
//! | network | `network_info`, `network_clock*`, `network_parameters` |
//! | migrations | `migrate_sophie_wallet`, `get_sophie_wallet_migration_info` |
//! | stake pools | `list_stake_pools`, `estimate_fee_stake_pool`, `join/quit_stake_pool`, maintenance actions |

mod builder;
mod config;
mod params;

pub use builder::BccClientBuilder;
pub use config::{ClientConfig, DEFAULT_THREAD_NAME, DEFAULT_USER_AGENT};
pub use params::{ListTransactionsParams, TransactionOptions};

use reqwest::Url;

use crate::bridge::{ApiFuture, Bridge};
use crate::codec::{
    AddressFilter, EstimateFeeResponse, FundPaymentsResponse, MaintenanceActions, MigrationCostResponse,
    MnemonicSentence, NetworkClock, NetworkInfo, NetworkParameters, Payment, PostExternalTransactionResponse,
    StakePool, Transaction, UtxoStatistics, Wallet, WalletAddress, WalletAddressId, Withdrawal,
};
use crate::request::Catalog;
use crate::runtime::Shutdown;

/// Typed async client for the wallet backend. Cheap to clone; clones share
/// the executor and runtime.
#[derive(Debug, Clone)]
pub struct BccClient {
    catalog: Catalog,
    bridge: Bridge,
}

impl BccClient {
    pub fn builder(base_url: impl Into<String>) -> BccClientBuilder { BccClientBuilder::new(base_url) }

    pub(crate) fn new(catalog: Catalog, bridge: Bridge) -> Self { Self { catalog, bridge } }

    pub fn base_url(&self) -> &Url { self.catalog.base() }

    /// Stop accepting calls and release the owned runtime. In-flight calls on
    /// an owned runtime resolve to `CLOSED`; later calls fail with `CLOSED`.
    pub fn shutdown(&self) { self.bridge.context().shutdown() }

    pub fn is_closed(&self) -> bool { self.bridge.context().is_closed() }

    pub fn shutdown_signal(&self) -> Shutdown { self.bridge.context().shutdown_signal() }

    // ---- wallets ----

    pub fn create_restore(
        &self,
        name: &str,
        passphrase: &str,
        mnemonic_sentence: Vec<String>,
        address_pool_gap: Option<u32>,
    ) -> ApiFuture<Wallet> {
        self.bridge.execute(
            MnemonicSentence::new(mnemonic_sentence)
                .and_then(|words| self.catalog.create_restore(name, passphrase, words, None, address_pool_gap)),
        )
    }

    pub fn create_restore_with_second_factor(
        &self,
        name: &str,
        passphrase: &str,
        mnemonic_sentence: Vec<String>,
        mnemonic_second_factor: Vec<String>,
        address_pool_gap: Option<u32>,
    ) -> ApiFuture<Wallet> {
        let request = MnemonicSentence::new(mnemonic_sentence).and_then(|words| {
            let second = MnemonicSentence::second_factor(mnemonic_second_factor)?;
            self.catalog.create_restore(name, passphrase, words, Some(second), address_pool_gap)
        });
        self.bridge.execute(request)
    }

    /// Create a watch-only wallet from an extended account public key.
    pub fn create_restore_with_key(
        &self,
        name: &str,
        account_public_key: &str,
        address_pool_gap: Option<u32>,
    ) -> ApiFuture<Wallet> {
        self.bridge.execute(self.catalog.create_restore_with_key(name, account_public_key, address_pool_gap))
    }

    pub fn get_wallet(&self, wallet_id: &str) -> ApiFuture<Wallet> { self.bridge.execute(self.catalog.get_wallet(wallet_id)) }

    /// Oldest first.
    pub fn list_wallets(&self) -> ApiFuture<Vec<Wallet>> { self.bridge.execute(self.catalog.list_wallets()) }

    pub fn update_name(&self, wallet_id: &str, name: &str) -> ApiFuture<Wallet> {
        self.bridge.execute(self.catalog.update_name(wallet_id, name))
    }

    pub fn update_passphrase(&self, wallet_id: &str, old_passphrase: &str, new_passphrase: &str) -> ApiFuture<()> {
        self.bridge.execute(self.catalog.update_passphrase(wallet_id, old_passphrase, new_passphrase))
    }

    pub fn delete_wallet(&self, wallet_id: &str) -> ApiFuture<()> { self.bridge.execute(self.catalog.delete_wallet(wallet_id)) }

    pub fn get_utxo_statistics(&self, wallet_id: &str) -> ApiFuture<UtxoStatistics> {
        self.bridge.execute(self.catalog.get_utxo_statistics(wallet_id))
    }

    // ---- transactions ----

    /// Withdraws the wallet's own rewards (`"self"`) and attaches no metadata.
    pub fn create_transaction(&self, wallet_id: &str, passphrase: &str, payments: Vec<Payment>) -> ApiFuture<Transaction> {
        let options = TransactionOptions::new().with_withdrawal(Withdrawal::SelfWallet);
        self.create_transaction_with(wallet_id, passphrase, payments, options)
    }

    pub fn create_transaction_with(
        &self,
        wallet_id: &str,
        passphrase: &str,
        payments: Vec<Payment>,
        options: TransactionOptions,
    ) -> ApiFuture<Transaction> {
        let TransactionOptions { withdrawal, metadata } = options;
        self.bridge.execute(self.catalog.create_transaction(wallet_id, passphrase, payments, withdrawal, metadata.as_ref()))
    }

    /// Same defaults as [`create_transaction`](Self::create_transaction).
    pub fn estimate_fee(&self, wallet_id: &str, payments: Vec<Payment>) -> ApiFuture<EstimateFeeResponse> {
        let options = TransactionOptions::new().with_withdrawal(Withdrawal::SelfWallet);
        self.estimate_fee_with(wallet_id, payments, options)
    }

    pub fn estimate_fee_with(
        &self,
        wallet_id: &str,
        payments: Vec<Payment>,
        options: TransactionOptions,
    ) -> ApiFuture<EstimateFeeResponse> {
        let TransactionOptions { withdrawal, metadata } = options;
        self.bridge.execute(self.catalog.estimate_fee(wallet_id, payments, withdrawal, metadata.as_ref()))
    }

    /// Coin selection for `payments` without creating a transaction.
    pub fn fund_payments(&self, wallet_id: &str, payments: Vec<Payment>) -> ApiFuture<FundPaymentsResponse> {
        self.bridge.execute(self.catalog.fund_payments(wallet_id, payments))
    }

    pub fn get_transaction(&self, wallet_id: &str, transaction_id: &str) -> ApiFuture<Transaction> {
        self.bridge.execute(self.catalog.get_transaction(wallet_id, transaction_id))
    }

    /// Forget a pending transaction.
    pub fn delete_transaction(&self, wallet_id: &str, transaction_id: &str) -> ApiFuture<()> {
        self.bridge.execute(self.catalog.delete_transaction(wallet_id, transaction_id))
    }

    /// Returned in the order the backend sends, which follows `params.order`.
    pub fn list_transactions(&self, params: &ListTransactionsParams) -> ApiFuture<Vec<Transaction>> {
        self.bridge.execute(self.catalog.list_transactions(
            &params.wallet_id,
            params.start,
            params.end,
            params.order,
            params.min_withdrawal,
        ))
    }

    /// Submit an externally signed transaction, given as hex.
    pub fn post_external_transaction(&self, signed_tx_hex: &str) -> ApiFuture<PostExternalTransactionResponse> {
        self.bridge.execute(self.catalog.post_external_transaction(signed_tx_hex))
    }

    // ---- addresses ----

    /// Newest first. `None` lists used and unused addresses.
    pub fn list_addresses(&self, wallet_id: &str, state: Option<AddressFilter>) -> ApiFuture<Vec<WalletAddressId>> {
        self.bridge.execute(self.catalog.list_addresses(wallet_id, state))
    }

    pub fn inspect_address(&self, address_id: &str) -> ApiFuture<WalletAddress> {
        self.bridge.execute(self.catalog.inspect_address(address_id))
    }

    // ---- network ----

    pub fn network_info(&self) -> ApiFuture<NetworkInfo> { self.bridge.execute(self.catalog.network_info()) }

    pub fn network_clock(&self) -> ApiFuture<NetworkClock> { self.bridge.execute(self.catalog.network_clock(None)) }

    /// With `force_ntp_check` the backend blocks until a fresh NTP result is in.
    pub fn network_clock_with(&self, force_ntp_check: bool) -> ApiFuture<NetworkClock> {
        self.bridge.execute(self.catalog.network_clock(Some(force_ntp_check)))
    }

    pub fn network_parameters(&self) -> ApiFuture<NetworkParameters> {
        self.bridge.execute(self.catalog.network_parameters())
    }

    // ---- legacy wallet migration ----

    pub fn migrate_sophie_wallet(
        &self,
        wallet_id: &str,
        passphrase: &str,
        addresses: Vec<String>,
    ) -> ApiFuture<Vec<Transaction>> {
        self.bridge.execute(self.catalog.migrate_sophie_wallet(wallet_id, passphrase, addresses))
    }

    pub fn get_sophie_wallet_migration_info(&self, wallet_id: &str) -> ApiFuture<MigrationCostResponse> {
        self.bridge.execute(self.catalog.get_sophie_wallet_migration_info(wallet_id))
    }

    // ---- stake pools ----

    pub fn list_stake_pools(&self, stake: u64) -> ApiFuture<Vec<StakePool>> {
        self.bridge.execute(self.catalog.list_stake_pools(stake))
    }

    pub fn estimate_fee_stake_pool(&self, wallet_id: &str) -> ApiFuture<EstimateFeeResponse> {
        self.bridge.execute(self.catalog.estimate_fee_stake_pool(wallet_id))
    }

    pub fn join_stake_pool(&self, wallet_id: &str, stake_pool_id: &str, passphrase: &str) -> ApiFuture<Transaction> {
        self.bridge.execute(self.catalog.join_stake_pool(wallet_id, stake_pool_id, passphrase))
    }

    pub fn quit_stake_pool(&self, wallet_id: &str, passphrase: &str) -> ApiFuture<Transaction> {
        self.bridge.execute(self.catalog.quit_stake_pool(wallet_id, passphrase))
    }

    pub fn get_maintenance_actions(&self) -> ApiFuture<MaintenanceActions> {
        self.bridge.execute(self.catalog.get_maintenance_actions())
    }

    /// Trigger stake-pool garbage collection.
    pub fn post_maintenance_action(&self) -> ApiFuture<()> { self.bridge.execute(self.catalog.post_maintenance_action()) }
}
