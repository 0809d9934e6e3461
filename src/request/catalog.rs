use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;
use serde::Serialize;

use super::{ApiRequest, Body, Decoder, Method, PathTemplate, Placeholder, Request};
use crate::codec::transaction::{
    validate_payments, CreateTransactionBody, EstimateFeeBody, MigrationBody, PassphraseBody, PaymentsBody,
};
use crate::codec::wallet::{CreateRestoreBody, CreateWithKeyBody, UpdateNameBody, UpdatePassphraseBody};
use crate::codec::network::MaintenanceActionBody;
use crate::codec::{
    decode_json, decode_unit, AddressFilter, EstimateFeeResponse, FundPaymentsResponse, MaintenanceActions,
    MigrationCostResponse, MnemonicSentence, NetworkClock, NetworkInfo, NetworkParameters, Order, Payment,
    PostExternalTransactionResponse, StakePool, Transaction, TxMetadata, UtxoStatistics, Wallet, WalletAddress,
    WalletAddressId, Withdrawal,
};
use crate::error::ApiError;

/// Static description of one backend operation.
struct Endpoint {
    operation: &'static str,
    method: Method,
    template: PathTemplate,
    entity: &'static str,
}

const fn endpoint(
    operation: &'static str,
    method: Method,
    template: &'static str,
    entity: &'static str,
) -> Endpoint {
    Endpoint { operation, method, template: PathTemplate::new(template), entity }
}

use Method::{Delete, Get, Post, Put};

const POST_WALLET: Endpoint = endpoint("postWallet", Post, "wallets", "Wallet");
const GET_WALLET: Endpoint = endpoint("getWallet", Get, "wallets/{walletId}", "Wallet");
const LIST_WALLETS: Endpoint = endpoint("listWallets", Get, "wallets", "Wallet list");
const PUT_WALLET: Endpoint = endpoint("putWallet", Put, "wallets/{walletId}", "Wallet");
const PUT_PASSPHRASE: Endpoint = endpoint("putWalletPassphrase", Put, "wallets/{walletId}/passphrase", "passphrase update");
const DELETE_WALLET: Endpoint = endpoint("deleteWallet", Delete, "wallets/{walletId}", "wallet deletion");
const UTXO_STATISTICS: Endpoint =
    endpoint("getUTxOsStatistics", Get, "wallets/{walletId}/statistics/utxos", "UtxoStatistics");

const POST_TRANSACTION: Endpoint = endpoint("postTransaction", Post, "wallets/{walletId}/transactions", "Transaction");
const PAYMENT_FEES: Endpoint =
    endpoint("postTransactionFee", Post, "wallets/{walletId}/payment-fees", "EstimateFeeResponse");
const COIN_SELECTION: Endpoint =
    endpoint("selectCoins", Post, "wallets/{walletId}/coin-selections/random", "FundPaymentsResponse");
const GET_TRANSACTION: Endpoint =
    endpoint("getTransaction", Get, "wallets/{walletId}/transactions/{transactionId}", "Transaction");
const DELETE_TRANSACTION: Endpoint =
    endpoint("deleteTransaction", Delete, "wallets/{walletId}/transactions/{transactionId}", "transaction deletion");
const LIST_TRANSACTIONS: Endpoint =
    endpoint("listTransactions", Get, "wallets/{walletId}/transactions", "Transaction list");
const POST_EXTERNAL: Endpoint =
    endpoint("postExternalTransaction", Post, "proxy/transactions", "PostExternalTransactionResponse");

const LIST_ADDRESSES: Endpoint = endpoint("listAddresses", Get, "wallets/{walletId}/addresses", "Address list");
const INSPECT_ADDRESS: Endpoint = endpoint("inspectAddress", Get, "addresses/{addressId}", "WalletAddress");

const NETWORK_INFO: Endpoint = endpoint("getNetworkInformation", Get, "network/information", "NetworkInfo");
const NETWORK_CLOCK: Endpoint = endpoint("getNetworkClock", Get, "network/clock", "NetworkClock");
const NETWORK_PARAMETERS: Endpoint =
    endpoint("getNetworkParameters", Get, "network/parameters", "NetworkParameters");

const MIGRATE_WALLET: Endpoint =
    endpoint("migrateSophieWallet", Post, "wallets/{walletId}/migrations", "Transaction list");
const MIGRATION_INFO: Endpoint =
    endpoint("getSophieWalletMigrationInfo", Get, "wallets/{walletId}/migrations", "MigrationCostResponse");

const LIST_STAKE_POOLS: Endpoint = endpoint("listStakePools", Get, "stake-pools", "StakePool list");
const DELEGATION_FEE: Endpoint =
    endpoint("getDelegationFee", Get, "wallets/{walletId}/delegation-fees", "EstimateFeeResponse");
const JOIN_STAKE_POOL: Endpoint =
    endpoint("joinStakePool", Put, "stake-pools/{stakePoolId}/wallets/{walletId}", "Transaction");
const QUIT_STAKE_POOL: Endpoint = endpoint("quitStakePool", Delete, "stake-pools/*/wallets/{walletId}", "Transaction");
const GET_MAINTENANCE: Endpoint =
    endpoint("getMaintenanceActions", Get, "stake-pools/maintenance-actions", "MaintenanceActions");
const POST_MAINTENANCE: Endpoint =
    endpoint("postMaintenanceAction", Post, "stake-pools/maintenance-actions", "maintenance action");

fn json_body<B: Serialize>(body: &B) -> Result<Option<Body>, ApiError> {
    serde_json::to_value(body)
        .map(|v| Some(Body::Json(v)))
        .map_err(|e| ApiError::InvalidRequest(format!("cannot encode request body: {e}")))
}

fn timestamp(t: &DateTime<Utc>) -> String { t.to_rfc3339_opts(SecondsFormat::Secs, true) }

fn encode_metadata(metadata: Option<&TxMetadata>) -> Result<Option<serde_json::Value>, ApiError> {
    metadata.map(TxMetadata::encode).transpose()
}

/// Every backend operation as a typed request factory over one base URL.
#[derive(Debug, Clone)]
pub struct Catalog {
    base: Url,
}

impl Catalog {
    /// `base` must end in `/` so relative paths land under it.
    pub fn new(base: Url) -> Self { Self { base } }

    pub fn base(&self) -> &Url { &self.base }

    fn build<T>(
        &self,
        endpoint: &Endpoint,
        args: &[(Placeholder, &str)],
        query: &[(&str, String)],
        body: Option<Body>,
        decoder: Decoder<T>,
    ) -> Result<Request<T>, ApiError> {
        let segments = endpoint.template.render(args)?;
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidConfig(format!("base url {} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(&segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        let api = ApiRequest {
            operation: endpoint.operation,
            method: endpoint.method,
            template: endpoint.template,
            url,
            path: segments.join("/"),
            body,
            entity: endpoint.entity,
        };
        Ok(Request::new(api, decoder))
    }

    // ---- wallets ----

    pub fn create_restore(
        &self,
        name: &str,
        passphrase: &str,
        mnemonic_sentence: MnemonicSentence,
        mnemonic_second_factor: Option<MnemonicSentence>,
        address_pool_gap: Option<u32>,
    ) -> Result<Request<Wallet>, ApiError> {
        let body = json_body(&CreateRestoreBody {
            name: name.to_string(),
            passphrase: passphrase.to_string(),
            mnemonic_sentence,
            mnemonic_second_factor,
            address_pool_gap,
        })?;
        self.build(&POST_WALLET, &[], &[], body, decode_json)
    }

    pub fn create_restore_with_key(
        &self,
        name: &str,
        account_public_key: &str,
        address_pool_gap: Option<u32>,
    ) -> Result<Request<Wallet>, ApiError> {
        if account_public_key.trim().is_empty() {
            return Err(ApiError::InvalidRequest("account public key must not be empty".into()));
        }
        let body = json_body(&CreateWithKeyBody {
            name: name.to_string(),
            account_public_key: account_public_key.to_string(),
            address_pool_gap,
        })?;
        self.build(&POST_WALLET, &[], &[], body, decode_json)
    }

    pub fn get_wallet(&self, wallet_id: &str) -> Result<Request<Wallet>, ApiError> {
        self.build(&GET_WALLET, &[(Placeholder::WalletId, wallet_id)], &[], None, decode_json)
    }

    pub fn list_wallets(&self) -> Result<Request<Vec<Wallet>>, ApiError> {
        self.build(&LIST_WALLETS, &[], &[], None, decode_json)
    }

    pub fn update_name(&self, wallet_id: &str, name: &str) -> Result<Request<Wallet>, ApiError> {
        let body = json_body(&UpdateNameBody { name: name.to_string() })?;
        self.build(&PUT_WALLET, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_json)
    }

    pub fn update_passphrase(
        &self,
        wallet_id: &str,
        old_passphrase: &str,
        new_passphrase: &str,
    ) -> Result<Request<()>, ApiError> {
        let body = json_body(&UpdatePassphraseBody {
            old_passphrase: old_passphrase.to_string(),
            new_passphrase: new_passphrase.to_string(),
        })?;
        self.build(&PUT_PASSPHRASE, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_unit)
    }

    pub fn delete_wallet(&self, wallet_id: &str) -> Result<Request<()>, ApiError> {
        self.build(&DELETE_WALLET, &[(Placeholder::WalletId, wallet_id)], &[], None, decode_unit)
    }

    pub fn get_utxo_statistics(&self, wallet_id: &str) -> Result<Request<UtxoStatistics>, ApiError> {
        self.build(&UTXO_STATISTICS, &[(Placeholder::WalletId, wallet_id)], &[], None, decode_json)
    }

    // ---- transactions ----

    pub fn create_transaction(
        &self,
        wallet_id: &str,
        passphrase: &str,
        payments: Vec<Payment>,
        withdrawal: Option<Withdrawal>,
        metadata: Option<&TxMetadata>,
    ) -> Result<Request<Transaction>, ApiError> {
        validate_payments(&payments)?;
        let body = json_body(&CreateTransactionBody {
            passphrase: passphrase.to_string(),
            payments,
            withdrawal,
            metadata: encode_metadata(metadata)?,
        })?;
        self.build(&POST_TRANSACTION, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_json)
    }

    pub fn estimate_fee(
        &self,
        wallet_id: &str,
        payments: Vec<Payment>,
        withdrawal: Option<Withdrawal>,
        metadata: Option<&TxMetadata>,
    ) -> Result<Request<EstimateFeeResponse>, ApiError> {
        validate_payments(&payments)?;
        let body = json_body(&EstimateFeeBody { payments, withdrawal, metadata: encode_metadata(metadata)? })?;
        self.build(&PAYMENT_FEES, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_json)
    }

    pub fn fund_payments(
        &self,
        wallet_id: &str,
        payments: Vec<Payment>,
    ) -> Result<Request<FundPaymentsResponse>, ApiError> {
        validate_payments(&payments)?;
        let body = json_body(&PaymentsBody { payments })?;
        self.build(&COIN_SELECTION, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_json)
    }

    pub fn get_transaction(&self, wallet_id: &str, transaction_id: &str) -> Result<Request<Transaction>, ApiError> {
        let args = [(Placeholder::WalletId, wallet_id), (Placeholder::TransactionId, transaction_id)];
        self.build(&GET_TRANSACTION, &args, &[], None, decode_json)
    }

    pub fn delete_transaction(&self, wallet_id: &str, transaction_id: &str) -> Result<Request<()>, ApiError> {
        let args = [(Placeholder::WalletId, wallet_id), (Placeholder::TransactionId, transaction_id)];
        self.build(&DELETE_TRANSACTION, &args, &[], None, decode_unit)
    }

    /// Absent bounds are left out of the query; `order` is always sent.
    pub fn list_transactions(
        &self,
        wallet_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        order: Order,
        min_withdrawal: Option<u64>,
    ) -> Result<Request<Vec<Transaction>>, ApiError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ApiError::InvalidRequest(format!("start {} is after end {}", timestamp(&s), timestamp(&e))));
            }
        }
        if min_withdrawal == Some(0) {
            return Err(ApiError::InvalidRequest("minWithdrawal must be at least 1".into()));
        }
        let mut query = Vec::with_capacity(4);
        if let Some(s) = start {
            query.push(("start", timestamp(&s)));
        }
        if let Some(e) = end {
            query.push(("end", timestamp(&e)));
        }
        query.push(("order", order.as_str().to_string()));
        if let Some(m) = min_withdrawal {
            query.push(("minWithdrawal", m.to_string()));
        }
        self.build(&LIST_TRANSACTIONS, &[(Placeholder::WalletId, wallet_id)], &query, None, decode_json)
    }

    /// `signed_tx_hex` is the hex-encoded signed transaction; it goes out as raw bytes.
    pub fn post_external_transaction(
        &self,
        signed_tx_hex: &str,
    ) -> Result<Request<PostExternalTransactionResponse>, ApiError> {
        let payload = signed_tx_hex.trim();
        if payload.is_empty() {
            return Err(ApiError::InvalidRequest("signed transaction must not be empty".into()));
        }
        let bytes = hex::decode(payload)
            .map_err(|e| ApiError::InvalidRequest(format!("signed transaction is not valid hex: {e}")))?;
        self.build(&POST_EXTERNAL, &[], &[], Some(Body::Bytes(bytes)), decode_json)
    }

    // ---- addresses ----

    pub fn list_addresses(
        &self,
        wallet_id: &str,
        state: Option<AddressFilter>,
    ) -> Result<Request<Vec<WalletAddressId>>, ApiError> {
        let query: Vec<_> = state.map(|s| ("state", s.as_str().to_string())).into_iter().collect();
        self.build(&LIST_ADDRESSES, &[(Placeholder::WalletId, wallet_id)], &query, None, decode_json)
    }

    pub fn inspect_address(&self, address_id: &str) -> Result<Request<WalletAddress>, ApiError> {
        self.build(&INSPECT_ADDRESS, &[(Placeholder::AddressId, address_id)], &[], None, decode_json)
    }

    // ---- network ----

    pub fn network_info(&self) -> Result<Request<NetworkInfo>, ApiError> {
        self.build(&NETWORK_INFO, &[], &[], None, decode_json)
    }

    pub fn network_clock(&self, force_ntp_check: Option<bool>) -> Result<Request<NetworkClock>, ApiError> {
        let query: Vec<_> = force_ntp_check.map(|f| ("forceNtpCheck", f.to_string())).into_iter().collect();
        self.build(&NETWORK_CLOCK, &[], &query, None, decode_json)
    }

    pub fn network_parameters(&self) -> Result<Request<NetworkParameters>, ApiError> {
        self.build(&NETWORK_PARAMETERS, &[], &[], None, decode_json)
    }

    // ---- legacy wallet migration ----

    pub fn migrate_sophie_wallet(
        &self,
        wallet_id: &str,
        passphrase: &str,
        addresses: Vec<String>,
    ) -> Result<Request<Vec<Transaction>>, ApiError> {
        if addresses.is_empty() {
            return Err(ApiError::InvalidRequest("at least one migration address is required".into()));
        }
        if addresses.iter().any(|a| a.trim().is_empty()) {
            return Err(ApiError::InvalidRequest("migration addresses must not be empty".into()));
        }
        let body = json_body(&MigrationBody { passphrase: passphrase.to_string(), addresses })?;
        self.build(&MIGRATE_WALLET, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_json)
    }

    pub fn get_sophie_wallet_migration_info(
        &self,
        wallet_id: &str,
    ) -> Result<Request<MigrationCostResponse>, ApiError> {
        self.build(&MIGRATION_INFO, &[(Placeholder::WalletId, wallet_id)], &[], None, decode_json)
    }

    // ---- stake pools ----

    /// `stake` is the amount (entropic) used to rank pools by expected rewards.
    pub fn list_stake_pools(&self, stake: u64) -> Result<Request<Vec<StakePool>>, ApiError> {
        self.build(&LIST_STAKE_POOLS, &[], &[("stake", stake.to_string())], None, decode_json)
    }

    pub fn estimate_fee_stake_pool(&self, wallet_id: &str) -> Result<Request<EstimateFeeResponse>, ApiError> {
        self.build(&DELEGATION_FEE, &[(Placeholder::WalletId, wallet_id)], &[], None, decode_json)
    }

    pub fn join_stake_pool(
        &self,
        wallet_id: &str,
        stake_pool_id: &str,
        passphrase: &str,
    ) -> Result<Request<Transaction>, ApiError> {
        let body = json_body(&PassphraseBody { passphrase: passphrase.to_string() })?;
        let args = [(Placeholder::StakePoolId, stake_pool_id), (Placeholder::WalletId, wallet_id)];
        self.build(&JOIN_STAKE_POOL, &args, &[], body, decode_json)
    }

    pub fn quit_stake_pool(&self, wallet_id: &str, passphrase: &str) -> Result<Request<Transaction>, ApiError> {
        let body = json_body(&PassphraseBody { passphrase: passphrase.to_string() })?;
        self.build(&QUIT_STAKE_POOL, &[(Placeholder::WalletId, wallet_id)], &[], body, decode_json)
    }

    pub fn get_maintenance_actions(&self) -> Result<Request<MaintenanceActions>, ApiError> {
        self.build(&GET_MAINTENANCE, &[], &[], None, decode_json)
    }

    pub fn post_maintenance_action(&self) -> Result<Request<()>, ApiError> {
        let body = json_body(&MaintenanceActionBody::gc_stake_pools())?;
        self.build(&POST_MAINTENANCE, &[], &[], body, decode_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Amount, MetadataMap};
    use chrono::TimeZone;
    use serde_json::json;

    fn catalog() -> Catalog { Catalog::new(Url::parse("http://localhost:8090/v2/").unwrap()) }

    fn words(n: usize) -> MnemonicSentence { MnemonicSentence::new((0..n).map(|i| format!("w{i}")).collect()).unwrap() }

    fn json_of(request: &ApiRequest) -> &serde_json::Value {
        match request.body() {
            Some(Body::Json(v)) => v,
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[test]
    fn test_get_wallet_url() {
        let req = catalog().get_wallet("abc").unwrap();
        let api = req.api();
        assert_eq!(api.method(), Method::Get);
        assert_eq!(api.url().as_str(), "http://localhost:8090/v2/wallets/abc");
        assert_eq!(api.path(), "wallets/abc");
        assert_eq!(api.resource(), "wallets");
        assert_eq!(api.operation(), "getWallet");
    }

    #[test]
    fn test_empty_wallet_id_rejected() {
        let err = catalog().get_wallet("").unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_REQUEST);
    }

    #[test]
    fn test_path_values_are_escaped() {
        let req = catalog().get_wallet("a/b c").unwrap();
        assert_eq!(req.api().url().as_str(), "http://localhost:8090/v2/wallets/a%2Fb%20c");
    }

    #[test]
    fn test_create_restore_body() {
        let req = catalog().create_restore("w", "password10", words(15), None, Some(20)).unwrap();
        let body = json_of(req.api());
        assert_eq!(body["name"], "w");
        assert_eq!(body["address_pool_gap"], 20);
        assert!(body.get("mnemonic_second_factor").is_none());
        assert_eq!(req.api().method(), Method::Post);
    }

    #[test]
    fn test_create_transaction_body() {
        let metadata: TxMetadata = MetadataMap::new().with(1, "hello").unwrap().into();
        let req = catalog()
            .create_transaction(
                "w1",
                "secret",
                vec![Payment::new("addr1", Amount::entropic(5))],
                Some(Withdrawal::SelfWallet),
                Some(&metadata),
            )
            .unwrap();
        let body = json_of(req.api());
        assert_eq!(body["withdrawal"], "self");
        assert_eq!(body["payments"][0]["amount"], json!({"quantity": 5, "unit": "entropic"}));
        assert_eq!(body["metadata"], json!({"1": {"string": "hello"}}));
        assert_eq!(req.api().path(), "wallets/w1/transactions");
    }

    #[test]
    fn test_empty_payments_rejected() {
        let err = catalog().estimate_fee("w1", vec![], None, None).unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_REQUEST);
    }

    #[test]
    fn test_list_transactions_query() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let req = catalog().list_transactions("w1", Some(start), None, Order::Ascending, Some(10)).unwrap();
        let api = req.api();
        assert_eq!(api.query_param("start").as_deref(), Some("2020-01-01T00:00:00Z"));
        assert_eq!(api.query_param("end"), None);
        assert_eq!(api.query_param("order").as_deref(), Some("ascending"));
        assert_eq!(api.query_param("minWithdrawal").as_deref(), Some("10"));
    }

    #[test]
    fn test_list_transactions_rejects_inverted_range() {
        let start = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(catalog().list_transactions("w1", Some(start), Some(end), Order::Descending, None).is_err());
    }

    #[test]
    fn test_list_addresses_filter_optional() {
        let all = catalog().list_addresses("w1", None).unwrap();
        assert!(all.api().query().is_empty());
        let used = catalog().list_addresses("w1", Some(AddressFilter::Used)).unwrap();
        assert_eq!(used.api().url().query(), Some("state=used"));
    }

    #[test]
    fn test_external_transaction_is_binary() {
        let req = catalog().post_external_transaction("deadbeef").unwrap();
        assert_eq!(req.api().body(), Some(&Body::Bytes(vec![0xde, 0xad, 0xbe, 0xef])));
        assert_eq!(req.api().path(), "proxy/transactions");
        assert!(catalog().post_external_transaction("zz").is_err());
        assert!(catalog().post_external_transaction("").is_err());
    }

    #[test]
    fn test_stake_pool_paths() {
        let join = catalog().join_stake_pool("w1", "pool1", "pw").unwrap();
        assert_eq!(join.api().path(), "stake-pools/pool1/wallets/w1");
        assert_eq!(catalog().join_stake_pool("w1", "", "pw").unwrap_err().code(), crate::error::INVALID_REQUEST);
        assert_eq!(join.api().method(), Method::Put);
        let quit = catalog().quit_stake_pool("w1", "pw").unwrap();
        assert_eq!(quit.api().url().as_str(), "http://localhost:8090/v2/stake-pools/*/wallets/w1");
        assert_eq!(json_of(quit.api())["passphrase"], "pw");
        let pools = catalog().list_stake_pools(1_000).unwrap();
        assert_eq!(pools.api().query_param("stake").as_deref(), Some("1000"));
    }

    #[test]
    fn test_maintenance_action_body() {
        let req = catalog().post_maintenance_action().unwrap();
        assert_eq!(json_of(req.api()), &json!({"maintenance_action": "gc_stake_pools"}));
        assert_eq!(req.api().method(), Method::Post);
    }

    #[test]
    fn test_migration_requires_addresses() {
        assert!(catalog().migrate_sophie_wallet("w1", "pw", vec![]).is_err());
        let req = catalog().migrate_sophie_wallet("w1", "pw", vec!["addr1".into()]).unwrap();
        assert_eq!(req.api().path(), "wallets/w1/migrations");
    }

    #[test]
    fn test_network_clock_flag() {
        assert_eq!(catalog().network_clock(None).unwrap().api().url().query(), None);
        let forced = catalog().network_clock(Some(true)).unwrap();
        assert_eq!(forced.api().query_param("forceNtpCheck").as_deref(), Some("true"));
    }

    #[test]
    fn test_decoder_names_entity() {
        let req = catalog().get_wallet("abc").unwrap();
        let err = req.decode(b"{}").unwrap_err();
        assert_eq!(err.code(), crate::error::DECODE);
        assert!(err.message().starts_with("Wallet:"));
    }
}
