use chrono::{DateTime, Utc};

use crate::codec::{Order, TxMetadata, Withdrawal};

/// Filter for `list_transactions`. Absent bounds mean unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTransactionsParams {
    pub wallet_id: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub order: Order,
    pub min_withdrawal: Option<u64>,
}

impl ListTransactionsParams {
    pub fn new(wallet_id: impl Into<String>) -> Self {
        Self { wallet_id: wallet_id.into(), start: None, end: None, order: Order::default(), min_withdrawal: None }
    }
    pub fn with_start(mut self, t: DateTime<Utc>) -> Self { self.start = Some(t); self }
    pub fn with_end(mut self, t: DateTime<Utc>) -> Self { self.end = Some(t); self }
    pub fn with_order(mut self, order: Order) -> Self { self.order = order; self }
    pub fn with_min_withdrawal(mut self, entropic: u64) -> Self { self.min_withdrawal = Some(entropic); self }
}

/// Options for `create_transaction_with` / `estimate_fee_with`.
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    /// `None` omits the field entirely.
    pub withdrawal: Option<Withdrawal>,
    pub metadata: Option<TxMetadata>,
}

impl TransactionOptions {
    pub fn new() -> Self { Self::default() }
    pub fn with_withdrawal(mut self, w: Withdrawal) -> Self { self.withdrawal = Some(w); self }
    pub fn with_metadata(mut self, m: impl Into<TxMetadata>) -> Self { self.metadata = Some(m.into()); self }
}
