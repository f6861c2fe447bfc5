//! Trade records

use crate::pool::{Quote, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trade identifier
pub type TradeId = Uuid;

/// An executed buy, immutable once written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Trade identifier
    pub trade_id: TradeId,
    /// Buying user
    pub uid: String,
    /// Market traded
    pub market_id: String,
    /// Side bought
    pub side: Side,
    /// Gross credits spent
    pub amount: Decimal,
    /// Shares received
    pub shares: Decimal,
    /// Fee-inclusive credits paid per share
    pub avg_price: Decimal,
    /// Fee retained by the pool operator
    pub fee: Decimal,
    /// Caller-supplied idempotency key
    pub client_txn_id: String,
    /// Execution timestamp
    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// Record an executed quote
    pub fn from_quote(
        uid: impl Into<String>,
        market_id: impl Into<String>,
        quote: &Quote,
        client_txn_id: impl Into<String>,
    ) -> Trade {
        Trade {
            trade_id: Uuid::new_v4(),
            uid: uid.into(),
            market_id: market_id.into(),
            side: quote.side,
            amount: quote.amount_in,
            shares: quote.shares_out,
            avg_price: quote.avg_price,
            fee: quote.fee,
            client_txn_id: client_txn_id.into(),
            created_at: Utc::now(),
        }
    }
}
