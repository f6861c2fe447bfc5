//! Core error taxonomy
//!
//! Every rejected operation surfaces as one of these variants before any
//! state is mutated. Nothing here is fatal to the process: callers receive
//! a typed rejection and prior state is left intact.

use crate::market::MarketState;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the AMM core
#[derive(Debug, Error)]
pub enum CoreError {
    /// Trade or seed amount must be strictly positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),
    /// Reference price outside the open interval (0, 1)
    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),
    /// Available balance does not cover the requested amount
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },
    /// Market is not accepting trades
    #[error("Market not open (state: {0:?})")]
    MarketNotOpen(MarketState),
    /// Swap would drain a reserve to zero or below
    #[error("Pool exhausted")]
    PoolExhausted,
    /// Requested lifecycle transition is not permitted
    #[error("Illegal state transition: {from:?} -> {to:?}")]
    IllegalStateTransition { from: MarketState, to: MarketState },
    /// No market with this id
    #[error("Market not found: {0}")]
    MarketNotFound(String),
    /// Market has no seeded pool
    #[error("Pool not found for market: {0}")]
    PoolNotFound(String),
    /// No wallet provisioned for this uid
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),
    /// No position for this (uid, market) pair
    #[error("Position not found: uid {uid}, market {market_id}")]
    PositionNotFound { uid: String, market_id: String },
    /// Position already holds shares on the opposite side
    #[error("Position already holds the opposite side")]
    PositionSideConflict,
    /// Failure in a persistence or feed collaborator
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
