//! Trade and settlement metrics
//!
//! Emitted through the `metrics` facade; the embedding service decides the
//! exporter.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Trades committed
    TradesExecuted,
    /// Trades rejected by validation
    TradesRejected,
    /// Idempotent replays of recorded trades
    TradeReplays,
    /// Markets settled
    MarketsSettled,
}

fn counter_name(metric: CounterMetric) -> &'static str {
    match metric {
        CounterMetric::TradesExecuted => "onlywin_trades_executed_total",
        CounterMetric::TradesRejected => "onlywin_trades_rejected_total",
        CounterMetric::TradeReplays => "onlywin_trade_replays_total",
        CounterMetric::MarketsSettled => "onlywin_markets_settled_total",
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(counter_name(metric)).increment(1);
}

/// Record the outcome of one settlement run
pub fn record_settlement(positions_settled: usize, total_paid_out: Decimal) {
    increment(CounterMetric::MarketsSettled);
    metrics::counter!("onlywin_positions_settled_total").increment(positions_settled as u64);
    metrics::gauge!("onlywin_last_settlement_payout")
        .set(total_paid_out.to_f64().unwrap_or_default());
}
