//! Per-user market positions
//!
//! One position per (uid, market). Fills accumulate shares on a single side
//! with a weighted-average cost basis; settlement mutates the position once,
//! terminally, and marks it with `settled_at` so a retried settlement run
//! skips it.

use crate::error::{CoreError, CoreResult};
use crate::pool::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Holdings of one user in one market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Owning user
    pub uid: String,
    /// Market the shares belong to
    pub market_id: String,
    /// YES shares held
    pub yes_shares: Decimal,
    /// NO shares held
    pub no_shares: Decimal,
    /// Weighted-average credits paid per YES share (fee-inclusive)
    pub avg_price_yes: Decimal,
    /// Weighted-average credits paid per NO share (fee-inclusive)
    pub avg_price_no: Decimal,
    /// Cumulative credits staked into this position
    pub locked: Decimal,
    /// Profit and loss realized at settlement
    pub realized_pnl: Decimal,
    /// Mark-to-market against the pool's last prices
    pub unrealized_pnl: Decimal,
    /// Last mutation
    pub updated_at: DateTime<Utc>,
    /// Set exactly once, when settlement consumes the position
    pub settled_at: Option<DateTime<Utc>>,
}

impl Position {
    /// Empty position for a (uid, market) pair
    pub fn new(uid: impl Into<String>, market_id: impl Into<String>) -> Position {
        Position {
            uid: uid.into(),
            market_id: market_id.into(),
            yes_shares: Decimal::ZERO,
            no_shares: Decimal::ZERO,
            avg_price_yes: Decimal::ZERO,
            avg_price_no: Decimal::ZERO,
            locked: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            updated_at: Utc::now(),
            settled_at: None,
        }
    }

    /// Shares held on one side
    pub fn shares(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_shares,
            Side::No => self.no_shares,
        }
    }

    /// Cost basis per share on one side
    pub fn avg_price(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.avg_price_yes,
            Side::No => self.avg_price_no,
        }
    }

    /// Whether settlement has already consumed this position
    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    /// Fold an executed trade into the position.
    ///
    /// Positions are single-side: a buy on the side opposite an existing
    /// holding is rejected. The cost basis is the share-weighted average of
    /// prior fills and this one.
    pub fn apply_fill(
        &mut self,
        side: Side,
        shares: Decimal,
        avg_price: Decimal,
        amount: Decimal,
    ) -> CoreResult<()> {
        if self.shares(side.opposite()) > Decimal::ZERO {
            return Err(CoreError::PositionSideConflict);
        }

        let old_shares = self.shares(side);
        let old_avg = self.avg_price(side);
        let new_shares = old_shares + shares;
        let new_avg = (old_shares * old_avg + shares * avg_price) / new_shares;

        match side {
            Side::Yes => {
                self.yes_shares = new_shares;
                self.avg_price_yes = new_avg;
            }
            Side::No => {
                self.no_shares = new_shares;
                self.avg_price_no = new_avg;
            }
        }
        self.locked += amount;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark unrealized P&L against the pool's current implied prices.
    pub fn mark(&mut self, price_yes: Decimal, price_no: Decimal) {
        self.unrealized_pnl = (price_yes - self.avg_price_yes) * self.yes_shares
            + (price_no - self.avg_price_no) * self.no_shares;
        self.updated_at = Utc::now();
    }

    /// Terminal settlement for a resolved market.
    ///
    /// Winning shares pay 1 credit each; the whole stake is consumed either
    /// way, so `realized_pnl` moves by `payout - stake`. Returns the payout.
    pub fn settle_resolved(&mut self, winning: Side) -> Decimal {
        let payout = self.shares(winning);
        self.realized_pnl += payout - self.locked;
        self.close(Utc::now());
        payout
    }

    /// Terminal settlement for a voided market.
    ///
    /// The original stake is refunded in full; no P&L is recorded. Returns
    /// the refund amount.
    pub fn settle_void(&mut self) -> Decimal {
        let refund = self.locked;
        self.close(Utc::now());
        refund
    }

    fn close(&mut self, now: DateTime<Utc>) {
        self.yes_shares = Decimal::ZERO;
        self.no_shares = Decimal::ZERO;
        self.locked = Decimal::ZERO;
        self.unrealized_pnl = Decimal::ZERO;
        self.updated_at = now;
        self.settled_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position_with_yes(shares: Decimal, avg: Decimal) -> Position {
        let mut position = Position::new("u1", "m1");
        position
            .apply_fill(Side::Yes, shares, avg, shares * avg)
            .unwrap();
        position
    }

    #[test]
    fn test_new_position_empty() {
        let position = Position::new("u1", "m1");
        assert_eq!(position.yes_shares, dec!(0));
        assert_eq!(position.no_shares, dec!(0));
        assert_eq!(position.locked, dec!(0));
        assert!(!position.is_settled());
    }

    #[test]
    fn test_apply_fill_first() {
        let mut position = Position::new("u1", "m1");
        position
            .apply_fill(Side::Yes, dec!(100), dec!(0.50), dec!(50))
            .unwrap();
        assert_eq!(position.yes_shares, dec!(100));
        assert_eq!(position.avg_price_yes, dec!(0.50));
        assert_eq!(position.locked, dec!(50));
    }

    #[test]
    fn test_apply_fill_weighted_average() {
        let mut position = Position::new("u1", "m1");
        position
            .apply_fill(Side::Yes, dec!(100), dec!(0.50), dec!(50))
            .unwrap();
        position
            .apply_fill(Side::Yes, dec!(100), dec!(0.70), dec!(70))
            .unwrap();
        // (100*0.50 + 100*0.70) / 200 = 0.60
        assert_eq!(position.yes_shares, dec!(200));
        assert_eq!(position.avg_price_yes, dec!(0.60));
        assert_eq!(position.locked, dec!(120));
    }

    #[test]
    fn test_apply_fill_opposite_side_rejected() {
        let mut position = position_with_yes(dec!(100), dec!(0.50));
        let result = position.apply_fill(Side::No, dec!(10), dec!(0.50), dec!(5));
        assert!(matches!(result, Err(CoreError::PositionSideConflict)));
        // Untouched on rejection
        assert_eq!(position.no_shares, dec!(0));
        assert_eq!(position.locked, dec!(50));
    }

    #[test]
    fn test_mark_yes_side() {
        let mut position = position_with_yes(dec!(150), dec!(0.55));
        position.mark(dec!(0.60), dec!(0.40));
        // (0.60 - 0.55) * 150 = 7.5
        assert_eq!(position.unrealized_pnl, dec!(7.5));
    }

    #[test]
    fn test_mark_no_side() {
        let mut position = Position::new("u1", "m1");
        position
            .apply_fill(Side::No, dec!(100), dec!(0.40), dec!(40))
            .unwrap();
        position.mark(dec!(0.65), dec!(0.35));
        // (0.35 - 0.40) * 100 = -5
        assert_eq!(position.unrealized_pnl, dec!(-5));
    }

    #[test]
    fn test_settle_resolved_winner() {
        // yesShares=150 at avg 0.55: payout 150, pnl 150 - 82.5 = 67.5
        let mut position = position_with_yes(dec!(150), dec!(0.55));
        let payout = position.settle_resolved(Side::Yes);
        assert_eq!(payout, dec!(150));
        assert_eq!(position.realized_pnl, dec!(67.5));
        assert_eq!(position.yes_shares, dec!(0));
        assert_eq!(position.locked, dec!(0));
        assert!(position.is_settled());
    }

    #[test]
    fn test_settle_resolved_loser() {
        let mut position = position_with_yes(dec!(150), dec!(0.55));
        let payout = position.settle_resolved(Side::No);
        assert_eq!(payout, dec!(0));
        assert_eq!(position.realized_pnl, dec!(-82.5));
        assert!(position.is_settled());
    }

    #[test]
    fn test_settle_void_refunds_stake() {
        let mut position = position_with_yes(dec!(150), dec!(0.55));
        let refund = position.settle_void();
        assert_eq!(refund, dec!(82.5));
        assert_eq!(position.realized_pnl, dec!(0));
        assert!(position.is_settled());
    }

    #[test]
    fn test_position_serde() {
        let position = position_with_yes(dec!(10), dec!(0.5));
        let json = serde_json::to_string(&position).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back.yes_shares, dec!(10));
        assert!(back.settled_at.is_none());
    }
}
