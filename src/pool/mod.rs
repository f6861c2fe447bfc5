//! Constant-product pool state
//!
//! Each market owns one pool of two reserves (`x_yes`, `y_no`) priced under
//! the invariant `x_yes * y_no = k`. Buying a side deepens that side's
//! reserve and drains the other; the drained quantity is the shares issued.
//! Fees are carved off the input before the swap and retained outside the
//! reserves, so `k` is fee-exclusive and constant across trades.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const BPS_DENOMINATOR: Decimal = dec!(10000);

/// Side of a binary market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Home team wins
    Yes,
    /// Away team wins
    No,
}

impl Side {
    /// The other side of the market
    pub fn opposite(self) -> Side {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// AMM reserve state for one market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    /// Owning market
    pub market_id: String,
    /// Reserve backing the YES side
    pub x_yes: Decimal,
    /// Reserve backing the NO side
    pub y_no: Decimal,
    /// Constant product at seeding, preserved across fee-exclusive swaps
    pub k: Decimal,
    /// Implied YES price, `y_no / (x_yes + y_no)`
    pub last_price_yes: Decimal,
    /// Implied NO price, `x_yes / (x_yes + y_no)`
    pub last_price_no: Decimal,
    /// Initial reserve magnitude
    pub liquidity_seed: Decimal,
    /// Last reserve update
    pub updated_at: DateTime<Utc>,
    /// Gross credits traded; decay/rollover is an external policy
    pub volume_24h: Decimal,
}

/// A priced trade preview against a pool
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    /// Side being bought
    pub side: Side,
    /// Gross credits spent
    pub amount_in: Decimal,
    /// Fee carved off the input
    pub fee: Decimal,
    /// Credits entering the reserve after the fee
    pub amount_after_fee: Decimal,
    /// Shares issued from the drained reserve
    pub shares_out: Decimal,
    /// Fee-inclusive credits paid per share
    pub avg_price: Decimal,
    /// YES reserve after the swap
    pub new_x_yes: Decimal,
    /// NO reserve after the swap
    pub new_y_no: Decimal,
}

impl Pool {
    /// Seed a pool so the implied YES price matches the reference probability.
    ///
    /// Probabilities are normalized to sum to 1, then reserves are sized as
    /// `x_yes = seed * sqrt(p_no / p_yes)` and `y_no = seed * sqrt(p_yes / p_no)`,
    /// which gives `k = seed^2` and `last_price_yes = p_yes`.
    pub fn seed(
        market_id: impl Into<String>,
        prob_yes: Decimal,
        prob_no: Decimal,
        liquidity_seed: Decimal,
    ) -> CoreResult<Pool> {
        if liquidity_seed <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(liquidity_seed));
        }
        if prob_yes <= Decimal::ZERO {
            return Err(CoreError::InvalidPrice(prob_yes));
        }
        if prob_no <= Decimal::ZERO {
            return Err(CoreError::InvalidPrice(prob_no));
        }

        let total = prob_yes + prob_no;
        let price_yes = prob_yes / total;
        let price_no = prob_no / total;

        let x_yes = liquidity_seed
            * (price_no / price_yes)
                .sqrt()
                .ok_or(CoreError::InvalidPrice(price_yes))?;
        let y_no = liquidity_seed
            * (price_yes / price_no)
                .sqrt()
                .ok_or(CoreError::InvalidPrice(price_no))?;

        Ok(Pool {
            market_id: market_id.into(),
            x_yes,
            y_no,
            k: x_yes * y_no,
            last_price_yes: price_yes,
            last_price_no: price_no,
            liquidity_seed,
            updated_at: Utc::now(),
            volume_24h: Decimal::ZERO,
        })
    }

    /// Price a buy against current reserves without mutating them.
    ///
    /// The fee (`fee_bps` basis points of `amount_in`) is deducted first;
    /// the remainder enters the bought side's reserve and the shares issued
    /// are the complement change in the other reserve under `x * y = k`.
    pub fn quote(&self, fee_bps: u32, side: Side, amount_in: Decimal) -> CoreResult<Quote> {
        if amount_in <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(amount_in));
        }

        let fee = amount_in * Decimal::from(fee_bps) / BPS_DENOMINATOR;
        let amount_after_fee = amount_in - fee;
        if amount_after_fee <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(amount_in));
        }

        let (new_x_yes, new_y_no, shares_out) = match side {
            Side::Yes => {
                let new_x = self.x_yes + amount_after_fee;
                let new_y = self.k / new_x;
                (new_x, new_y, self.y_no - new_y)
            }
            Side::No => {
                let new_y = self.y_no + amount_after_fee;
                let new_x = self.k / new_y;
                (new_x, new_y, self.x_yes - new_x)
            }
        };

        if shares_out <= Decimal::ZERO || new_x_yes <= Decimal::ZERO || new_y_no <= Decimal::ZERO {
            return Err(CoreError::PoolExhausted);
        }

        Ok(Quote {
            side,
            amount_in,
            fee,
            amount_after_fee,
            shares_out,
            avg_price: amount_in / shares_out,
            new_x_yes,
            new_y_no,
        })
    }

    /// Commit a quoted trade to the reserves.
    pub fn apply(&mut self, quote: &Quote) {
        self.x_yes = quote.new_x_yes;
        self.y_no = quote.new_y_no;
        let total = self.x_yes + self.y_no;
        self.last_price_yes = self.y_no / total;
        self.last_price_no = self.x_yes / total;
        self.volume_24h += quote.amount_in;
        self.updated_at = Utc::now();
    }

    /// Implied price for one side
    pub fn price(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.last_price_yes,
            Side::No => self.last_price_no,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.0001)
    }

    #[test]
    fn test_seed_balanced() {
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        assert_eq!(pool.x_yes, dec!(5000));
        assert_eq!(pool.y_no, dec!(5000));
        assert_eq!(pool.k, dec!(25000000));
        assert_eq!(pool.last_price_yes, dec!(0.5));
        assert_eq!(pool.last_price_no, dec!(0.5));
        assert_eq!(pool.volume_24h, dec!(0));
    }

    #[test]
    fn test_seed_skewed_matches_reference_price() {
        let pool = Pool::seed("m1", dec!(0.6), dec!(0.4), dec!(10000)).unwrap();

        // Implied price must recover the normalized reference probability
        let total = pool.x_yes + pool.y_no;
        assert!(approx(pool.y_no / total, dec!(0.6)));
        assert!(approx(pool.last_price_yes, dec!(0.6)));
        assert!(approx(pool.last_price_no, dec!(0.4)));
        assert!(approx(pool.k, dec!(100000000)));
    }

    #[test]
    fn test_seed_normalizes_raw_probabilities() {
        // Overround bookmaker probabilities (sum > 1) are normalized
        let pool = Pool::seed("m1", dec!(0.55), dec!(0.55), dec!(1000)).unwrap();
        assert!(approx(pool.last_price_yes, dec!(0.5)));
        assert!(approx(pool.last_price_no, dec!(0.5)));
    }

    #[test]
    fn test_seed_rejects_nonpositive_seed() {
        let result = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(0));
        assert!(matches!(result, Err(CoreError::InvalidAmount(_))));
    }

    #[test]
    fn test_seed_rejects_nonpositive_price() {
        let result = Pool::seed("m1", dec!(0), dec!(1), dec!(1000));
        assert!(matches!(result, Err(CoreError::InvalidPrice(_))));
    }

    #[test]
    fn test_quote_worked_scenario() {
        // xYes=5000, yNo=5000, k=25,000,000, feeBps=100, buy YES with 1000:
        // fee=10, net=990, newX=5990, newY=25,000,000/5990=4173.6227...,
        // shares=826.3772..., avgPrice=1000/826.38=1.2101...
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let quote = pool.quote(100, Side::Yes, dec!(1000)).unwrap();

        assert_eq!(quote.fee, dec!(10));
        assert_eq!(quote.amount_after_fee, dec!(990));
        assert_eq!(quote.new_x_yes, dec!(5990));
        assert!(approx(quote.new_y_no, dec!(4173.6227)));
        assert!(approx(quote.shares_out, dec!(826.3773)));
        assert_eq!(quote.avg_price.round_dp(2), dec!(1.21));
    }

    #[test]
    fn test_quote_no_side_symmetric() {
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let yes = pool.quote(100, Side::Yes, dec!(1000)).unwrap();
        let no = pool.quote(100, Side::No, dec!(1000)).unwrap();

        // Balanced pool: both sides price identically
        assert_eq!(yes.shares_out, no.shares_out);
        assert_eq!(yes.avg_price, no.avg_price);
        assert_eq!(no.new_y_no, dec!(5990));
        assert!(approx(no.new_x_yes, dec!(4173.6227)));
    }

    #[test]
    fn test_quote_zero_fee() {
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let quote = pool.quote(0, Side::Yes, dec!(100)).unwrap();
        assert_eq!(quote.fee, dec!(0));
        assert_eq!(quote.amount_after_fee, dec!(100));
    }

    #[test]
    fn test_quote_rejects_nonpositive_amount() {
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        assert!(matches!(
            pool.quote(100, Side::Yes, dec!(0)),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            pool.quote(100, Side::No, dec!(-5)),
            Err(CoreError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_quote_rejects_full_fee() {
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        // 100% fee leaves nothing to swap
        let result = pool.quote(10000, Side::Yes, dec!(100));
        assert!(matches!(result, Err(CoreError::InvalidAmount(_))));
    }

    #[test]
    fn test_apply_preserves_product() {
        let mut pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let quote = pool.quote(100, Side::Yes, dec!(1000)).unwrap();
        pool.apply(&quote);

        assert!(approx(pool.x_yes * pool.y_no, pool.k));
        assert_eq!(pool.volume_24h, dec!(1000));
    }

    #[test]
    fn test_apply_prices_sum_to_one() {
        let mut pool = Pool::seed("m1", dec!(0.65), dec!(0.35), dec!(8000)).unwrap();
        for amount in [dec!(10), dec!(250), dec!(1000), dec!(4999.99)] {
            let quote = pool.quote(100, Side::Yes, amount).unwrap();
            pool.apply(&quote);
            assert!(approx(pool.last_price_yes + pool.last_price_no, dec!(1)));
        }
    }

    #[test]
    fn test_buying_yes_lowers_yes_price() {
        // Credits flowing into the YES reserve make further YES shares
        // cheaper: y_no shrinks, so y_no / (x_yes + y_no) falls.
        let mut pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let before = pool.last_price_yes;
        let quote = pool.quote(100, Side::Yes, dec!(1000)).unwrap();
        pool.apply(&quote);
        assert!(pool.last_price_yes < before);
        assert!(pool.last_price_no > dec!(0.5));
    }

    #[test]
    fn test_successive_quotes_slip() {
        // Larger trades pay a worse average price within the same pool
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let small = pool.quote(100, Side::Yes, dec!(10)).unwrap();
        let large = pool.quote(100, Side::Yes, dec!(2000)).unwrap();
        assert!(large.avg_price > small.avg_price);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Yes.opposite(), Side::No);
        assert_eq!(Side::No.opposite(), Side::Yes);
    }

    #[test]
    fn test_side_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Side::Yes).unwrap(), "\"YES\"");
        assert_eq!(serde_json::from_str::<Side>("\"NO\"").unwrap(), Side::No);
    }

    #[test]
    fn test_pool_serde_round_trip() {
        let pool = Pool::seed("m1", dec!(0.5), dec!(0.5), dec!(5000)).unwrap();
        let json = serde_json::to_string(&pool).unwrap();
        let back: Pool = serde_json::from_str(&json).unwrap();
        assert_eq!(back.market_id, "m1");
        assert_eq!(back.k, pool.k);
    }
}
