//! Scripted demo session
//!
//! Runs one market through its whole lifecycle against the in-memory
//! store: create from demo odds, publish, quote, trade both sides from two
//! demo wallets, lock, then resolve (or void) and print the settlement.

use crate::config::Config;
use crate::engine::{EntityLocks, TradeEngine};
use crate::feed::{Fixture, FixtureStatus, ReferencePrices, StaticFeed};
use crate::market::{LifecycleService, Outcome};
use crate::pool::Side;
use crate::store::{MemoryStore, Store};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Arguments for the demo session
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Decimal odds for the home team
    #[arg(long, default_value = "1.6")]
    pub home_odds: Decimal,

    /// Decimal odds for the away team
    #[arg(long, default_value = "2.4")]
    pub away_odds: Decimal,

    /// Credits each demo trader spends
    #[arg(long, default_value = "1000")]
    pub stake: Decimal,

    /// Void the market instead of resolving it to YES
    #[arg(long)]
    pub void: bool,
}

impl DemoArgs {
    /// Run the scripted session
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let locks = Arc::new(EntityLocks::new());

        let mut feed = StaticFeed::new();
        feed.insert(
            Fixture {
                id: "demo-fixture".to_string(),
                competition_id: "cricket_odi".to_string(),
                home_team_id: "ind".to_string(),
                away_team_id: "aus".to_string(),
                start_time_utc: Utc::now() + chrono::Duration::hours(6),
                status: FixtureStatus::Scheduled,
            },
            ReferencePrices::from_decimal_odds(self.home_odds, self.away_odds),
        );

        let lifecycle = LifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&locks),
            Arc::new(feed),
            config.market.default_fee_bps,
            config.market.liquidity_seed,
        );
        let engine = TradeEngine::new(
            Arc::clone(&store),
            Arc::clone(&locks),
            config.wallet.starting_balance,
        );

        let market = lifecycle.create_market("demo-fixture", "demo-ops").await?;
        let market = lifecycle.publish(&market.id).await?;
        println!("Market {} published", market.id);

        let quote = engine.quote(&market.id, Side::Yes, self.stake).await?;
        println!(
            "Quote: {} DC buys {:.2} YES shares at {:.4} DC/share (fee {:.2})",
            quote.amount_in, quote.shares_out, quote.avg_price, quote.fee
        );

        engine.open_wallet("alice").await?;
        engine.open_wallet("bob").await?;
        let yes_trade = engine
            .place_trade("alice", &market.id, Side::Yes, self.stake, "demo-yes-1")
            .await?;
        let no_trade = engine
            .place_trade("bob", &market.id, Side::No, self.stake, "demo-no-1")
            .await?;
        println!(
            "alice bought {:.2} YES shares, bob bought {:.2} NO shares",
            yes_trade.shares, no_trade.shares
        );

        lifecycle.lock(&market.id).await?;

        let (market, report) = if self.void {
            lifecycle.void_market(&market.id).await?
        } else {
            lifecycle.resolve(&market.id, Outcome::Yes).await?
        };
        println!(
            "Market {} settled as {:?}: {} positions, {:.2} DC paid out",
            market.id, report.outcome, report.positions_settled, report.total_paid_out
        );

        for uid in ["alice", "bob"] {
            let wallet = engine.wallet(uid).await?;
            println!(
                "{uid}: balance {:.2} DC (locked {:.2})",
                wallet.balance_demo, wallet.locked_demo
            );
        }

        Ok(())
    }
}
