//! Fixture and reference-price collaborators
//!
//! The core never speaks to a bookmaker directly; it consumes an opaque
//! `PriceFeed` that supplies fixtures and per-fixture implied win
//! probabilities. Reference prices are used exactly once per market, at
//! pool-seeding time.

mod odds;

pub use odds::{OddsApiClient, OddsApiConfig};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixture lifecycle as reported by the upstream feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FixtureStatus {
    /// Not yet started
    Scheduled,
    /// In play
    Live,
    /// Completed normally
    Finished,
    /// Called off; markets on it are voided
    Abandoned,
}

/// A cricket fixture between two teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Fixture identifier
    pub id: String,
    /// Competition the fixture belongs to
    pub competition_id: String,
    /// Home team identifier
    pub home_team_id: String,
    /// Away team identifier
    pub away_team_id: String,
    /// Scheduled start
    pub start_time_utc: DateTime<Utc>,
    /// Feed-reported status
    pub status: FixtureStatus,
}

/// Implied win probabilities for a fixture's two sides
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReferencePrices {
    /// Implied probability the home team wins
    pub prob_home: Decimal,
    /// Implied probability the away team wins
    pub prob_away: Decimal,
}

impl ReferencePrices {
    /// Implied probabilities from decimal odds (probability = 1/odds)
    pub fn from_decimal_odds(home_odds: Decimal, away_odds: Decimal) -> ReferencePrices {
        ReferencePrices {
            prob_home: Decimal::ONE / home_odds,
            prob_away: Decimal::ONE / away_odds,
        }
    }

    /// Probabilities rescaled to sum to 1 (removes the bookmaker overround)
    pub fn normalized(&self) -> (Decimal, Decimal) {
        let total = self.prob_home + self.prob_away;
        (self.prob_home / total, self.prob_away / total)
    }
}

/// External source of fixtures and reference prices
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fixture metadata, if the feed knows the fixture
    async fn get_fixture(&self, fixture_id: &str) -> anyhow::Result<Option<Fixture>>;
    /// Implied win probabilities for a fixture
    async fn get_reference_prices(&self, fixture_id: &str) -> anyhow::Result<ReferencePrices>;
}

/// Fixed in-memory feed for demos and tests
#[derive(Default)]
pub struct StaticFeed {
    entries: HashMap<String, (Fixture, ReferencePrices)>,
}

impl StaticFeed {
    /// Empty feed
    pub fn new() -> StaticFeed {
        StaticFeed::default()
    }

    /// Register a fixture with its reference prices
    pub fn insert(&mut self, fixture: Fixture, prices: ReferencePrices) {
        self.entries.insert(fixture.id.clone(), (fixture, prices));
    }
}

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn get_fixture(&self, fixture_id: &str) -> anyhow::Result<Option<Fixture>> {
        Ok(self.entries.get(fixture_id).map(|(f, _)| f.clone()))
    }

    async fn get_reference_prices(&self, fixture_id: &str) -> anyhow::Result<ReferencePrices> {
        self.entries
            .get(fixture_id)
            .map(|(_, p)| *p)
            .ok_or_else(|| anyhow::anyhow!("unknown fixture: {}", fixture_id))
    }
}
