//! Bookmaker odds client
//!
//! Fetches head-to-head cricket odds and reduces each event's bookmaker
//! prices to one pair of implied win probabilities: average the decimal
//! odds quoted for each team across bookmakers, then invert. Events with
//! no usable quotes fall back to even odds.

use super::{Fixture, FixtureStatus, PriceFeed, ReferencePrices};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::time::Duration;

/// Odds API base URL
pub const ODDS_API_URL: &str = "https://api.the-odds-api.com";

/// Configuration for the odds client
#[derive(Debug, Clone)]
pub struct OddsApiConfig {
    /// Base URL for the odds API
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
    /// Sport key (e.g. "cricket")
    pub sport: String,
    /// Comma-separated bookmaker regions
    pub regions: String,
    /// How many days ahead to fetch fixtures for
    pub days_from: u8,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: ODDS_API_URL.to_string(),
            api_key: String::new(),
            sport: "cricket".to_string(),
            regions: "au,eu,uk,us".to_string(),
            days_from: 15,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for a head-to-head odds API
pub struct OddsApiClient {
    config: OddsApiConfig,
    client: Client,
}

impl OddsApiClient {
    /// Create a client with an API key and defaults otherwise
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(OddsApiConfig {
            api_key: api_key.into(),
            ..OddsApiConfig::default()
        })
    }

    /// Create a client with custom configuration
    pub fn with_config(config: OddsApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Fetch upcoming fixtures with their implied win probabilities
    pub async fn fetch_fixtures(&self) -> anyhow::Result<Vec<(Fixture, ReferencePrices)>> {
        let url = format!(
            "{}/v4/sports/{}/odds/",
            self.config.base_url, self.config.sport
        );

        tracing::debug!(url = %url, sport = %self.config.sport, "Fetching odds");

        let days_from = self.config.days_from.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.config.api_key.as_str()),
                ("regions", self.config.regions.as_str()),
                ("markets", "h2h"),
                ("daysFrom", days_from.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Odds API error: {} - {}", status, body);
        }

        let events: Vec<OddsEvent> = response.json().await?;

        tracing::debug!(event_count = events.len(), "Fetched odds events");

        Ok(events
            .into_iter()
            .map(|event| {
                let prices = implied_probabilities(&event);
                (convert_to_fixture(event), prices)
            })
            .collect())
    }
}

#[async_trait]
impl PriceFeed for OddsApiClient {
    async fn get_fixture(&self, fixture_id: &str) -> anyhow::Result<Option<Fixture>> {
        let fixtures = self.fetch_fixtures().await?;
        Ok(fixtures
            .into_iter()
            .map(|(fixture, _)| fixture)
            .find(|f| f.id == fixture_id))
    }

    async fn get_reference_prices(&self, fixture_id: &str) -> anyhow::Result<ReferencePrices> {
        let fixtures = self.fetch_fixtures().await?;
        fixtures
            .into_iter()
            .find(|(fixture, _)| fixture.id == fixture_id)
            .map(|(_, prices)| prices)
            .ok_or_else(|| anyhow::anyhow!("unknown fixture: {}", fixture_id))
    }
}

/// Raw event from the odds API
#[derive(Debug, Deserialize)]
struct OddsEvent {
    id: String,
    sport_key: String,
    commence_time: String,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsBookmaker>,
}

/// One bookmaker's quoted markets
#[derive(Debug, Deserialize)]
struct OddsBookmaker {
    #[serde(default)]
    markets: Vec<OddsMarket>,
}

/// A quoted market (only "h2h" is consumed)
#[derive(Debug, Deserialize)]
struct OddsMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<OddsOutcome>,
}

/// One priced outcome within a market
#[derive(Debug, Deserialize)]
struct OddsOutcome {
    name: String,
    price: Decimal,
}

/// Average each team's h2h decimal odds across bookmakers, then invert.
/// Teams with no quotes default to even odds.
fn implied_probabilities(event: &OddsEvent) -> ReferencePrices {
    let mut home_odds = Vec::new();
    let mut away_odds = Vec::new();

    for bookmaker in &event.bookmakers {
        for market in bookmaker.markets.iter().filter(|m| m.key == "h2h") {
            for outcome in &market.outcomes {
                if outcome.name == event.home_team {
                    home_odds.push(outcome.price);
                } else if outcome.name == event.away_team {
                    away_odds.push(outcome.price);
                }
            }
        }
    }

    ReferencePrices::from_decimal_odds(average_or_even(&home_odds), average_or_even(&away_odds))
}

fn average_or_even(odds: &[Decimal]) -> Decimal {
    if odds.is_empty() {
        return dec!(2.0);
    }
    odds.iter().sum::<Decimal>() / Decimal::from(odds.len())
}

fn convert_to_fixture(event: OddsEvent) -> Fixture {
    let start_time_utc = DateTime::parse_from_rfc3339(&event.commence_time)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Fixture {
        id: event.id,
        competition_id: event.sport_key,
        home_team_id: event.home_team,
        away_team_id: event.away_team,
        start_time_utc,
        status: FixtureStatus::Scheduled,
    }
}
