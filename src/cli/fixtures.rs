//! Fixture listing from the odds feed

use crate::config::{Config, FeedProvider};
use crate::feed::{OddsApiClient, OddsApiConfig};
use clap::Args;

/// Arguments for the fixture listing
#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// Maximum number of fixtures to print
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl FixturesArgs {
    /// Fetch and print upcoming fixtures with implied probabilities
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if config.feed.provider != FeedProvider::OddsApi {
            anyhow::bail!("fixtures requires feed.provider = \"odds-api\" in the config");
        }
        let api_key = config
            .feed
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("feed.api_key is not set"))?;

        let client = OddsApiClient::with_config(OddsApiConfig {
            api_key,
            sport: config.feed.sport.clone(),
            regions: config.feed.regions.clone(),
            days_from: config.feed.days_from,
            ..OddsApiConfig::default()
        });

        let fixtures = client.fetch_fixtures().await?;
        for (fixture, prices) in fixtures.iter().take(self.limit) {
            let (price_home, price_away) = prices.normalized();
            println!(
                "{}  {} vs {}  starts {}  home {:.3} / away {:.3}",
                fixture.id,
                fixture.home_team_id,
                fixture.away_team_id,
                fixture.start_time_utc.format("%Y-%m-%d %H:%M UTC"),
                price_home,
                price_away
            );
        }
        println!("{} fixtures", fixtures.len().min(self.limit));

        Ok(())
    }
}
