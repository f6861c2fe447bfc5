//! Configuration types for onlywin-amm

use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Defaults applied to newly created markets
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Trading fee in basis points
    #[serde(default = "default_fee_bps")]
    pub default_fee_bps: u32,

    /// Reserve magnitude used when seeding a pool
    #[serde(default = "default_liquidity_seed")]
    pub liquidity_seed: Decimal,
}

fn default_fee_bps() -> u32 {
    100
}
fn default_liquidity_seed() -> Decimal {
    Decimal::new(10000, 0)
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            default_fee_bps: 100,
            liquidity_seed: Decimal::new(10000, 0),
        }
    }
}

/// Demo-credit wallet provisioning
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Credits granted to a newly opened wallet
    #[serde(default = "default_starting_balance")]
    pub starting_balance: Decimal,
}

fn default_starting_balance() -> Decimal {
    Decimal::new(10000, 0)
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::new(10000, 0),
        }
    }
}

/// Reference price feed selection
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Which feed backs pool seeding
    #[serde(default)]
    pub provider: FeedProvider,

    /// API key for the odds provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sport key requested from the odds provider
    #[serde(default = "default_sport")]
    pub sport: String,

    /// Comma-separated bookmaker regions
    #[serde(default = "default_regions")]
    pub regions: String,

    /// How many days ahead to fetch fixtures for
    #[serde(default = "default_days_from")]
    pub days_from: u8,
}

/// Feed provider: fixed demo odds or a live odds API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FeedProvider {
    #[default]
    Static,
    OddsApi,
}

fn default_sport() -> String {
    "cricket".to_string()
}
fn default_regions() -> String {
    "au,eu,uk,us".to_string()
}
fn default_days_from() -> u8 {
    15
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider: FeedProvider::Static,
            api_key: None,
            sport: default_sport(),
            regions: default_regions(),
            days_from: 15,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON logs instead of human-readable ones
    #[serde(default)]
    pub log_json: bool,

    /// Port reserved for a metrics exporter
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_metrics_port() -> u16 {
    9090
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_port: 9090,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
