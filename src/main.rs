use clap::Parser;
use onlywin_amm::cli::{Cli, Commands};
use onlywin_amm::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _telemetry = onlywin_amm::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Demo(args) => {
            tracing::info!("Starting demo session");
            args.execute(&config).await?;
        }
        Commands::Fixtures(args) => {
            tracing::info!("Listing fixtures from odds feed");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Market: fee {} bps, liquidity seed {}",
                config.market.default_fee_bps, config.market.liquidity_seed
            );
            println!("  Wallet: starting balance {}", config.wallet.starting_balance);
            println!(
                "  Feed: {:?} ({}, regions {})",
                config.feed.provider, config.feed.sport, config.feed.regions
            );
            println!(
                "  Telemetry: level {}, json {}",
                config.telemetry.log_level, config.telemetry.log_json
            );
        }
    }

    Ok(())
}
