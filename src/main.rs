use clap::Parser;
use token_signals::cli::{Cli, Commands};
use token_signals::config::{Config, ConfigError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io { path, source }) => {
            eprintln!(
                "Warning: Could not load config from {}: {}",
                path.display(),
                source
            );
            eprintln!("Using default configuration");
            Config::from_env()?
        }
        Err(e) => return Err(e.into()),
    };

    // Initialize telemetry
    let _telemetry = token_signals::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Analyze(args) => args.execute(&config).await?,
        Commands::Monitor(args) => {
            tracing::info!("Starting token monitor");
            args.execute(&config).await?;
        }
        Commands::Trending(args) => args.execute(&config).await?,
        Commands::Holders(args) => args.execute(&config).await?,
        Commands::Ath(args) => args.execute(&config).await?,
        Commands::Config => {
            let mut shown = config.clone();
            if shown.tracker.api_key.is_some() {
                shown.tracker.api_key = Some("<redacted>".to_string());
            }
            println!("Current configuration:");
            println!("{}", toml::to_string_pretty(&shown)?);
        }
    }

    Ok(())
}
