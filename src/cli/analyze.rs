//! Analyze command implementation

use super::{pct, usd};
use crate::config::Config;
use crate::monitor::{MonitorSettings, TokenMonitor};
use clap::Args;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Token mint address
    pub address: String,

    /// Print the analysis and signal as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = super::tracker_client(config)?;
        let generator = config.signal.generator()?;
        let monitor = TokenMonitor::new(client, generator, MonitorSettings::from(&config.monitor));

        let (analysis, signal) = monitor.evaluate_token(&self.address).await?;

        if self.json {
            let output = serde_json::json!({
                "analysis": analysis,
                "signal": signal,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        let token = &analysis.token;
        let metrics = &analysis.metrics;
        println!("{} ({})", token.name, token.symbol);
        println!("  Mint:          {}", signal.token_address);
        println!("  Price:         {}", usd(metrics.current_price));
        println!("  Market cap:    {}", usd(metrics.market_cap));
        println!("  Liquidity:     {}", usd(metrics.liquidity));
        println!("  Volume 24h:    {}", usd(metrics.volume_24h));
        println!("  Change 24h:    {}", pct(metrics.price_change_24h));
        println!("  Risk score:    {}", analysis.risk_score.normalize());
        if !analysis.risk_factors.is_empty() {
            println!("  Risk factors:  {}", analysis.risk_factors.join(", "));
        }
        println!();
        println!("Signal: {} ({}% confidence)", signal.kind, signal.confidence);
        println!("  {}", signal.reason);

        Ok(())
    }
}
