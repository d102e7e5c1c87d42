//! Trending command implementation

use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct TrendingArgs {
    /// Maximum tokens to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

impl TrendingArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = super::tracker_client(config)?;
        let tokens = client.trending().await?;

        println!("Trending tokens:");
        for (rank, token) in tokens.iter().take(self.limit).enumerate() {
            println!(
                "  {:>2}. {:<10} {:<24} {}",
                rank + 1,
                token.symbol,
                token.name,
                token.mint
            );
        }
        Ok(())
    }
}
