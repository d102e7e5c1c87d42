//! All-time high command implementation

use super::usd;
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct AthArgs {
    /// Token mint address
    pub address: String,
}

impl AthArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = super::tracker_client(config)?;
        let ath = client.token_ath(&self.address).await?;

        println!("All-time high: {}", usd(ath.price));
        match ath.reached_at() {
            Some(at) => println!("  Reached: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("  Reached: unknown"),
        }
        Ok(())
    }
}
