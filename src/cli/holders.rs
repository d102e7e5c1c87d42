//! Holders command implementation

use super::{pct, usd};
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct HoldersArgs {
    /// Token mint address
    pub address: String,

    /// Maximum holders to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

impl HoldersArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = super::tracker_client(config)?;
        let holders = client.token_holders(&self.address).await?;

        println!("Holders: {}", holders.total);
        for holder in holders.accounts.iter().take(self.limit) {
            println!(
                "  {:<44} {:>10}  {}",
                holder.wallet,
                pct(holder.percentage),
                usd(holder.value.usd)
            );
        }
        Ok(())
    }
}
