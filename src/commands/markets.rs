//! Markets command implementation

use anyhow::Result;
use indodax_signals::Config;
use itertools::Itertools;
use tracing::info;

pub fn run(config: Config) -> Result<()> {
    let client = super::client(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let markets = rt.block_on(client.get_pairs())?;

    info!("Fetched {} markets", markets.len());

    for chunk in &markets.iter().chunks(8) {
        println!("{}", chunk.map(|m| format!("{:<14}", m)).join(""));
    }
    println!("\nTotal: {} markets", markets.len());

    Ok(())
}
