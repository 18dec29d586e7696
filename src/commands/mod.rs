pub mod analyze;
pub mod markets;
pub mod screen;
pub mod serve;

use anyhow::Result;
use indodax_signals::{Config, IndodaxClient};
use std::time::Duration;

/// Build the exchange client from the `exchange` config section
pub fn client(config: &Config) -> Result<IndodaxClient> {
    IndodaxClient::with_config(
        config.exchange.base_url.clone(),
        Duration::from_secs(config.exchange.timeout_secs),
    )
}
