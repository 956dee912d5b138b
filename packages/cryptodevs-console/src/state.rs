//! Application state shared across handlers.

use crate::config::Config;
use crate::console::MintConsole;
use crate::contract::{EthersSaleContract, SaleContract};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub console: Arc<MintConsole>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, contract: Arc<dyn SaleContract>) -> Self {
        Self {
            config,
            console: Arc::new(MintConsole::new(contract)),
            start_time: Instant::now(),
        }
    }

    /// Create application state bound to the configured contract over HTTP JSON-RPC.
    pub fn from_config(config: Config) -> Result<Self, crate::Error> {
        let contract = EthersSaleContract::from_config(&config)?;
        info!(
            contract = %config.contract_address,
            chain_id = config.chain_id,
            signing = contract.session().wallet_address().is_some(),
            "Console state initialised"
        );
        Ok(Self::new(config, Arc::new(contract)))
    }
}
