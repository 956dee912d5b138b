//! Console configuration.

use serde::Deserialize;
use std::time::Duration;

/// Configuration for the mint console and metadata server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    /// The only chain the wallet may be connected to.
    #[serde(default = "defaults::chain_id")]
    pub chain_id: u64,

    /// Human name of `chain_id`, shown in the switch-network notice.
    #[serde(default = "defaults::network_name")]
    pub network_name: String,

    #[serde(default = "defaults::contract_address")]
    pub contract_address: String,

    /// Hex signing key. Without one the console is read-only.
    #[serde(default = "defaults::private_key")]
    pub private_key: Option<String>,

    /// Fee attached to presale and public mints, in ether.
    #[serde(default = "defaults::mint_price_ether")]
    pub mint_price_ether: String,

    #[serde(default = "defaults::max_supply")]
    pub max_supply: u64,

    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "defaults::image_base_url")]
    pub image_base_url: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Required on action endpoints when set (`X-Api-Key` or `Bearer`).
    #[serde(default = "defaults::api_key")]
    pub api_key: Option<String>,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            chain_id: defaults::chain_id(),
            network_name: defaults::network_name(),
            contract_address: defaults::contract_address(),
            private_key: defaults::private_key(),
            mint_price_ether: defaults::mint_price_ether(),
            max_supply: defaults::max_supply(),
            poll_interval_secs: defaults::poll_interval_secs(),
            image_base_url: defaults::image_base_url(),
            bind_address: defaults::bind_address(),
            api_key: defaults::api_key(),
        }
    }
}

mod defaults {
    pub fn rpc_url() -> String {
        std::env::var("RINKEBY_RPC_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| "https://rinkeby.infura.io/v3/".into())
    }

    pub fn chain_id() -> u64 {
        4
    }

    pub fn network_name() -> String {
        "Rinkeby".into()
    }

    pub fn contract_address() -> String {
        "0x0000000000000000000000000000000000000000".into()
    }

    pub fn private_key() -> Option<String> {
        std::env::var("CRYPTODEVS_PRIVATE_KEY")
            .ok()
            .filter(|k| !k.is_empty())
    }

    pub fn mint_price_ether() -> String {
        "0.01".into()
    }

    pub fn max_supply() -> u64 {
        20
    }

    pub fn poll_interval_secs() -> u64 {
        5
    }

    pub fn image_base_url() -> String {
        cryptodevs_types::DEFAULT_IMAGE_BASE_URL.into()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3000".into()
    }

    pub fn api_key() -> Option<String> {
        std::env::var("CRYPTODEVS_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
    }
}
