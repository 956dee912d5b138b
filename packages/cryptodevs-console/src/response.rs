//! Response types for the console API.

use cryptodevs_types::{Affordance, MintError, SaleState};
use serde::Serialize;

/// Snapshot returned by `GET /state`.
#[derive(Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: SaleState,
    pub affordance: Affordance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_text: Option<String>,
    pub max_supply: u64,
    pub in_flight: bool,
}

impl StateResponse {
    pub fn new(state: SaleState, max_supply: u64, network_name: &str, in_flight: bool) -> Self {
        let affordance = Affordance::from_state(&state);
        Self {
            notice_text: state.notice.as_ref().map(|n| n.message(network_name)),
            message: affordance.message(),
            button: affordance.button(),
            affordance,
            state,
            max_supply,
            in_flight,
        }
    }
}

/// Response from the action endpoints.
#[derive(Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub affordance: Affordance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub contract: String,
    pub chain_id: u64,
    pub network: String,
    pub wallet_connected: bool,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<MintError>,
}
