//! In-memory sale contract and app builders shared by the integration tests.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use cryptodevs_console::{create_router, AppState, Config, SaleContract};
use cryptodevs_types::MintError;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const BUYER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Presale window opened by `startPresale`, in seconds.
pub const PRESALE_WINDOW_SECS: u64 = 5 * 60;

#[derive(Debug, Clone)]
pub struct ChainState {
    pub chain_id: u64,
    pub signer: Option<String>,
    pub whitelisted: bool,
    pub presale_started: bool,
    pub presale_end: u64,
    pub token_ids: u64,
    pub max_supply: u64,
    /// The next signing request is declined by the wallet.
    pub reject_next: bool,
    pub transport_down: bool,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            chain_id: 4,
            signer: Some(BUYER.to_string()),
            whitelisted: true,
            presale_started: false,
            presale_end: 0,
            token_ids: 0,
            max_supply: 20,
            reject_next: false,
            transport_down: false,
        }
    }
}

/// Crypto Devs sale contract simulated in memory, behind the same network
/// guard the ethers-backed binding applies.
pub struct FakeSaleContract {
    expected_chain_id: u64,
    pub chain: Mutex<ChainState>,
}

impl FakeSaleContract {
    pub fn new(chain: ChainState) -> Arc<Self> {
        Arc::new(Self {
            expected_chain_id: 4,
            chain: Mutex::new(chain),
        })
    }

    pub fn update(&self, f: impl FnOnce(&mut ChainState)) {
        f(&mut self.chain.lock().unwrap());
    }

    fn guarded(&self) -> Result<std::sync::MutexGuard<'_, ChainState>, MintError> {
        let chain = self.chain.lock().unwrap();
        if chain.transport_down {
            return Err(MintError::TransportFailure("connection refused".into()));
        }
        if chain.chain_id != self.expected_chain_id {
            return Err(MintError::WrongNetwork {
                expected: self.expected_chain_id,
                actual: chain.chain_id,
            });
        }
        Ok(chain)
    }

    fn signing(&self) -> Result<std::sync::MutexGuard<'_, ChainState>, MintError> {
        let mut chain = self.guarded()?;
        if chain.signer.is_none() {
            return Err(MintError::SignerUnavailable);
        }
        if std::mem::take(&mut chain.reject_next) {
            return Err(MintError::UserRejected("User denied transaction signature.".into()));
        }
        Ok(chain)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn revert(reason: &str) -> MintError {
    MintError::CallReverted(format!("execution reverted: {reason}"))
}

#[async_trait]
impl SaleContract for FakeSaleContract {
    async fn connect(&self) -> Result<(), MintError> {
        self.guarded().map(|_| ())
    }

    async fn signer_address(&self) -> Result<String, MintError> {
        let chain = self.guarded()?;
        chain.signer.clone().ok_or(MintError::SignerUnavailable)
    }

    async fn owner(&self) -> Result<String, MintError> {
        self.guarded().map(|_| OWNER.to_string())
    }

    async fn presale_started(&self) -> Result<bool, MintError> {
        self.guarded().map(|c| c.presale_started)
    }

    async fn presale_ended(&self) -> Result<u64, MintError> {
        self.guarded().map(|c| c.presale_end)
    }

    async fn token_ids(&self) -> Result<u64, MintError> {
        self.guarded().map(|c| c.token_ids)
    }

    async fn start_presale(&self) -> Result<(), MintError> {
        let mut chain = self.signing()?;
        if !chain
            .signer
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(OWNER))
        {
            return Err(revert("Ownable: caller is not the owner"));
        }
        chain.presale_started = true;
        chain.presale_end = now_secs() + PRESALE_WINDOW_SECS;
        Ok(())
    }

    async fn presale_mint(&self) -> Result<(), MintError> {
        let mut chain = self.signing()?;
        if !chain.presale_started || chain.presale_end < now_secs() {
            return Err(revert("Presale is not running"));
        }
        if !chain.whitelisted {
            return Err(revert("You are not whitelisted"));
        }
        if chain.token_ids >= chain.max_supply {
            return Err(revert("Exceeded maximum Crypto Devs supply"));
        }
        chain.token_ids += 1;
        Ok(())
    }

    async fn mint(&self) -> Result<(), MintError> {
        let mut chain = self.signing()?;
        if !chain.presale_started || chain.presale_end >= now_secs() {
            return Err(revert("Presale has not ended yet"));
        }
        if chain.token_ids >= chain.max_supply {
            return Err(revert("Exceed maximum Crypto Devs supply"));
        }
        chain.token_ids += 1;
        Ok(())
    }
}

/// Router plus shared state over `contract`.
pub fn build_app(contract: Arc<FakeSaleContract>, config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, contract));
    (create_router(Arc::clone(&state)), state)
}

/// Send one request and decode the JSON body (`Null` for non-JSON bodies).
pub async fn call(app: &Router, method: &str, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes).unwrap_or(Value::Null)))
}

/// Send one request and return the body as text.
pub async fn call_text(app: &Router, uri: &str) -> anyhow::Result<(StatusCode, String)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}
