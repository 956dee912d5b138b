//! Wallet session: provider, optional signing key, and the network guard.

use crate::config::Config;
use cryptodevs_types::MintError;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider, ProviderError, RpcError};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U256};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

/// Provider wrapped with the local signing key.
pub type SigningClient<P> = SignerMiddleware<Provider<P>, LocalWallet>;

/// Chain access granted by [`Session::acquire_handle`].
pub enum Handle<P: JsonRpcClient> {
    /// View calls only.
    ReadOnly(Arc<Provider<P>>),
    /// Can submit state-changing transactions.
    Signing(Arc<SigningClient<P>>),
}

impl<P: JsonRpcClient + Clone> Handle<P> {
    pub fn is_signing(&self) -> bool {
        matches!(self, Handle::Signing(_))
    }

    /// Provider for view calls. A signing handle yields its inner provider.
    pub fn into_read_only(self) -> Arc<Provider<P>> {
        match self {
            Handle::ReadOnly(provider) => provider,
            Handle::Signing(client) => Arc::new(client.inner().clone()),
        }
    }

    pub fn into_signing(self) -> Result<Arc<SigningClient<P>>, MintError> {
        match self {
            Handle::Signing(client) => Ok(client),
            Handle::ReadOnly(_) => Err(MintError::SignerUnavailable),
        }
    }
}

/// One wallet connection, held for the console's lifetime.
pub struct Session<P: JsonRpcClient> {
    provider: Arc<Provider<P>>,
    wallet: Option<LocalWallet>,
    expected_chain_id: u64,
    network_name: String,
    /// Built on first signing request, then reused.
    signer: OnceCell<Arc<SigningClient<P>>>,
}

impl Session<Http> {
    /// Session over HTTP JSON-RPC using the configured URL and signing key.
    pub fn from_config(config: &Config) -> Result<Self, crate::Error> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| crate::Error::Rpc(format!("Invalid RPC url: {e}")))?;
        let wallet = config
            .private_key
            .as_deref()
            .map(parse_wallet)
            .transpose()?;

        match &wallet {
            Some(w) => info!(address = ?w.address(), "Loaded signing key"),
            None => info!("No signing key configured, console is read-only"),
        }

        Ok(Self::new(
            provider,
            wallet,
            config.chain_id,
            config.network_name.clone(),
        ))
    }
}

impl<P> Session<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    pub fn new(
        provider: Provider<P>,
        wallet: Option<LocalWallet>,
        expected_chain_id: u64,
        network_name: impl Into<String>,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            wallet,
            expected_chain_id,
            network_name: network_name.into(),
            signer: OnceCell::new(),
        }
    }

    /// Address of the signing key, if one is configured.
    pub fn wallet_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(Signer::address)
    }

    /// Check the network, then hand out a read-only or signing handle.
    pub async fn acquire_handle(&self, signing: bool) -> Result<Handle<P>, MintError> {
        if signing {
            self.signing_handle().await.map(Handle::Signing)
        } else {
            self.read_only_handle().await.map(Handle::ReadOnly)
        }
    }

    async fn read_only_handle(&self) -> Result<Arc<Provider<P>>, MintError> {
        self.check_network().await?;
        Ok(Arc::clone(&self.provider))
    }

    async fn signing_handle(&self) -> Result<Arc<SigningClient<P>>, MintError> {
        self.check_network().await?;
        let wallet = self.wallet.as_ref().ok_or(MintError::SignerUnavailable)?;
        let client = self
            .signer
            .get_or_init(|| async {
                debug!(address = ?wallet.address(), "Creating signing client");
                Arc::new(SignerMiddleware::new(
                    (*self.provider).clone(),
                    wallet.clone().with_chain_id(self.expected_chain_id),
                ))
            })
            .await;
        Ok(Arc::clone(client))
    }

    async fn check_network(&self) -> Result<(), MintError> {
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(provider_error)?;
        let actual = saturating_u64(chain_id);

        ensure_network(self.expected_chain_id, actual).inspect_err(|_| {
            error!(
                expected = self.expected_chain_id,
                actual,
                "please switch to the {} network",
                self.network_name
            );
        })
    }
}

/// The single validation in the console: the wallet must be on `expected`.
pub fn ensure_network(expected: u64, actual: u64) -> Result<(), MintError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MintError::WrongNetwork { expected, actual })
    }
}

/// Map a provider failure onto the console's error taxonomy.
pub(crate) fn provider_error(e: ProviderError) -> MintError {
    match RpcError::as_error_response(&e) {
        Some(rpc) => MintError::from_rpc(rpc.code, &rpc.message),
        None => MintError::TransportFailure(e.to_string()),
    }
}

pub(crate) fn saturating_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

fn parse_wallet(key: &str) -> Result<LocalWallet, crate::Error> {
    let key = key.trim();
    key.strip_prefix("0x")
        .unwrap_or(key)
        .parse::<LocalWallet>()
        .map_err(|e| crate::Error::Config(format!("Invalid private key: {e}")))
}
