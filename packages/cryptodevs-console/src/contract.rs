//! Typed binding for the Crypto Devs sale contract.
//!
//! [`SaleContract`] is the seam the console talks to; [`EthersSaleContract`]
//! implements it over a [`Session`], acquiring a read-only handle for views
//! and a signing handle for mutations on every call.

use crate::config::Config;
use crate::session::{provider_error, saturating_u64, Session};
use async_trait::async_trait;
use cryptodevs_types::MintError;
use ethers::abi::Detokenize;
use ethers::contract::{abigen, ContractCall, ContractError};
use ethers::providers::{Http, JsonRpcClient, Middleware, MiddlewareError, RpcError};
use ethers::types::{Address, U256, U64};
use ethers::utils::{parse_ether, to_checksum};
use tracing::info;

abigen!(
    CryptoDevs,
    r#"[
        function owner() view returns (address)
        function presaleStarted() view returns (bool)
        function presaleEnded() view returns (uint256)
        function tokenIds() view returns (uint256)
        function startPresale()
        function presaleMint() payable
        function mint() payable
    ]"#,
);

/// Remote operations the console needs from the sale contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleContract: Send + Sync {
    /// Establish the wallet connection (network guard included).
    async fn connect(&self) -> Result<(), MintError>;
    /// Checksummed address of the signing wallet.
    async fn signer_address(&self) -> Result<String, MintError>;
    /// Checksummed address of the contract owner.
    async fn owner(&self) -> Result<String, MintError>;
    async fn presale_started(&self) -> Result<bool, MintError>;
    /// Unix timestamp (seconds) at which the presale window closes.
    async fn presale_ended(&self) -> Result<u64, MintError>;
    /// Number of tokens minted so far.
    async fn token_ids(&self) -> Result<u64, MintError>;
    async fn start_presale(&self) -> Result<(), MintError>;
    async fn presale_mint(&self) -> Result<(), MintError>;
    async fn mint(&self) -> Result<(), MintError>;
}

/// [`SaleContract`] over an ethers provider.
pub struct EthersSaleContract<P: JsonRpcClient> {
    session: Session<P>,
    address: Address,
    mint_price: U256,
}

impl EthersSaleContract<Http> {
    pub fn from_config(config: &Config) -> Result<Self, crate::Error> {
        let address: Address = config
            .contract_address
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid contract address: {e}")))?;
        if address.is_zero() {
            return Err(crate::Error::Config(
                "contract address is not set (CRYPTODEVS_CONTRACT_ADDRESS)".into(),
            ));
        }
        let mint_price = parse_ether(&config.mint_price_ether)
            .map_err(|e| crate::Error::Config(format!("Invalid mint price: {e}")))?;
        Ok(Self::new(Session::from_config(config)?, address, mint_price))
    }
}

impl<P> EthersSaleContract<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    pub fn new(session: Session<P>, address: Address, mint_price: U256) -> Self {
        info!(contract = ?address, price_wei = %mint_price, "Sale contract bound");
        Self {
            session,
            address,
            mint_price,
        }
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    async fn viewer(&self) -> Result<CryptoDevs<ethers::providers::Provider<P>>, MintError> {
        let provider = self.session.acquire_handle(false).await?.into_read_only();
        Ok(CryptoDevs::new(self.address, provider))
    }

    async fn signer(
        &self,
    ) -> Result<CryptoDevs<crate::session::SigningClient<P>>, MintError> {
        let client = self.session.acquire_handle(true).await?.into_signing()?;
        Ok(CryptoDevs::new(self.address, client))
    }
}

#[async_trait]
impl<P> SaleContract for EthersSaleContract<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    async fn connect(&self) -> Result<(), MintError> {
        self.session.acquire_handle(false).await.map(|_| ())
    }

    async fn signer_address(&self) -> Result<String, MintError> {
        let client = self.session.acquire_handle(true).await?.into_signing()?;
        Ok(to_checksum(&client.address(), None))
    }

    async fn owner(&self) -> Result<String, MintError> {
        let owner = self.viewer().await?.owner().call().await.map_err(classify)?;
        Ok(to_checksum(&owner, None))
    }

    async fn presale_started(&self) -> Result<bool, MintError> {
        self.viewer()
            .await?
            .presale_started()
            .call()
            .await
            .map_err(classify)
    }

    async fn presale_ended(&self) -> Result<u64, MintError> {
        let end = self
            .viewer()
            .await?
            .presale_ended()
            .call()
            .await
            .map_err(classify)?;
        Ok(saturating_u64(end))
    }

    async fn token_ids(&self) -> Result<u64, MintError> {
        let count = self
            .viewer()
            .await?
            .token_ids()
            .call()
            .await
            .map_err(classify)?;
        Ok(saturating_u64(count))
    }

    async fn start_presale(&self) -> Result<(), MintError> {
        let contract = self.signer().await?;
        confirm(contract.start_presale()).await
    }

    async fn presale_mint(&self) -> Result<(), MintError> {
        let contract = self.signer().await?;
        confirm(contract.presale_mint().value(self.mint_price)).await
    }

    async fn mint(&self) -> Result<(), MintError> {
        let contract = self.signer().await?;
        confirm(contract.mint().value(self.mint_price)).await
    }
}

/// Submit `call` and wait until the network confirms it.
async fn confirm<M, D>(call: ContractCall<M, D>) -> Result<(), MintError>
where
    M: Middleware + 'static,
    D: Detokenize + Send + Sync,
{
    let pending = call.send().await.map_err(classify)?;
    let tx_hash = pending.tx_hash();
    info!(tx = ?tx_hash, "Transaction submitted, waiting for confirmation");

    match pending.await.map_err(provider_error)? {
        // Pre-Byzantium receipts carry no status.
        Some(receipt) if receipt.status.map_or(true, |s| s == U64::from(1u64)) => {
            info!(tx = ?tx_hash, block = ?receipt.block_number, "Transaction confirmed");
            Ok(())
        }
        Some(_) => Err(MintError::CallReverted(format!(
            "transaction {tx_hash:?} reverted"
        ))),
        None => Err(MintError::TransportFailure(format!(
            "transaction {tx_hash:?} dropped before confirmation"
        ))),
    }
}

fn classify<M: Middleware>(err: ContractError<M>) -> MintError {
    if err.is_revert() {
        return MintError::CallReverted(err.to_string());
    }
    let response = err
        .as_middleware_error()
        .and_then(|e| MiddlewareError::as_error_response(e))
        .or_else(|| {
            err.as_provider_error()
                .and_then(|e| RpcError::as_error_response(e))
        });
    match response {
        Some(rpc) => MintError::from_rpc(rpc.code, &rpc.message),
        None => MintError::TransportFailure(err.to_string()),
    }
}
