use serde::Serialize;

/// JSON-RPC code for a request the user declined in the wallet (EIP-1193).
const USER_REJECTED_CODE: i64 = 4001;
/// JSON-RPC code nodes return for `eth_call`/`eth_estimateGas` reverts.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Failure of a wallet or contract operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MintError {
    /// Wallet is connected to a chain other than the required one.
    WrongNetwork { expected: u64, actual: u64 },
    /// The wallet declined to sign.
    UserRejected(String),
    /// The contract reverted, or the mined receipt reports failure.
    CallReverted(String),
    /// RPC transport, decoding, or dropped transaction.
    TransportFailure(String),
    /// A signing handle was requested but no signing key is configured.
    SignerUnavailable,
}

impl MintError {
    /// Classify a JSON-RPC error response.
    pub fn from_rpc(code: i64, message: &str) -> Self {
        if code == USER_REJECTED_CODE {
            Self::UserRejected(message.to_string())
        } else if code == EXECUTION_REVERTED_CODE || message.to_ascii_lowercase().contains("revert") {
            Self::CallReverted(message.to_string())
        } else {
            Self::TransportFailure(format!("rpc error {code}: {message}"))
        }
    }

    /// Short machine-readable name, used in HTTP bodies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WrongNetwork { .. } => "wrong_network",
            Self::UserRejected(_) => "user_rejected",
            Self::CallReverted(_) => "call_reverted",
            Self::TransportFailure(_) => "transport_failure",
            Self::SignerUnavailable => "signer_unavailable",
        }
    }
}

impl std::fmt::Display for MintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongNetwork { expected, actual } => {
                write!(f, "incorrect network: expected chain {expected}, connected to {actual}")
            }
            Self::UserRejected(msg) => write!(f, "user rejected: {msg}"),
            Self::CallReverted(msg) => write!(f, "call reverted: {msg}"),
            Self::TransportFailure(msg) => write!(f, "transport failure: {msg}"),
            Self::SignerUnavailable => write!(f, "no signing key configured"),
        }
    }
}

impl std::error::Error for MintError {}
