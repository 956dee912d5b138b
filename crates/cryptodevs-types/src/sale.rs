//! Sale state and the reducer that is the only way to change it.

use crate::error::MintError;
use serde::Serialize;

/// A state-changing contract call started from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleAction {
    StartPresale,
    PresaleMint,
    PublicMint,
}

impl ConsoleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartPresale => "start_presale",
            Self::PresaleMint => "presale_mint",
            Self::PublicMint => "public_mint",
        }
    }
}

impl std::fmt::Display for ConsoleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blocking, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// A presale or public mint was confirmed.
    Minted,
    /// The wallet must be moved to the required chain.
    SwitchNetwork { expected: u64 },
}

impl Notice {
    pub fn message(&self, network_name: &str) -> String {
        match self {
            Self::Minted => "successfully minted a crypto dev".to_string(),
            Self::SwitchNetwork { .. } => format!("please switch to the {network_name} network"),
        }
    }
}

/// Something that happened to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleEvent {
    WalletConnected,
    /// Chain reads carry the sequence number drawn when the read was issued.
    OwnerChecked { seq: u64, is_owner: bool },
    PresaleStartedRead { seq: u64, started: bool },
    PresaleEndedRead { seq: u64, ended: bool },
    MintedCountRead { seq: u64, count: u64 },
    ActionStarted(ConsoleAction),
    ActionFinished(ConsoleAction, Result<(), MintError>),
    /// A connect or read failed.
    Failed(MintError),
    NoticeDismissed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ReadSeqs {
    owner: u64,
    started: u64,
    ended: u64,
    minted: u64,
}

/// Everything the console shows. Replaced wholesale by [`SaleState::reduce`].
///
/// No relation between `presale_started` and `presale_ended` is enforced:
/// both are whatever the chain last reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaleState {
    pub wallet_connected: bool,
    pub loading: bool,
    pub is_owner: bool,
    pub presale_started: bool,
    pub presale_ended: bool,
    /// `None` until the first successful read.
    pub tokens_minted: Option<u64>,
    pub notice: Option<Notice>,
    pub last_error: Option<MintError>,
    #[serde(skip)]
    seqs: ReadSeqs,
}

impl SaleState {
    /// Apply one event. Reads older than the last applied read of the same
    /// field are dropped, so the last issued read wins.
    pub fn reduce(mut self, event: SaleEvent) -> Self {
        match event {
            SaleEvent::WalletConnected => {
                self.wallet_connected = true;
                if matches!(self.notice, Some(Notice::SwitchNetwork { .. })) {
                    self.notice = None;
                }
                if matches!(self.last_error, Some(MintError::WrongNetwork { .. })) {
                    self.last_error = None;
                }
            }
            SaleEvent::OwnerChecked { seq, is_owner } => {
                if seq > self.seqs.owner {
                    self.seqs.owner = seq;
                    self.is_owner = is_owner;
                }
            }
            SaleEvent::PresaleStartedRead { seq, started } => {
                if seq > self.seqs.started {
                    self.seqs.started = seq;
                    self.presale_started = started;
                }
            }
            SaleEvent::PresaleEndedRead { seq, ended } => {
                if seq > self.seqs.ended {
                    self.seqs.ended = seq;
                    self.presale_ended = ended;
                }
            }
            SaleEvent::MintedCountRead { seq, count } => {
                if seq > self.seqs.minted {
                    self.seqs.minted = seq;
                    self.tokens_minted = Some(count);
                }
            }
            SaleEvent::ActionStarted(_) => {
                self.loading = true;
                self.notice = None;
            }
            SaleEvent::ActionFinished(action, Ok(())) => {
                self.loading = false;
                self.last_error = None;
                match action {
                    ConsoleAction::StartPresale => self.presale_started = true,
                    ConsoleAction::PresaleMint | ConsoleAction::PublicMint => {
                        self.notice = Some(Notice::Minted)
                    }
                }
            }
            SaleEvent::ActionFinished(_, Err(e)) => {
                self.loading = false;
                self = self.record_error(e);
            }
            SaleEvent::Failed(e) => {
                self = self.record_error(e);
            }
            SaleEvent::NoticeDismissed => self.notice = None,
        }
        self
    }

    fn record_error(mut self, e: MintError) -> Self {
        if let MintError::WrongNetwork { expected, .. } = e {
            self.notice = Some(Notice::SwitchNetwork { expected });
        }
        self.last_error = Some(e);
        self
    }
}

/// Compare two hex addresses ignoring checksum casing and the `0x` prefix.
pub fn is_same_address(a: &str, b: &str) -> bool {
    fn strip(s: &str) -> &str {
        let s = s.trim();
        s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s)
    }
    let (a, b) = (strip(a), strip(b));
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}
