//! The single UI element offered for a given sale state.

use crate::sale::{ConsoleAction, SaleState};
use serde::Serialize;

/// Mutually exclusive console affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    ConnectWallet,
    Loading,
    StartPresale,
    ComeBackLater,
    PresaleMint,
    PublicMint,
}

impl Affordance {
    /// Pick the affordance. Checks run in priority order, so an ended but
    /// never-started presale still shows the pre-sale affordances.
    pub fn select(
        wallet_connected: bool,
        loading: bool,
        is_owner: bool,
        presale_started: bool,
        presale_ended: bool,
    ) -> Self {
        if !wallet_connected {
            Self::ConnectWallet
        } else if loading {
            Self::Loading
        } else if is_owner && !presale_started {
            Self::StartPresale
        } else if !presale_started {
            Self::ComeBackLater
        } else if !presale_ended {
            Self::PresaleMint
        } else {
            Self::PublicMint
        }
    }

    pub fn from_state(state: &SaleState) -> Self {
        Self::select(
            state.wallet_connected,
            state.loading,
            state.is_owner,
            state.presale_started,
            state.presale_ended,
        )
    }

    /// Descriptive text shown alongside (or instead of) the button.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::ConnectWallet | Self::StartPresale => None,
            Self::Loading => Some("Loading..."),
            Self::ComeBackLater => Some("Presale not started yet, come back later!"),
            Self::PresaleMint => Some(
                "Presale has started, if your address is whitelisted, you can mint a crypto dev.",
            ),
            Self::PublicMint => {
                Some("Presale has ended. You can mint crypto dev in public sale, if any remain.")
            }
        }
    }

    /// Button label, if the affordance is actionable.
    pub fn button(&self) -> Option<&'static str> {
        match self {
            Self::ConnectWallet => Some("Connect Wallet"),
            Self::StartPresale => Some("Start Presale"),
            Self::PresaleMint => Some("Presale mint"),
            Self::PublicMint => Some("Public mint"),
            Self::Loading | Self::ComeBackLater => None,
        }
    }

    /// Contract action behind the button. Connecting is not a contract action.
    pub fn action(&self) -> Option<ConsoleAction> {
        match self {
            Self::StartPresale => Some(ConsoleAction::StartPresale),
            Self::PresaleMint => Some(ConsoleAction::PresaleMint),
            Self::PublicMint => Some(ConsoleAction::PublicMint),
            _ => None,
        }
    }
}
