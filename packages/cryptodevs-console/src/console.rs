//! The mint console view-model.
//!
//! Every operation talks to the contract through [`SaleContract`], catches
//! its own failure, and feeds the outcome into [`SaleState::reduce`]. The
//! current state is published on a `watch` channel so renderers always see
//! one consistent value.

use crate::contract::SaleContract;
use crate::error::ActionError;
use crate::metrics::METRICS;
use crate::poller::Pollers;
use cryptodevs_types::{is_same_address, Affordance, ConsoleAction, MintError, SaleEvent, SaleState};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Page controller: owns the contract session and the sale state.
pub struct MintConsole {
    contract: Arc<dyn SaleContract>,
    state: watch::Sender<SaleState>,
    /// Set synchronously before a mutation is dispatched.
    in_flight: AtomicBool,
    read_seq: AtomicU64,
    clock: fn() -> u64,
}

/// Clears the in-flight token on drop.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl MintConsole {
    pub fn new(contract: Arc<dyn SaleContract>) -> Self {
        let (state, _) = watch::channel(SaleState::default());
        Self {
            contract,
            state,
            in_flight: AtomicBool::new(false),
            read_seq: AtomicU64::new(0),
            clock: now_secs,
        }
    }

    /// Replace the wall clock used to decide whether the presale has ended.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn snapshot(&self) -> SaleState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaleState> {
        self.state.subscribe()
    }

    pub fn affordance(&self) -> Affordance {
        Affordance::from_state(&self.state.borrow())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Bootstrap, then refresh the minted count and presale flags every
    /// `interval` until the returned [`Pollers`] is shut down or dropped.
    pub fn spawn_pollers(self: &Arc<Self>, interval: Duration) -> Pollers {
        Pollers::start(Arc::clone(self), interval)
    }

    /// Clear the current notice (the user dismissed the alert).
    pub fn dismiss_notice(&self) {
        self.apply(SaleEvent::NoticeDismissed);
    }

    fn apply(&self, event: SaleEvent) {
        self.state
            .send_modify(|state| *state = std::mem::take(state).reduce(event));
    }

    fn next_seq(&self) -> u64 {
        self.read_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn fail(&self, op: &'static str, e: MintError) {
        match &e {
            MintError::WrongNetwork { .. } => {
                METRICS.wrong_network.fetch_add(1, Ordering::Relaxed);
                warn!(op, error = %e, "Wallet on wrong network");
            }
            _ => error!(op, kind = e.kind(), error = %e, "Console operation failed"),
        }
        self.apply(SaleEvent::Failed(e));
    }

    fn record_read<T>(&self, op: &'static str, result: Result<T, MintError>) -> Result<T, MintError> {
        METRICS.read_total.fetch_add(1, Ordering::Relaxed);
        result.inspect_err(|e| {
            METRICS.read_errors.fetch_add(1, Ordering::Relaxed);
            self.fail(op, e.clone());
        })
    }

    // --- Wallet ---

    pub async fn connect_wallet(&self) -> Result<(), MintError> {
        match self.contract.connect().await {
            Ok(()) => {
                info!("Wallet connected");
                self.apply(SaleEvent::WalletConnected);
                Ok(())
            }
            Err(e) => {
                self.fail("connect_wallet", e.clone());
                Err(e)
            }
        }
    }

    // --- Reads ---

    /// Compare the contract owner with the signing wallet.
    ///
    /// Without a signing key the console can never act as owner, so that
    /// case reads as "not owner" rather than as a failure.
    pub async fn check_owner(&self) -> Result<bool, MintError> {
        let seq = self.next_seq();
        let result = async {
            let owner = self.contract.owner().await?;
            let is_owner = match self.contract.signer_address().await {
                Ok(me) => is_same_address(&owner, &me),
                Err(MintError::SignerUnavailable) => false,
                Err(e) => return Err(e),
            };
            Ok::<bool, MintError>(is_owner)
        }
        .await;

        let is_owner = self.record_read("check_owner", result)?;
        debug!(is_owner, "Ownership checked");
        self.apply(SaleEvent::OwnerChecked { seq, is_owner });
        Ok(is_owner)
    }

    /// Read the presale-started flag. While the presale has not started,
    /// ownership is re-checked so the owner sees the start button.
    pub async fn check_presale_started(&self) -> Result<bool, MintError> {
        let seq = self.next_seq();
        let result = self.contract.presale_started().await;
        let started = self.record_read("check_presale_started", result)?;
        self.apply(SaleEvent::PresaleStartedRead { seq, started });
        if !started {
            let _ = self.check_owner().await;
        }
        Ok(started)
    }

    /// Read the presale end time and compare it with the wall clock.
    pub async fn check_presale_ended(&self) -> Result<bool, MintError> {
        let seq = self.next_seq();
        let result = self.contract.presale_ended().await;
        let end = self.record_read("check_presale_ended", result)?;
        let ended = end < (self.clock)();
        debug!(end, ended, "Presale end checked");
        self.apply(SaleEvent::PresaleEndedRead { seq, ended });
        Ok(ended)
    }

    pub async fn refresh_minted(&self) -> Result<u64, MintError> {
        let seq = self.next_seq();
        let result = self.contract.token_ids().await;
        let count = self.record_read("refresh_minted", result)?;
        self.apply(SaleEvent::MintedCountRead { seq, count });
        Ok(count)
    }

    /// Presale flags, reconnecting first if the wallet is not connected.
    pub async fn refresh_sale_state(&self) {
        let connected = self.state.borrow().wallet_connected;
        if !connected && self.connect_wallet().await.is_err() {
            return;
        }
        if let Ok(true) = self.check_presale_started().await {
            let _ = self.check_presale_ended().await;
        }
    }

    /// Initial load: connect, then [`load`](Self::load).
    pub async fn bootstrap(&self) {
        if self.connect_wallet().await.is_err() {
            warn!("Bootstrap stopped: wallet not connected");
            return;
        }
        self.load().await;
    }

    /// Ownership, presale flags, minted count. Failures land in the state.
    pub async fn load(&self) {
        let _ = self.check_owner().await;
        if let Ok(true) = self.check_presale_started().await {
            let _ = self.check_presale_ended().await;
        }
        let _ = self.refresh_minted().await;
        info!(state = ?self.affordance(), "Console state loaded");
    }

    // --- Mutations ---

    pub async fn start_presale(&self) -> Result<(), ActionError> {
        self.run(ConsoleAction::StartPresale).await
    }

    pub async fn presale_mint(&self) -> Result<(), ActionError> {
        self.run(ConsoleAction::PresaleMint).await
    }

    pub async fn public_mint(&self) -> Result<(), ActionError> {
        self.run(ConsoleAction::PublicMint).await
    }

    /// Run one state-changing action. Refused while another is in flight.
    pub async fn run(&self, action: ConsoleAction) -> Result<(), ActionError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            METRICS.action_refused.fetch_add(1, Ordering::Relaxed);
            warn!(%action, "Action refused, another transaction is in flight");
            return Err(ActionError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let start = Instant::now();
        METRICS.action_total.fetch_add(1, Ordering::Relaxed);
        info!(%action, "Submitting transaction");
        self.apply(SaleEvent::ActionStarted(action));

        let result = match action {
            ConsoleAction::StartPresale => self.contract.start_presale().await,
            ConsoleAction::PresaleMint => self.contract.presale_mint().await,
            ConsoleAction::PublicMint => self.contract.mint().await,
        };
        METRICS.record_action_duration(start);

        match &result {
            Ok(()) => {
                if action == ConsoleAction::StartPresale {
                    // Outranks any started-read issued before confirmation.
                    let seq = self.next_seq();
                    self.apply(SaleEvent::PresaleStartedRead { seq, started: true });
                }
                METRICS.action_success.fetch_add(1, Ordering::Relaxed);
                info!(%action, elapsed_ms = start.elapsed().as_millis() as u64, "Transaction confirmed");
            }
            Err(e) => {
                METRICS.action_error.fetch_add(1, Ordering::Relaxed);
                if matches!(e, MintError::WrongNetwork { .. }) {
                    METRICS.wrong_network.fetch_add(1, Ordering::Relaxed);
                }
                error!(%action, kind = e.kind(), error = %e, "Transaction failed");
            }
        }

        self.apply(SaleEvent::ActionFinished(action, result.clone()));
        result.map_err(ActionError::from)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
