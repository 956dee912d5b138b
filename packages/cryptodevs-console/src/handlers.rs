//! HTTP request handlers.

use crate::error::ActionError;
use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::response::{ActionResponse, HealthResponse, StateResponse};
use crate::state::AppState;
use crate::view;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use cryptodevs_types::{ConsoleAction, MintError, TokenMetadata};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

/// Token metadata. Any identifier is accepted; the response is always 200.
pub async fn metadata(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<String>,
) -> Json<TokenMetadata> {
    METRICS.metadata_requests.fetch_add(1, Ordering::Relaxed);
    Json(TokenMetadata::with_image_base(
        &token_id,
        &state.config.image_base_url,
    ))
}

/// Console page as plain text.
pub async fn page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = view::render_page(
        &state.console.snapshot(),
        state.config.max_supply,
        &state.config.network_name,
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// Sale state snapshot with the current affordance.
pub async fn state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse::new(
        state.console.snapshot(),
        state.config.max_supply,
        &state.config.network_name,
        state.console.is_in_flight(),
    ))
}

/// Connect the wallet and reload the sale state.
pub async fn connect(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ActionResponse>, ActionError> {
    info!(req_id = %req_id.0, "Connect requested");
    let console = Arc::clone(&state.console);
    let result = tokio::spawn(async move {
        console.connect_wallet().await?;
        console.load().await;
        Ok::<(), MintError>(())
    })
    .await
    .unwrap_or_else(|e| Err(MintError::TransportFailure(format!("connect task failed: {e}"))));

    result.map_err(ActionError::from)?;
    Ok(Json(action_response(&state)))
}

pub async fn start_presale(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ActionResponse>, ActionError> {
    run_action(state, req_id, ConsoleAction::StartPresale).await
}

pub async fn presale_mint(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ActionResponse>, ActionError> {
    run_action(state, req_id, ConsoleAction::PresaleMint).await
}

pub async fn public_mint(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ActionResponse>, ActionError> {
    run_action(state, req_id, ConsoleAction::PublicMint).await
}

/// Clear the current notice once the user has seen it.
pub async fn dismiss_notice(
    State(state): State<Arc<AppState>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ActionResponse> {
    info!(req_id = %req_id.0, "Notice dismissed");
    state.console.dismiss_notice();
    Json(action_response(&state))
}

/// Run on its own task so a dropped client cannot abandon the action half way.
async fn run_action(
    state: Arc<AppState>,
    req_id: RequestId,
    action: ConsoleAction,
) -> Result<Json<ActionResponse>, ActionError> {
    info!(req_id = %req_id.0, %action, "Action requested");
    let console = Arc::clone(&state.console);
    let result = tokio::spawn(async move { console.run(action).await })
        .await
        .unwrap_or_else(|e| {
            error!(req_id = %req_id.0, %action, error = %e, "Action task failed");
            Err(ActionError::Mint(MintError::TransportFailure(format!(
                "action task failed: {e}"
            ))))
        });

    result?;
    Ok(Json(action_response(&state)))
}

fn action_response(state: &AppState) -> ActionResponse {
    let snapshot = state.console.snapshot();
    ActionResponse {
        success: true,
        affordance: cryptodevs_types::Affordance::from_state(&snapshot),
        notice: snapshot
            .notice
            .as_ref()
            .map(|n| n.message(&state.config.network_name)),
    }
}

/// Liveness with contract and connection status.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.console.snapshot();
    let status = match (&snapshot.last_error, snapshot.wallet_connected) {
        (_, false) => "disconnected",
        (Some(MintError::TransportFailure(_) | MintError::WrongNetwork { .. }), true) => "degraded",
        _ => "ok",
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status,
            contract: state.config.contract_address.clone(),
            chain_id: state.config.chain_id,
            network: state.config.network_name.clone(),
            wallet_connected: snapshot.wallet_connected,
            uptime_secs: state.start_time.elapsed().as_secs(),
            last_error: snapshot.last_error,
        }),
    )
}

/// Prometheus metrics in text exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = METRICS.render(state.console.snapshot().tokens_minted, state.config.max_supply);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
