//! Console actions over HTTP: status codes, bodies, and page rendering.

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cryptodevs_console::Config;
use tower::ServiceExt;

use crate::utils::{build_app, call, call_text, ChainState, FakeSaleContract, OWNER};

#[tokio::test]
async fn test_connect_then_page_reflects_sale() -> Result<()> {
    let contract = FakeSaleContract::new(ChainState {
        presale_started: true,
        presale_end: u64::MAX,
        token_ids: 3,
        ..ChainState::default()
    });
    let (app, _) = build_app(contract, Config::default());

    let (_, page) = call_text(&app, "/").await?;
    assert!(page.contains("?/20 have been minted"));
    assert!(page.contains("[ Connect Wallet ]"));

    let (status, body) = call(&app, "POST", "/connect").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["affordance"], "presale_mint");

    let (status, page) = call_text(&app, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(page.starts_with("Welcome to Crypto Devs!\n"));
    assert!(page.contains("3/20 have been minted"));
    assert!(page.contains("[ Presale mint ]"));
    Ok(())
}

#[tokio::test]
async fn test_owner_flow_over_http() -> Result<()> {
    let contract = FakeSaleContract::new(ChainState {
        signer: Some(OWNER.to_string()),
        ..ChainState::default()
    });
    let (app, _) = build_app(contract.clone(), Config::default());

    call(&app, "POST", "/connect").await?;
    let (_, state) = call(&app, "GET", "/state").await?;
    assert_eq!(state["affordance"], "start_presale");
    assert_eq!(state["is_owner"], true);

    let (status, body) = call(&app, "POST", "/presale/start").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affordance"], "presale_mint");
    assert!(contract.chain.lock().unwrap().presale_started);

    let (status, body) = call(&app, "POST", "/presale/mint").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notice"], "successfully minted a crypto dev");
    Ok(())
}

#[tokio::test]
async fn test_action_failures_map_to_status_codes() -> Result<()> {
    // Non-owner cannot start the presale.
    let (app, _) = build_app(FakeSaleContract::new(ChainState::default()), Config::default());
    let (status, body) = call(&app, "POST", "/presale/start").await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "call_reverted");
    assert_eq!(body["success"], false);

    // Wallet declines.
    let contract = FakeSaleContract::new(ChainState {
        presale_started: true,
        presale_end: 1,
        reject_next: true,
        ..ChainState::default()
    });
    let (app, _) = build_app(contract, Config::default());
    let (status, body) = call(&app, "POST", "/mint").await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "user_rejected");

    // Wrong chain.
    let contract = FakeSaleContract::new(ChainState {
        chain_id: 5,
        ..ChainState::default()
    });
    let (app, _) = build_app(contract, Config::default());
    let (status, body) = call(&app, "POST", "/connect").await?;
    assert_eq!(status, StatusCode::MISDIRECTED_REQUEST);
    assert_eq!(body["kind"], "wrong_network");
    let (_, state) = call(&app, "GET", "/state").await?;
    assert_eq!(state["notice_text"], "please switch to the Rinkeby network");

    // RPC down.
    let contract = FakeSaleContract::new(ChainState {
        transport_down: true,
        ..ChainState::default()
    });
    let (app, _) = build_app(contract, Config::default());
    let (status, body) = call(&app, "POST", "/mint").await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "transport_failure");
    Ok(())
}

#[tokio::test]
async fn test_api_key_guards_actions_only() -> Result<()> {
    let contract = FakeSaleContract::new(ChainState::default());
    let config = Config {
        api_key: Some("s3cret".into()),
        ..Config::default()
    };
    let (app, _) = build_app(contract, config);

    let (status, _) = call(&app, "POST", "/connect").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/connect")
                .header("x-api-key", "wrong!")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/connect")
                .header("x-api-key", "s3cret")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    for uri in ["/api/1", "/", "/state", "/health", "/metrics"] {
        let (status, _) = call(&app, "GET", uri).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn test_health_reports_connection() -> Result<()> {
    let (app, _) = build_app(FakeSaleContract::new(ChainState::default()), Config::default());
    let (_, health) = call(&app, "GET", "/health").await?;
    assert_eq!(health["status"], "disconnected");
    assert_eq!(health["chain_id"], 4);

    call(&app, "POST", "/connect").await?;
    let (_, health) = call(&app, "GET", "/health").await?;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["wallet_connected"], true);
    Ok(())
}
