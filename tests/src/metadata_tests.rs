//! Metadata endpoint as marketplaces see it.

use anyhow::Result;
use axum::http::StatusCode;
use cryptodevs_console::Config;
use cryptodevs_types::DEFAULT_IMAGE_BASE_URL;

use crate::utils::{build_app, call, ChainState, FakeSaleContract};

#[tokio::test]
async fn test_metadata_for_every_token_in_collection() -> Result<()> {
    let (app, _) = build_app(FakeSaleContract::new(ChainState::default()), Config::default());
    for id in 1..=20u64 {
        let (status, body) = call(&app, "GET", &format!("/api/{id}")).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], format!("Crytpo Dev #{id}"));
        assert_eq!(
            body["description"],
            "Cryptodevs is an NFT collection for Web3 Developers"
        );
        assert_eq!(
            body["image"],
            format!("{DEFAULT_IMAGE_BASE_URL}/{}.svg", id - 1)
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_metadata_never_rejects_an_identifier() -> Result<()> {
    let (app, _) = build_app(FakeSaleContract::new(ChainState::default()), Config::default());
    let cases = [
        ("abc", "NaN"),
        ("0", "-1"),
        ("1.5", "0.5"),
        ("0x10", "15"),
        ("1e3", "999"),
        ("999999", "999998"),
    ];
    for (id, index) in cases {
        let (status, body) = call(&app, "GET", &format!("/api/{id}")).await?;
        assert_eq!(status, StatusCode::OK, "token {id}");
        assert_eq!(body["name"], format!("Crytpo Dev #{id}"));
        assert!(
            body["image"].as_str().unwrap().ends_with(&format!("/{index}.svg")),
            "token {id}: {}",
            body["image"]
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_metadata_uses_configured_image_host() -> Result<()> {
    let config = Config {
        image_base_url: "https://images.example.test/devs/".into(),
        ..Config::default()
    };
    let (app, _) = build_app(FakeSaleContract::new(ChainState::default()), config);
    let (_, body) = call(&app, "GET", "/api/7").await?;
    assert_eq!(body["image"], "https://images.example.test/devs/6.svg");
    Ok(())
}
