//! # Crypto Devs Console
//!
//! Mint console for the Crypto Devs sale contract plus the token metadata
//! endpoint marketplaces crawl.
//!
//! ## Quick Start
//! ```bash
//! CRYPTODEVS_PRIVATE_KEY=0x... cargo run --bin cryptodevs-console
//! ```
//!
//! ## Endpoints
//! - `GET /api/{token_id}` - Token metadata
//! - `GET /` - Console page (text)
//! - `GET /state` - Console state (JSON)
//! - `POST /connect`, `/presale/start`, `/presale/mint`, `/mint`, `/notice/dismiss` - Actions
//! - `GET /health`, `GET /metrics` - Operations

pub mod config;
pub mod console;
pub mod contract;
mod error;
mod handlers;
pub mod metrics;
mod middleware;
pub mod poller;
mod response;
mod router;
pub mod session;
mod state;
pub mod view;

pub use config::Config;
pub use console::MintConsole;
pub use contract::{EthersSaleContract, SaleContract};
pub use error::{ActionError, Error};
pub use poller::Pollers;
pub use router::create as create_router;
pub use session::{Handle, Session};
pub use state::AppState;
