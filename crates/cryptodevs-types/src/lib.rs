//! Shared types and pure-logic utilities for the Crypto Devs mint console.
//! No chain or HTTP dependencies; usable from the service and from tests.

mod affordance;
mod error;
mod metadata;
mod number;
mod sale;

pub use affordance::Affordance;
pub use error::MintError;
pub use metadata::{TokenMetadata, DEFAULT_IMAGE_BASE_URL, DESCRIPTION, NAME_PREFIX};
pub use number::{format_js_number, js_number};
pub use sale::{is_same_address, ConsoleAction, Notice, SaleEvent, SaleState};
