//! Text projection of the console page.

use cryptodevs_types::{Affordance, SaleState};
use std::fmt::Write;

/// Render the page for `state`. Pure: the same state always renders the same text.
pub fn render_page(state: &SaleState, max_supply: u64, network_name: &str) -> String {
    let affordance = Affordance::from_state(state);
    let minted = state
        .tokens_minted
        .map_or_else(|| "?".to_string(), |n| n.to_string());

    let mut page = String::new();
    let _ = writeln!(page, "Welcome to Crypto Devs!");
    let _ = writeln!(page, "Its an NFT collection for developers in Crypto.");
    let _ = writeln!(page, "{minted}/{max_supply} have been minted");

    if let Some(message) = affordance.message() {
        let _ = writeln!(page, "{message}");
    }
    if let Some(label) = affordance.button() {
        let _ = writeln!(page, "[ {label} ]");
    }
    if let Some(notice) = &state.notice {
        let _ = writeln!(page, "! {}", notice.message(network_name));
    }
    page
}
