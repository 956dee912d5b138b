//! Per-token metadata served to marketplaces.

use crate::number::{format_js_number, js_number};
use serde::{Deserialize, Serialize};

/// Display-name prefix. The spelling is what marketplaces have already indexed.
pub const NAME_PREFIX: &str = "Crytpo Dev #";

pub const DESCRIPTION: &str = "Cryptodevs is an NFT collection for Web3 Developers";

/// Static artwork location; images are stored zero-indexed as `{id - 1}.svg`.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://raw.githubusercontent.com/LearnWeb3DAO/NFT-Collection/ae651d5fd04ada78f97a2cb540cfd1c482ea542f/my-app/public/cryptodevs";

/// Metadata record for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl TokenMetadata {
    /// Metadata for `token_id` using the default artwork location.
    pub fn for_token(token_id: &str) -> Self {
        Self::with_image_base(token_id, DEFAULT_IMAGE_BASE_URL)
    }

    /// Metadata for `token_id` with artwork under `image_base`.
    ///
    /// Never fails. The identifier is echoed verbatim into the name; an
    /// identifier that is not a number yields a `NaN.svg` image path.
    pub fn with_image_base(token_id: &str, image_base: &str) -> Self {
        let index = format_js_number(js_number(token_id) - 1.0);
        Self {
            name: format!("{NAME_PREFIX}{token_id}"),
            description: DESCRIPTION.to_string(),
            image: format!("{}/{index}.svg", image_base.trim_end_matches('/')),
        }
    }
}
