//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Settings for generated share links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Base URL that share tokens are appended to.
    #[serde(default = "default_link_base_url")]
    pub link_base_url: String,
    /// Number of random bytes in a share token (hex encoded, so the token
    /// is twice this long).
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            link_base_url: default_link_base_url(),
            token_bytes: default_token_bytes(),
        }
    }
}

fn default_link_base_url() -> String {
    "http://localhost:5173/shared".to_string()
}

fn default_token_bytes() -> usize {
    24
}
