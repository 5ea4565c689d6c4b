//! Share link token generation.

use drivebox_core::config::share::ShareConfig;

/// Generates share tokens and the URLs they are reached at.
#[derive(Debug, Clone)]
pub struct LinkService {
    link_base_url: String,
    token_bytes: usize,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(link_base_url: &str, token_bytes: usize) -> Self {
        Self {
            link_base_url: link_base_url.trim_end_matches('/').to_string(),
            token_bytes: token_bytes.max(16),
        }
    }

    pub fn from_config(config: &ShareConfig) -> Self {
        Self::new(&config.link_base_url, config.token_bytes)
    }

    /// A random hex token.
    pub fn generate_token(&self) -> String {
        (0..self.token_bytes)
            .map(|_| format!("{:02x}", rand::random::<u8>()))
            .collect()
    }

    /// The public URL for a token.
    pub fn url_for(&self, token: &str) -> String {
        format!("{}/{}", self.link_base_url, token)
    }
}
