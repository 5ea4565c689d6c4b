//! Bearer token verification.
//!
//! Tokens are issued elsewhere; this side only checks the HS256 signature
//! and expiry and reads the user id from `sub`.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use drivebox_core::config::auth::AuthConfig;
use drivebox_core::error::AppError;
use drivebox_core::types::UserId;

/// Claims DriveBox reads from an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user id.
    pub sub: Uuid,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
}

/// Verifies access tokens against the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// The user a token was issued to.
    pub fn verify(&self, token: &str) -> Result<UserId, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| UserId::from_uuid(data.claims.sub))
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::authentication("Invalid or expired token")
            })
    }
}
