//! Request context carrying the authenticated user and client details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drivebox_core::types::UserId;
use drivebox_entity::activity::RequesterInfo;

use crate::client::ClientInfo;

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows *who* is acting and from *where*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Where the request came from.
    pub client: ClientInfo,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, client: ClientInfo) -> Self {
        Self {
            user_id,
            client,
            request_time: Utc::now(),
        }
    }

    /// Requester fields stored on activity records.
    pub fn requester(&self) -> RequesterInfo {
        self.client.requester()
    }
}
