//! Storage quota value object.

use serde::{Deserialize, Serialize};

/// Usage percentage above which a snapshot is flagged for notification.
pub const NOTIFICATION_THRESHOLD_PERCENT: f64 = 90.0;

/// Figures derived from a usage total and a quota.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaFigures {
    /// Cumulative bytes in use.
    pub used_storage: i64,
    /// The quota in bytes.
    pub storage_limit: i64,
    /// Usage percentage, capped at 100.
    pub usage_percentage: f64,
    /// Bytes over quota, or zero.
    pub overflow_storage: i64,
    /// Whether usage is above the notification threshold.
    pub notification_sent: bool,
}

impl QuotaFigures {
    /// Compute figures for `used` bytes against a quota of `limit` bytes.
    ///
    /// A zero or negative limit is treated as one byte so the percentage
    /// stays finite.
    pub fn compute(used: i64, limit: i64) -> Self {
        let denominator = limit.max(1) as f64;
        let usage_percentage = (used as f64 / denominator * 100.0).min(100.0);

        Self {
            used_storage: used,
            storage_limit: limit,
            usage_percentage,
            overflow_storage: (used - limit).max(0),
            notification_sent: usage_percentage > NOTIFICATION_THRESHOLD_PERCENT,
        }
    }

    /// Returns `true` if adding `additional` bytes to `prior` would exceed
    /// `limit`. Landing exactly on the limit is allowed.
    pub fn would_exceed(prior: i64, additional: i64, limit: i64) -> bool {
        prior.saturating_add(additional) > limit
    }
}
