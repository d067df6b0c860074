use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::identity::{Identity, Role};

/// Composite key of a pending second-factor challenge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OtpKey {
    pub identifier: String,
    pub role: Role,
}

impl OtpKey {
    pub fn new(identifier: impl Into<String>, role: Role) -> Self {
        Self {
            identifier: identifier.into(),
            role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PendingOtp {
    pub code: String,
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: u32,
}

impl PendingOtp {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Where a login attempt stands between the two phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginPhase {
    NoSession,
    AwaitingOtp,
    Authenticated,
}
