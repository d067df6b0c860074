//! Pending second-factor challenges, indexed by expiry so stale entries can
//! be evicted without waiting for a verify attempt to trip over them.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::models::identity::Identity;
use crate::models::otp::{OtpKey, PendingOtp};
use crate::utils::crypto::constant_time_eq;

/// Result of checking a code against the store.
#[derive(Debug)]
pub enum OtpCheck {
    Verified(Identity),
    Missing,
    Expired,
    Mismatch { attempts_left: u32 },
    Locked,
}

#[derive(Default)]
struct OtpIndex {
    entries: HashMap<OtpKey, PendingOtp>,
    by_expiry: BTreeSet<(DateTime<Utc>, OtpKey)>,
}

impl OtpIndex {
    fn remove(&mut self, key: &OtpKey) -> Option<PendingOtp> {
        let removed = self.entries.remove(key)?;
        self.by_expiry.remove(&(removed.expires_at, key.clone()));
        Some(removed)
    }
}

pub struct OtpStore {
    max_attempts: u32,
    index: Mutex<OtpIndex>,
}

impl OtpStore {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            index: Mutex::new(OtpIndex::default()),
        }
    }

    /// Stores a challenge, replacing any earlier one for the same key.
    pub async fn put(&self, key: OtpKey, pending: PendingOtp) {
        let mut index = self.index.lock().await;
        index.remove(&key);
        index.by_expiry.insert((pending.expires_at, key.clone()));
        index.entries.insert(key, pending);
    }

    /// Checks `code` for `key`. A verified, expired or exhausted challenge is
    /// removed; a wrong code only counts against the attempt budget.
    pub async fn check(&self, key: &OtpKey, code: &str, now: DateTime<Utc>) -> OtpCheck {
        let mut index = self.index.lock().await;
        let Some(pending) = index.entries.get_mut(key) else {
            return OtpCheck::Missing;
        };

        if pending.is_expired(now) {
            index.remove(key);
            return OtpCheck::Expired;
        }

        if constant_time_eq(&pending.code, code) {
            let Some(verified) = index.remove(key) else {
                return OtpCheck::Missing;
            };
            return OtpCheck::Verified(verified.identity);
        }

        pending.failed_attempts += 1;
        if pending.failed_attempts >= self.max_attempts {
            index.remove(key);
            return OtpCheck::Locked;
        }
        OtpCheck::Mismatch {
            attempts_left: self.max_attempts - pending.failed_attempts,
        }
    }

    pub async fn discard(&self, key: &OtpKey) -> bool {
        self.index.lock().await.remove(key).is_some()
    }

    /// Drops every challenge that expired before `now`.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut index = self.index.lock().await;
        let mut evicted = 0;
        while let Some((expires_at, _)) = index.by_expiry.first() {
            if *expires_at >= now {
                break;
            }
            let Some((_, key)) = index.by_expiry.pop_first() else {
                break;
            };
            index.entries.remove(&key);
            evicted += 1;
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.index.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
