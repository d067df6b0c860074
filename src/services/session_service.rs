//! Server-side sessions referenced by signed bearer tokens.
//!
//! A token is only honoured while its session id is still registered here, so
//! logout and expiry take effect immediately regardless of what the client
//! keeps in storage.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::repository::Repository;
use crate::error::{Error, Result};
use crate::models::identity::Identity;
use crate::models::session::{Claims, Session};
use crate::utils::time::Clock;

pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

#[derive(Clone)]
pub struct SessionService {
    identities: Arc<dyn Repository<Identity>>,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionService {
    pub fn new(
        identities: Arc<dyn Repository<Identity>>,
        clock: Arc<dyn Clock>,
        secret: &str,
        ttl: Duration,
    ) -> Self {
        Self {
            identities,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub async fn issue(&self, identity: &Identity) -> Result<IssuedSession> {
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| Error::Internal("Session expiry is out of range".to_string()))?;
        let session = Session {
            id: Uuid::new_v4(),
            identity_id: identity.id,
            role: identity.role,
            issued_at,
            expires_at,
        };
        let claims = Claims {
            sub: identity.id,
            sid: session.id,
            role: identity.role,
            exp: to_epoch(session.expires_at),
            iat: to_epoch(issued_at),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        self.sessions.write().await.insert(session.id, session.clone());
        tracing::info!(session_id = %session.id, identity_id = %identity.id, "session issued");
        Ok(IssuedSession { token, session })
    }

    /// Resolves a bearer token to its session and a freshly loaded identity.
    pub async fn resolve(&self, token: &str) -> Result<(Session, Identity)> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;

        let now = self.clock.now();
        let session = {
            let sessions = self.sessions.read().await;
            sessions.get(&claims.sid).cloned()
        }
        .filter(|session| session.identity_id == claims.sub && session.expires_at > now)
        .ok_or_else(|| Error::Unauthorized("Session is no longer active".to_string()))?;

        let identity = self
            .identities
            .get(session.identity_id)
            .await?
            .filter(|identity| identity.role == session.role)
            .ok_or_else(|| Error::Unauthorized("Session is no longer active".to_string()))?;

        Ok((session, identity))
    }

    pub async fn revoke(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            tracing::info!(%session_id, "session revoked");
        }
        removed
    }

    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn to_epoch(at: DateTime<Utc>) -> usize {
    at.timestamp().max(0) as usize
}
