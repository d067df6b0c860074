use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::identity::{Identity, Role};
use crate::models::session::Session;
use crate::AppState;

/// The caller behind a validated bearer token. Inserted into request
/// extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session: Session,
    pub identity: Identity,
}

impl AuthSession {
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.identity.role != role {
            return Err(Error::Forbidden(format!("Requires the {} role", role)));
        }
        Ok(())
    }

    /// Admins may act on anyone; everyone else only on themselves.
    pub fn require_self_or_admin(&self, identity_id: uuid::Uuid) -> Result<()> {
        if self.identity.role == Role::Admin || self.identity.id == identity_id {
            return Ok(());
        }
        Err(Error::Forbidden("Not allowed to view this account".to_string()))
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"bad_authorization"})),
        )
            .into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response();
    };

    match state.session_service.resolve(token.trim()).await {
        Ok((session, identity)) => {
            req.extensions_mut().insert(AuthSession { session, identity });
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error":"invalid_token"})),
            )
                .into_response()
        }
    }
}
