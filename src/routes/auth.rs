use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{
        CancelLoginRequest, IdentityResponse, InitiateLoginResponse, LoginRequest,
        RegisterPayload, SessionResponse, VerifyLoginRequest,
    },
    error::{Error, Result},
    middleware::auth::AuthSession,
    models::{identity::Identity, otp::LoginPhase},
    AppState,
};

async fn open_session(state: &AppState, identity: Identity) -> Result<SessionResponse> {
    let issued = state.session_service.issue(&identity).await?;
    Ok(SessionResponse {
        phase: LoginPhase::Authenticated,
        token: issued.token,
        expires_at: issued.session.expires_at,
        identity: IdentityResponse::from(identity),
    })
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created and signed in", body = Json<SessionResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Account already exists")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = state.auth_service.register(payload).await?;
    let session = open_session(&state, identity).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, one-time code sent", body = Json<InitiateLoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn initiate_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let phase = state.auth_service.initiate(&payload).await?;
    if phase != LoginPhase::AwaitingOtp {
        return Err(Error::Unauthorized("Invalid credentials".into()));
    }
    Ok(Json(InitiateLoginResponse {
        accepted: true,
        phase,
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Json<SessionResponse>),
        (status = 401, description = "Invalid or expired code")
    )
)]
#[axum::debug_handler]
pub async fn verify_login(
    State(state): State<AppState>,
    Json(payload): Json<VerifyLoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let identity = state
        .auth_service
        .verify(&payload)
        .await?
        .ok_or_else(|| Error::Unauthorized("Invalid or expired code".into()))?;
    let session = open_session(&state, identity).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/auth/login/cancel",
    request_body = CancelLoginRequest,
    responses(
        (status = 200, description = "Pending login discarded", body = Json<InitiateLoginResponse>)
    )
)]
#[axum::debug_handler]
pub async fn cancel_login(
    State(state): State<AppState>,
    Json(payload): Json<CancelLoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let phase = state
        .auth_service
        .cancel(&payload.identifier, payload.role)
        .await;
    Ok(Json(InitiateLoginResponse {
        accepted: false,
        phase,
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current identity", body = Json<IdentityResponse>),
        (status = 401, description = "No active session")
    )
)]
#[axum::debug_handler]
pub async fn current_session(Extension(auth): Extension<AuthSession>) -> Result<impl IntoResponse> {
    Ok(Json(IdentityResponse::from(auth.identity)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "No active session")
    )
)]
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse> {
    state.session_service.revoke(auth.session.id).await;
    Ok(StatusCode::NO_CONTENT)
}
