use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplyPayload, UpdateApplicationStatusPayload},
    error::{Error, Result},
    middleware::auth::AuthSession,
    models::identity::Role,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<Application>),
        (status = 403, description = "Candidates only"),
        (status = 404, description = "Internship not found"),
        (status = 409, description = "Already applied")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Candidate)?;
    let application = state
        .application_service
        .apply(payload.listing_id, auth.identity.id)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/applications",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Applications of the candidate", body = Json<Vec<Application>>),
        (status = 403, description = "Not your account")
    )
)]
#[axum::debug_handler]
pub async fn list_candidate_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(candidate_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_self_or_admin(candidate_id)?;
    let items = state
        .application_service
        .list_for_candidate(candidate_id)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<Application>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Admin)?;
    let application = state
        .application_service
        .set_status(id, payload.status)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".into()))?;
    Ok(Json(application))
}
