use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::notification_dto::{MarkAllReadResponse, UnreadCountResponse},
    error::Result,
    middleware::auth::AuthSession,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications of the caller", body = Json<Vec<Notification>>)
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse> {
    let items = state
        .notification_service
        .list_for_user(auth.identity.id)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notifications", body = Json<UnreadCountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse> {
    let unread = state
        .notification_service
        .unread_count(auth.identity.id)
        .await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Marked as read")
    )
)]
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    // Someone else's notification is treated like an unknown id.
    if let Some(notification) = state.notification_service.get(id).await? {
        if notification.user_id == auth.identity.id {
            state.notification_service.mark_read(id).await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read", body = Json<MarkAllReadResponse>)
    )
)]
#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse> {
    let updated = state
        .notification_service
        .mark_all_read(auth.identity.id)
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
