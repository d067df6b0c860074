use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::dashboard_dto::DashboardStats, error::Result, middleware::auth::AuthSession,
    models::identity::Role, AppState,
};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Statistics for the caller's dashboard", body = Json<DashboardStats>)
    )
)]
#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
) -> Result<impl IntoResponse> {
    let stats = match auth.identity.role {
        Role::Admin => DashboardStats::Admin(state.dashboard_service.admin_stats().await?),
        Role::Candidate => DashboardStats::Candidate(
            state
                .dashboard_service
                .candidate_stats(auth.identity.id)
                .await?,
        ),
    };
    Ok(Json(stats))
}
