use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::listing_dto::{CreateListingPayload, ListingFilter, ListingListQuery, UpdateListingPayload},
    error::{Error, Result},
    middleware::auth::AuthSession,
    models::identity::Role,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/listings",
    params(
        ("sector" = Option<String>, Query, description = "Exact sector, case-insensitive"),
        ("location" = Option<String>, Query, description = "Exact location, case-insensitive"),
        ("skills" = Option<String>, Query, description = "Comma separated skills, any may match"),
        ("search" = Option<String>, Query, description = "Search in title, company and description"),
        ("status" = Option<String>, Query, description = "open or closed")
    ),
    responses(
        (status = 200, description = "Matching internships", body = Json<Vec<Listing>>)
    )
)]
#[axum::debug_handler]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.listing_service.list(ListingFilter::from(query)).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Internship found", body = Json<Listing>),
        (status = 404, description = "Internship not found")
    )
)]
#[axum::debug_handler]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let listing = state
        .listing_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Internship not found".into()))?;
    Ok(Json(listing))
}

#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingPayload,
    responses(
        (status = 201, description = "Internship created", body = Json<Listing>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admins only")
    )
)]
#[axum::debug_handler]
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Json(payload): Json<CreateListingPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Admin)?;
    payload.validate()?;
    let listing = state
        .listing_service
        .create(payload, Some(auth.identity.id))
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

#[utoipa::path(
    patch,
    path = "/api/listings/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = UpdateListingPayload,
    responses(
        (status = 200, description = "Internship updated", body = Json<Listing>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Internship not found")
    )
)]
#[axum::debug_handler]
pub async fn update_listing(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListingPayload>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Admin)?;
    payload.validate()?;
    let listing = state
        .listing_service
        .update(id, payload)
        .await?
        .ok_or_else(|| Error::NotFound("Internship not found".into()))?;
    Ok(Json(listing))
}

#[utoipa::path(
    get,
    path = "/api/listings/{id}/applications",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Applications for the internship", body = Json<Vec<Application>>),
        (status = 403, description = "Admins only")
    )
)]
#[axum::debug_handler]
pub async fn list_listing_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Admin)?;
    let items = state.application_service.list_for_listing(id).await?;
    Ok(Json(items))
}
