//! Note session route handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use classpulse_core::error::AppError;
use classpulse_core::types::pagination::PageRequest;
use classpulse_service::note::service::{AddContributionInput, CreateSessionInput};

use crate::dto::request::{
    AddContributionRequest, CreateSessionRequest, ListQuery, UpdateSessionStatusRequest,
};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST /api/notes — create a note session (faculty only).
pub async fn create_session(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state
        .note_service
        .create_session(
            &ctx,
            CreateSessionInput {
                title: req.title,
                content: req.content,
                subject: req.subject,
                department_id: req.department_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/notes — list sessions.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(25));
    let sessions = state
        .note_service
        .list_active(query.subject.as_deref(), &page)
        .await?;
    Ok(Json(sessions))
}

/// GET /api/notes/{id} — fetch a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.note_service.get_session(note_id).await?;
    Ok(Json(session))
}

/// POST /api/notes/{id}/contributions — add a contribution.
pub async fn add_contribution(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(note_id): Path<i64>,
    Json(req): Json<AddContributionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let contribution = state
        .note_service
        .add_contribution(
            &ctx,
            note_id,
            AddContributionInput {
                content: req.content,
                content_type: req.content_type,
                sketch_data: req.sketch_data,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(contribution)))
}

/// GET /api/notes/{id}/contributions — list a session's contributions.
pub async fn list_contributions(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(25));
    let contributions = state
        .note_service
        .list_contributions(note_id, &page)
        .await?;
    Ok(Json(contributions))
}

/// PUT /api/notes/{id}/status — toggle whether a session accepts
/// contributions (creator only).
pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(note_id): Path<i64>,
    Json(req): Json<UpdateSessionStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .note_service
        .update_session_status(&ctx, note_id, req.is_active)
        .await?;
    Ok(Json(session))
}

/// DELETE /api/notes/{id} — soft-delete a session (creator only).
pub async fn delete_session(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(note_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.note_service.delete_session(&ctx, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
