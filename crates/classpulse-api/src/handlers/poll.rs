//! Poll route handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use classpulse_core::error::AppError;
use classpulse_core::types::pagination::PageRequest;
use classpulse_service::poll::service::CreatePollInput;

use crate::dto::request::{CreatePollRequest, ListQuery, RelatedQuery, VoteRequest};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST /api/polls — create a poll (faculty only).
pub async fn create_poll(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Json(req): Json<CreatePollRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let poll = state
        .poll_service
        .create_poll(
            &ctx,
            CreatePollInput {
                title: req.title,
                question: req.question,
                options: req.options,
                subject: req.subject,
                department_id: req.department_id,
                content_id: req.content_id,
                timer_duration_seconds: req.timer_duration_seconds,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(poll)))
}

/// GET /api/polls — list active polls.
pub async fn list_polls(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(25));
    let polls = state
        .poll_service
        .list_active(query.subject.as_deref(), query.department_id, &page)
        .await?;
    Ok(Json(polls))
}

/// GET /api/polls/{id} — fetch a poll.
pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let poll = state.poll_service.get_poll(poll_id).await?;
    Ok(Json(poll))
}

/// POST /api/polls/{id}/votes — cast or change a vote.
pub async fn vote(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(poll_id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state
        .poll_service
        .vote(&ctx, poll_id, req.option_index)
        .await?;
    Ok(Json(results))
}

/// POST /api/polls/{id}/close — close a poll (creator or admin).
pub async fn close_poll(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    Path(poll_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state.poll_service.close_poll(&ctx, poll_id).await?;
    Ok(Json(results))
}

/// GET /api/polls/{id}/results — current tally.
pub async fn results(
    State(state): State<AppState>,
    Path(poll_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let results = state.poll_service.results(poll_id).await?;
    Ok(Json(results))
}

/// GET /api/polls/{id}/related — content sharing tags with the poll.
pub async fn related_content(
    State(state): State<AppState>,
    Path(poll_id): Path<i64>,
    Query(query): Query<RelatedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let related = state
        .poll_service
        .find_related_content(poll_id, query.limit)
        .await?;
    Ok(Json(related))
}
