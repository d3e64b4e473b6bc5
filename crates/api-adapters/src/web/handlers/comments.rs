use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use domains::{VoteTally, VoteTarget};
use services::views::CommentView;

use crate::web::error::{ApiJson, ApiPath, ApiResult};
use crate::web::handlers::{ContentRequest, MessageResponse, VoteRequest, VoteResponse};
use crate::web::session::CurrentUser;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub message: &'static str,
    pub comment: CommentView,
}

/// Runs the mention pipeline after the comment is stored.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(answer_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ContentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .services
        .comments
        .create(&user, answer_id, body.content)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment created",
            comment,
        }),
    ))
}

pub async fn list_for_answer(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(answer_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<CommentView>>> {
    Ok(Json(state.services.comments.list_for_answer(answer_id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(comment_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ContentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let comment = state
        .services
        .comments
        .update(&user, comment_id, body.content)
        .await?;
    Ok(Json(CommentResponse {
        message: "Comment updated",
        comment,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(comment_id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.services.comments.delete(&user, comment_id).await?;
    Ok(Json(MessageResponse {
        message: "Comment deleted successfully",
    }))
}

pub async fn vote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(comment_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let tally = state
        .services
        .votes
        .cast(VoteTarget::Comment(comment_id), user.id, body.direction())
        .await?;
    Ok(Json(tally.into()))
}

pub async fn votes(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(comment_id): ApiPath<Uuid>,
) -> ApiResult<Json<VoteTally>> {
    Ok(Json(state.services.votes.tally(VoteTarget::Comment(comment_id)).await?))
}
