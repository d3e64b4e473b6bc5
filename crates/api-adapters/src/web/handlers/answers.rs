use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use domains::{VoteTally, VoteTarget};
use services::views::AnswerView;

use crate::web::error::{ApiJson, ApiPath, ApiResult};
use crate::web::handlers::{ContentRequest, MessageResponse, VoteRequest, VoteResponse};
use crate::web::session::CurrentUser;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub message: &'static str,
    pub answer: AnswerView,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(question_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ContentRequest>,
) -> ApiResult<(StatusCode, Json<AnswerResponse>)> {
    let answer = state
        .services
        .answers
        .create(&user, question_id, body.content)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AnswerResponse {
            message: "Answer created",
            answer,
        }),
    ))
}

pub async fn list_for_question(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(question_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<AnswerView>>> {
    Ok(Json(state.services.answers.list_for_question(question_id).await?))
}

pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<AnswerView>>> {
    Ok(Json(state.services.answers.list_mine(&user).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(answer_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ContentRequest>,
) -> ApiResult<Json<AnswerResponse>> {
    let answer = state
        .services
        .answers
        .update(&user, answer_id, body.content)
        .await?;
    Ok(Json(AnswerResponse {
        message: "Answer updated",
        answer,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(answer_id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.services.answers.delete(&user, answer_id).await?;
    Ok(Json(MessageResponse {
        message: "Answer deleted successfully",
    }))
}

pub async fn vote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(answer_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let tally = state
        .services
        .votes
        .cast(VoteTarget::Answer(answer_id), user.id, body.direction())
        .await?;
    Ok(Json(tally.into()))
}

pub async fn votes(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(answer_id): ApiPath<Uuid>,
) -> ApiResult<Json<VoteTally>> {
    Ok(Json(state.services.votes.tally(VoteTarget::Answer(answer_id)).await?))
}
