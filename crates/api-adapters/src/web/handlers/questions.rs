use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::{Tag, VoteTally, VoteTarget};
use services::views::{QuestionDetail, QuestionView};
use services::{NewQuestion, QuestionUpdate};

use crate::web::error::{ApiJson, ApiPath, ApiResult};
use crate::web::handlers::{MessageResponse, VoteRequest, VoteResponse};
use crate::web::session::CurrentUser;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag_names: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse<T> {
    pub question: T,
}

#[derive(Debug, Serialize)]
pub struct QuestionUpdatedResponse {
    pub message: &'static str,
    pub question: QuestionView,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(body): ApiJson<CreateQuestionRequest>,
) -> ApiResult<(StatusCode, Json<QuestionResponse<QuestionView>>)> {
    let question = state
        .services
        .questions
        .create(
            &user,
            NewQuestion {
                title: body.title,
                description: body.description,
                tag_names: body.tag_names,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(QuestionResponse { question })))
}

pub async fn list(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<Json<Vec<QuestionView>>> {
    Ok(Json(state.services.questions.list().await?))
}

pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<QuestionView>>> {
    Ok(Json(state.services.questions.list_mine(&user).await?))
}

pub async fn list_unanswered(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<QuestionView>>> {
    Ok(Json(state.services.questions.list_unanswered().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<QuestionResponse<QuestionDetail>>> {
    let question = state.services.questions.get(id).await?;
    Ok(Json(QuestionResponse { question }))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateQuestionRequest>,
) -> ApiResult<Json<QuestionUpdatedResponse>> {
    let question = state
        .services
        .questions
        .update(
            &user,
            id,
            QuestionUpdate {
                title: body.title,
                description: body.description,
                tag_names: body.tag_names,
            },
        )
        .await?;
    Ok(Json(QuestionUpdatedResponse {
        message: "Question updated",
        question,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.services.questions.delete(&user, id).await?;
    Ok(Json(MessageResponse {
        message: "Question deleted successfully",
    }))
}

pub async fn vote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let tally = state
        .services
        .votes
        .cast(VoteTarget::Question(id), user.id, body.direction())
        .await?;
    Ok(Json(tally.into()))
}

pub async fn votes(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<VoteTally>> {
    Ok(Json(state.services.votes.tally(VoteTarget::Question(id)).await?))
}

pub async fn list_tags(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.services.questions.list_tags().await?))
}
