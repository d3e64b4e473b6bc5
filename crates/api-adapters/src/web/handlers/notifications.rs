use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use services::views::NotificationView;

use crate::web::error::{ApiPath, ApiResult};
use crate::web::handlers::MessageResponse;
use crate::web::session::CurrentUser;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    pub message: &'static str,
    pub updated: u64,
}

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<NotificationView>>> {
    Ok(Json(state.services.notifications.list(&user).await?))
}

pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.services.notifications.mark_read(&user, id).await?;
    Ok(Json(MessageResponse {
        message: "Notification marked as read",
    }))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<MarkAllResponse>> {
    let updated = state.services.notifications.mark_all_read(&user).await?;
    Ok(Json(MarkAllResponse {
        message: "All notifications marked as read",
        updated,
    }))
}
