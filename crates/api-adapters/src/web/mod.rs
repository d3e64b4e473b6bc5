//! axum wiring: shared state and the route table.

use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use services::Services;

pub mod error;
pub mod handlers;
pub mod session;

pub use error::{ApiError, ApiJson, ApiPath, ApiResult};
pub use session::{CookieSettings, CurrentUser, TOKEN_COOKIE};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn new(services: Services, cookies: CookieSettings) -> Self {
        Self {
            services: Arc::new(services),
            cookies,
        }
    }
}

/// The full route table. `/` and `/auth/*` are public; every other
/// handler takes a [`CurrentUser`].
pub fn router(state: AppState) -> Router {
    use handlers::{answers, auth, comments, notifications, questions};

    Router::new()
        .route("/", get(handlers::root))
        // auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // questions
        .route("/question", post(questions::create).get(questions::list))
        .route("/question/my", get(questions::list_mine))
        .route("/question/unanswered", get(questions::list_unanswered))
        .route(
            "/question/{id}",
            get(questions::detail).put(questions::update).delete(questions::delete),
        )
        .route("/question/{id}/vote", post(questions::vote))
        .route("/question/{id}/votes", get(questions::votes))
        // answers
        .route(
            "/answer/question/{question_id}",
            post(answers::create).get(answers::list_for_question),
        )
        .route("/answer/my", get(answers::list_mine))
        .route("/answer/{answer_id}", put(answers::update).delete(answers::delete))
        .route("/answer/{answer_id}/vote", post(answers::vote))
        .route("/answer/{answer_id}/votes", get(answers::votes))
        // comments
        .route(
            "/comment/answer/{answer_id}",
            post(comments::create).get(comments::list_for_answer),
        )
        .route("/comment/{comment_id}", put(comments::update).delete(comments::delete))
        .route("/comment/{comment_id}/vote", post(comments::vote))
        .route("/comment/{comment_id}/votes", get(comments::votes))
        // notifications
        .route("/notifications", get(notifications::list))
        .route("/notifications/mark-all-read", patch(notifications::mark_all_read))
        .route("/notifications/{id}/read", patch(notifications::mark_read))
        // tags
        .route("/tag", get(questions::list_tags))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
