//! crates/services/src/lib.rs
//!
//! Use cases for StackIt. Services depend only on the ports in `domains`,
//! so the same code runs over PostgreSQL in production and the in-memory
//! store in tests.

use std::sync::Arc;

use domains::{
    AnswerRepo, CommentRepo, CredentialHasher, MentionRepo, NotificationRepo, QuestionRepo,
    SessionTokens, TagRepo, UserRepo, VoteLedger,
};

pub mod answers;
pub mod auth;
pub mod comments;
pub mod dispatch;
pub mod notifications;
pub mod questions;
pub mod views;
pub mod votes;

pub use answers::AnswerService;
pub use auth::{AuthService, Registration, Session};
pub use comments::CommentService;
pub use dispatch::{MentionDispatcher, MentionSource};
pub use notifications::NotificationService;
pub use questions::{NewQuestion, QuestionService, QuestionUpdate};
pub use views::Presenter;
pub use votes::VoteService;

/// Handles to every storage port.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepo>,
    pub tags: Arc<dyn TagRepo>,
    pub questions: Arc<dyn QuestionRepo>,
    pub answers: Arc<dyn AnswerRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub votes: Arc<dyn VoteLedger>,
    pub mentions: Arc<dyn MentionRepo>,
    pub notifications: Arc<dyn NotificationRepo>,
}

impl Repositories {
    /// Uses one store for every port.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepo
            + TagRepo
            + QuestionRepo
            + AnswerRepo
            + CommentRepo
            + VoteLedger
            + MentionRepo
            + NotificationRepo
            + 'static,
    {
        Self {
            users: store.clone(),
            tags: store.clone(),
            questions: store.clone(),
            answers: store.clone(),
            comments: store.clone(),
            votes: store.clone(),
            mentions: store.clone(),
            notifications: store,
        }
    }
}

/// Every service, wired once at startup.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub questions: QuestionService,
    pub answers: AnswerService,
    pub comments: CommentService,
    pub votes: VoteService,
    pub notifications: NotificationService,
}

impl Services {
    pub fn new(
        repos: Repositories,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self {
        let presenter = Presenter::new(repos.users.clone(), repos.tags.clone());
        let dispatcher = MentionDispatcher::new(
            repos.users.clone(),
            repos.mentions.clone(),
            repos.notifications.clone(),
        );

        Self {
            auth: AuthService::new(repos.users.clone(), hasher, tokens),
            questions: QuestionService::new(
                repos.questions.clone(),
                repos.answers.clone(),
                repos.comments.clone(),
                repos.tags.clone(),
                presenter.clone(),
                dispatcher.clone(),
            ),
            answers: AnswerService::new(
                repos.answers.clone(),
                repos.questions.clone(),
                presenter.clone(),
                dispatcher.clone(),
            ),
            comments: CommentService::new(
                repos.comments.clone(),
                repos.answers.clone(),
                presenter,
                dispatcher,
            ),
            votes: VoteService::new(repos.votes),
            notifications: NotificationService::new(repos.notifications),
        }
    }
}
