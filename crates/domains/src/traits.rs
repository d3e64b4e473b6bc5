//! # Core Traits (Ports)
//!
//! Every storage or auth adapter implements these traits to be used by
//! the services. Method names are unique across traits so one store type
//! can implement all of them without ambiguity.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, TokenError};
use crate::identity::Identity;
use crate::models::{Answer, Comment, Mention, Notification, Question, Tag, User};
use crate::votes::{VoteDirection, VoteTally, VoteTarget};

/// Account persistence. Usernames and emails are unique; a duplicate
/// insert fails with `AppError::Conflict`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<()>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Users for the given ids; unknown ids are skipped.
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Returns the tag called `name`, creating it if absent.
    async fn find_or_create_tag(&self, name: &str) -> Result<Tag>;
    async fn find_tags(&self, ids: &[Uuid]) -> Result<Vec<Tag>>;
    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>>;
}

/// Editable parts of a question. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait QuestionRepo: Send + Sync {
    async fn insert_question(&self, question: Question) -> Result<()>;
    async fn find_question(&self, id: Uuid) -> Result<Option<Question>>;
    /// Newest first.
    async fn list_questions(&self) -> Result<Vec<Question>>;
    async fn list_questions_by_user(&self, user_id: Uuid) -> Result<Vec<Question>>;
    /// Questions that have no answers yet, newest first.
    async fn list_unanswered_questions(&self) -> Result<Vec<Question>>;
    /// Applies the edit without touching vote state. `None` if absent.
    async fn update_question(&self, id: Uuid, edit: QuestionEdit) -> Result<Option<Question>>;
    /// Returns whether a question was removed. Answers are left in place.
    async fn delete_question(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AnswerRepo: Send + Sync {
    async fn insert_answer(&self, answer: Answer) -> Result<()>;
    async fn find_answer(&self, id: Uuid) -> Result<Option<Answer>>;
    /// Oldest first, so a thread reads top to bottom.
    async fn list_answers_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>>;
    async fn list_answers_by_author(&self, author_id: Uuid) -> Result<Vec<Answer>>;
    async fn update_answer_content(&self, id: Uuid, content: String) -> Result<Option<Answer>>;
    /// Returns whether an answer was removed. Comments are left in place.
    async fn delete_answer(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn insert_comment(&self, comment: Comment) -> Result<()>;
    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Newest first.
    async fn list_comments_for_answer(&self, answer_id: Uuid) -> Result<Vec<Comment>>;
    async fn update_comment_content(&self, id: Uuid, content: String) -> Result<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> Result<bool>;
}

/// Per-voter vote state on questions, answers and comments.
///
/// Implementations must apply a cast as one atomic mutation of the
/// target's voter sets. A read of the whole entity followed by a write
/// loses concurrent votes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Records the vote and returns the new tally, or `None` when the
    /// target does not exist.
    async fn cast_vote(
        &self,
        target: VoteTarget,
        voter: Uuid,
        direction: VoteDirection,
    ) -> Result<Option<VoteTally>>;
    async fn vote_tally(&self, target: VoteTarget) -> Result<Option<VoteTally>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MentionRepo: Send + Sync {
    async fn insert_mention(&self, mention: Mention) -> Result<()>;
    async fn list_mentions_for_user(&self, user_id: Uuid) -> Result<Vec<Mention>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn insert_notification(&self, notification: Notification) -> Result<()>;
    /// Newest first.
    async fn list_notifications_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>>;
    /// Marks one notification read if it belongs to `recipient_id`.
    async fn mark_notification_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool>;
    /// Returns how many notifications changed state.
    async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64>;
}

/// Password hashing contract. CPU-bound, so not async.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Signed, time-limited session tokens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionTokens: Send + Sync {
    fn issue_token(&self, identity: &Identity) -> Result<String>;
    fn verify_token(&self, token: &str) -> std::result::Result<Identity, TokenError>;
}
