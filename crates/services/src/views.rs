//! # Response Views
//!
//! Client-facing shapes. References are resolved here: tag ids become
//! names, owner ids become `{username, reputation}`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use domains::{
    Answer, AppError, Comment, Notification, NotificationKind, Question, Result, TagRepo, User,
    UserRepo, VoteSet,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub username: String,
    pub reputation: i64,
}

impl AuthorSummary {
    /// Shown when the referenced user no longer resolves.
    fn unknown() -> Self {
        Self {
            username: "Unknown".to_string(),
            reputation: 0,
        }
    }
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            reputation: user.reputation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteFields {
    /// Net score
    pub votes: i64,
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
}

impl From<&VoteSet> for VoteFields {
    fn from(set: &VoteSet) -> Self {
        Self {
            votes: set.net(),
            upvotes: set.upvotes.iter().copied().collect(),
            downvotes: set.downvotes.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author: AuthorSummary,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub votes: VoteFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub author: AuthorSummary,
    pub content: String,
    #[serde(flatten)]
    pub votes: VoteFields,
    pub is_pinned: bool,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub answer_id: Uuid,
    pub user_id: Uuid,
    pub author: AuthorSummary,
    pub content: String,
    #[serde(flatten)]
    pub votes: VoteFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An answer together with its comments, newest comment first.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerThread {
    #[serde(flatten)]
    pub answer: AnswerView,
    pub comments: Vec<CommentView>,
}

/// A question with its whole discussion.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: QuestionView,
    pub answers: Vec<AnswerThread>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    pub recipient_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub reference_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            recipient_id: n.recipient_id,
            kind: n.kind,
            reference_id: n.reference_id,
            message: n.message,
            is_read: n.is_read,
            link: n.link,
            created_at: n.created_at,
        }
    }
}

/// Builds views, batching user and tag lookups per call.
#[derive(Clone)]
pub struct Presenter {
    users: Arc<dyn UserRepo>,
    tags: Arc<dyn TagRepo>,
}

impl Presenter {
    pub fn new(users: Arc<dyn UserRepo>, tags: Arc<dyn TagRepo>) -> Self {
        Self { users, tags }
    }

    async fn authors(&self, ids: impl Iterator<Item = Uuid>) -> Result<HashMap<Uuid, AuthorSummary>> {
        let mut ids: Vec<Uuid> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.find_users(&ids).await?;
        Ok(users.iter().map(|u| (u.id, AuthorSummary::from(u))).collect())
    }

    pub async fn questions(&self, questions: &[Question]) -> Result<Vec<QuestionView>> {
        let authors = self.authors(questions.iter().map(|q| q.user_id)).await?;

        let mut tag_ids: Vec<Uuid> = questions.iter().flat_map(|q| q.tag_ids.iter().copied()).collect();
        tag_ids.sort_unstable();
        tag_ids.dedup();
        let tag_names: HashMap<Uuid, String> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            self.tags
                .find_tags(&tag_ids)
                .await?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect()
        };

        Ok(questions
            .iter()
            .map(|q| QuestionView {
                id: q.id,
                user_id: q.user_id,
                author: authors.get(&q.user_id).cloned().unwrap_or_else(AuthorSummary::unknown),
                title: q.title.clone(),
                description: q.description.clone(),
                tags: q.tag_ids.iter().filter_map(|id| tag_names.get(id).cloned()).collect(),
                votes: VoteFields::from(&q.votes),
                created_at: q.created_at,
                updated_at: q.updated_at,
            })
            .collect())
    }

    pub async fn question(&self, question: &Question) -> Result<QuestionView> {
        self.questions(std::slice::from_ref(question))
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("empty question view".to_string()))
    }

    pub async fn answers(&self, answers: &[Answer]) -> Result<Vec<AnswerView>> {
        let authors = self.authors(answers.iter().map(|a| a.author_id)).await?;

        Ok(answers
            .iter()
            .map(|a| AnswerView {
                id: a.id,
                question_id: a.question_id,
                author_id: a.author_id,
                author: authors.get(&a.author_id).cloned().unwrap_or_else(AuthorSummary::unknown),
                content: a.content.clone(),
                votes: VoteFields::from(&a.votes),
                is_pinned: a.is_pinned,
                is_accepted: a.is_accepted,
                created_at: a.created_at,
                updated_at: a.updated_at,
            })
            .collect())
    }

    pub async fn answer(&self, answer: &Answer) -> Result<AnswerView> {
        self.answers(std::slice::from_ref(answer))
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("empty answer view".to_string()))
    }

    pub async fn comments(&self, comments: &[Comment]) -> Result<Vec<CommentView>> {
        let authors = self.authors(comments.iter().map(|c| c.user_id)).await?;

        Ok(comments
            .iter()
            .map(|c| CommentView {
                id: c.id,
                answer_id: c.answer_id,
                user_id: c.user_id,
                author: authors.get(&c.user_id).cloned().unwrap_or_else(AuthorSummary::unknown),
                content: c.content.clone(),
                votes: VoteFields::from(&c.votes),
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect())
    }

    pub async fn comment(&self, comment: &Comment) -> Result<CommentView> {
        self.comments(std::slice::from_ref(comment))
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("empty comment view".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockTagRepo, MockUserRepo, Tag, VoteDirection};

    #[tokio::test]
    async fn question_view_resolves_tags_and_author() {
        let owner = User::new("alice".into(), "alice@example.com".into(), "h".into());
        let rust = Tag::named("rust");
        let mut question = Question::new(owner.id, "t".into(), "d".into(), vec![rust.id]);
        question.votes.cast(Uuid::now_v7(), VoteDirection::Up);

        let mut users = MockUserRepo::new();
        let owner_clone = owner.clone();
        users
            .expect_find_users()
            .returning(move |_| Ok(vec![owner_clone.clone()]));
        let mut tags = MockTagRepo::new();
        let tag_clone = rust.clone();
        tags.expect_find_tags().returning(move |_| Ok(vec![tag_clone.clone()]));

        let presenter = Presenter::new(Arc::new(users), Arc::new(tags));
        let view = presenter.question(&question).await.unwrap();

        assert_eq!(view.tags, vec!["rust"]);
        assert_eq!(view.author.username, "alice");
        assert_eq!(view.votes.votes, 1);
    }

    #[tokio::test]
    async fn missing_author_renders_as_unknown() {
        let comment = Comment::new(Uuid::now_v7(), Uuid::now_v7(), "hi".into());

        let mut users = MockUserRepo::new();
        users.expect_find_users().returning(|_| Ok(vec![]));
        let presenter = Presenter::new(Arc::new(users), Arc::new(MockTagRepo::new()));

        let view = presenter.comment(&comment).await.unwrap();
        assert_eq!(view.author, AuthorSummary::unknown());
    }

    #[test]
    fn notification_view_uses_client_field_names() {
        let n = Notification::new(
            Uuid::now_v7(),
            NotificationKind::AnswerPosted,
            Uuid::now_v7(),
            "bob answered your question.".into(),
            None,
        );
        let json = serde_json::to_value(NotificationView::from(n)).unwrap();
        assert_eq!(json["type"], "answer_posted");
        assert_eq!(json["isRead"], false);
        assert!(json.get("referenceId").is_some());
    }

    #[test]
    fn vote_fields_serialize_flat() {
        let mut set = VoteSet::new();
        set.cast(Uuid::now_v7(), VoteDirection::Down);
        let json = serde_json::to_value(VoteFields::from(&set)).unwrap();
        assert_eq!(json["votes"], -1);
        assert_eq!(json["downvotes"].as_array().unwrap().len(), 1);
    }
}
