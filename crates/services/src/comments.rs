//! # Comment Service
//!
//! Comments hang off answers. Creating one runs the mention pipeline;
//! the resulting notifications point at the parent answer.

use std::sync::Arc;

use uuid::Uuid;

use domains::{AnswerRepo, AppError, Comment, CommentRepo, Identity, Result, SourceType};

use crate::answers::required_content;
use crate::dispatch::{MentionDispatcher, MentionSource};
use crate::views::{CommentView, Presenter};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    answers: Arc<dyn AnswerRepo>,
    presenter: Presenter,
    dispatcher: MentionDispatcher,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepo>,
        answers: Arc<dyn AnswerRepo>,
        presenter: Presenter,
        dispatcher: MentionDispatcher,
    ) -> Self {
        Self {
            comments,
            answers,
            presenter,
            dispatcher,
        }
    }

    pub async fn create(&self, author: &Identity, answer_id: Uuid, content: String) -> Result<CommentView> {
        let content = required_content(content)?;
        self.ensure_answer(answer_id).await?;

        let comment = Comment::new(answer_id, author.id, content);
        self.comments.insert_comment(comment.clone()).await?;
        tracing::info!(comment_id = %comment.id, %answer_id, user_id = %author.id, "comment created");

        self.dispatcher
            .dispatch_logged(&MentionSource {
                source_type: SourceType::Comment,
                source_id: comment.id,
                reference_id: answer_id,
                link: format!("/answer/{answer_id}"),
                author,
                text: &comment.content,
            })
            .await;

        self.presenter.comment(&comment).await
    }

    /// Newest first.
    pub async fn list_for_answer(&self, answer_id: Uuid) -> Result<Vec<CommentView>> {
        self.ensure_answer(answer_id).await?;
        let comments = self.comments.list_comments_for_answer(answer_id).await?;
        self.presenter.comments(&comments).await
    }

    pub async fn update(&self, caller: &Identity, id: Uuid, content: String) -> Result<CommentView> {
        let content = required_content(content)?;
        let comment = self.load(id).await?;
        caller.ensure_can_modify(comment.user_id, "Comment")?;

        let updated = self
            .comments
            .update_comment_content(id, content)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", id))?;
        tracing::info!(comment_id = %id, user_id = %caller.id, "comment updated");

        self.presenter.comment(&updated).await
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> Result<()> {
        let comment = self.load(id).await?;
        caller.ensure_can_modify(comment.user_id, "Comment")?;

        if !self.comments.delete_comment(id).await? {
            return Err(AppError::not_found("Comment", id));
        }
        tracing::info!(comment_id = %id, user_id = %caller.id, "comment deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Comment> {
        self.comments
            .find_comment(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment", id))
    }

    async fn ensure_answer(&self, answer_id: Uuid) -> Result<()> {
        match self.answers.find_answer(answer_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Answer", answer_id)),
        }
    }
}
