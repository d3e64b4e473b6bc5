//! # Answer Service

use std::sync::Arc;

use uuid::Uuid;

use domains::{Answer, AnswerRepo, AppError, Identity, QuestionRepo, Result, SourceType};

use crate::dispatch::{MentionDispatcher, MentionSource};
use crate::views::{AnswerView, Presenter};

#[derive(Clone)]
pub struct AnswerService {
    answers: Arc<dyn AnswerRepo>,
    questions: Arc<dyn QuestionRepo>,
    presenter: Presenter,
    dispatcher: MentionDispatcher,
}

impl AnswerService {
    pub fn new(
        answers: Arc<dyn AnswerRepo>,
        questions: Arc<dyn QuestionRepo>,
        presenter: Presenter,
        dispatcher: MentionDispatcher,
    ) -> Self {
        Self {
            answers,
            questions,
            presenter,
            dispatcher,
        }
    }

    /// Posts an answer, then notifies the question owner and anyone
    /// mentioned in the content.
    pub async fn create(&self, author: &Identity, question_id: Uuid, content: String) -> Result<AnswerView> {
        let content = required_content(content)?;
        let question = self
            .questions
            .find_question(question_id)
            .await?
            .ok_or_else(|| AppError::not_found("Question", question_id))?;

        let answer = Answer::new(question_id, author.id, content);
        self.answers.insert_answer(answer.clone()).await?;
        tracing::info!(answer_id = %answer.id, %question_id, user_id = %author.id, "answer created");

        self.dispatcher
            .notify_answer_posted(question.user_id, question_id, answer.id, author)
            .await;
        self.dispatcher
            .dispatch_logged(&MentionSource {
                source_type: SourceType::Answer,
                source_id: answer.id,
                reference_id: answer.id,
                link: format!("/question/{question_id}"),
                author,
                text: &answer.content,
            })
            .await;

        self.presenter.answer(&answer).await
    }

    pub async fn list_for_question(&self, question_id: Uuid) -> Result<Vec<AnswerView>> {
        if self.questions.find_question(question_id).await?.is_none() {
            return Err(AppError::not_found("Question", question_id));
        }
        let answers = self.answers.list_answers_for_question(question_id).await?;
        self.presenter.answers(&answers).await
    }

    pub async fn list_mine(&self, caller: &Identity) -> Result<Vec<AnswerView>> {
        let answers = self.answers.list_answers_by_author(caller.id).await?;
        self.presenter.answers(&answers).await
    }

    pub async fn update(&self, caller: &Identity, id: Uuid, content: String) -> Result<AnswerView> {
        let content = required_content(content)?;
        let answer = self.load(id).await?;
        caller.ensure_can_modify(answer.author_id, "Answer")?;

        let updated = self
            .answers
            .update_answer_content(id, content)
            .await?
            .ok_or_else(|| AppError::not_found("Answer", id))?;
        tracing::info!(answer_id = %id, user_id = %caller.id, "answer updated");

        self.presenter.answer(&updated).await
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> Result<()> {
        let answer = self.load(id).await?;
        caller.ensure_can_modify(answer.author_id, "Answer")?;

        if !self.answers.delete_answer(id).await? {
            return Err(AppError::not_found("Answer", id));
        }
        tracing::info!(answer_id = %id, user_id = %caller.id, "answer deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Answer> {
        self.answers
            .find_answer(id)
            .await?
            .ok_or_else(|| AppError::not_found("Answer", id))
    }
}

/// Trimmed, non-empty content or a validation error.
pub(crate) fn required_content(content: String) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError("Content is required".to_string()));
    }
    Ok(trimmed.to_string())
}
