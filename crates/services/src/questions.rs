//! # Question Service
//!
//! Question CRUD plus the nested detail view. Tag names are resolved to
//! ids here (find-or-create), and mentions in the description are
//! dispatched after the write.

use std::sync::Arc;

use uuid::Uuid;

use domains::{
    AnswerRepo, AppError, CommentRepo, Identity, Question, QuestionEdit, QuestionRepo, Result,
    SourceType, Tag, TagRepo,
};

use crate::dispatch::{MentionDispatcher, MentionSource};
use crate::views::{AnswerThread, Presenter, QuestionDetail, QuestionView};

#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub tag_names: Vec<String>,
}

/// A partial edit. Empty strings count as "not provided".
#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag_names: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct QuestionService {
    questions: Arc<dyn QuestionRepo>,
    answers: Arc<dyn AnswerRepo>,
    comments: Arc<dyn CommentRepo>,
    tags: Arc<dyn TagRepo>,
    presenter: Presenter,
    dispatcher: MentionDispatcher,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionRepo>,
        answers: Arc<dyn AnswerRepo>,
        comments: Arc<dyn CommentRepo>,
        tags: Arc<dyn TagRepo>,
        presenter: Presenter,
        dispatcher: MentionDispatcher,
    ) -> Self {
        Self {
            questions,
            answers,
            comments,
            tags,
            presenter,
            dispatcher,
        }
    }

    pub async fn create(&self, author: &Identity, input: NewQuestion) -> Result<QuestionView> {
        let title = input.title.trim();
        let description = input.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(AppError::ValidationError(
                "Title and description are required".to_string(),
            ));
        }

        let tag_ids = self.resolve_tags(&input.tag_names).await?;
        let question = Question::new(author.id, title.to_string(), description.to_string(), tag_ids);
        self.questions.insert_question(question.clone()).await?;
        tracing::info!(question_id = %question.id, user_id = %author.id, "question created");

        self.dispatcher
            .dispatch_logged(&MentionSource {
                source_type: SourceType::Question,
                source_id: question.id,
                reference_id: question.id,
                link: format!("/question/{}", question.id),
                author,
                text: &question.description,
            })
            .await;

        self.presenter.question(&question).await
    }

    pub async fn list(&self) -> Result<Vec<QuestionView>> {
        let questions = self.questions.list_questions().await?;
        self.presenter.questions(&questions).await
    }

    pub async fn list_mine(&self, caller: &Identity) -> Result<Vec<QuestionView>> {
        let questions = self.questions.list_questions_by_user(caller.id).await?;
        self.presenter.questions(&questions).await
    }

    pub async fn list_unanswered(&self) -> Result<Vec<QuestionView>> {
        let questions = self.questions.list_unanswered_questions().await?;
        self.presenter.questions(&questions).await
    }

    /// The question with its answers (oldest first) and each answer's
    /// comments (newest first).
    pub async fn get(&self, id: Uuid) -> Result<QuestionDetail> {
        let question = self.load(id).await?;
        let question_view = self.presenter.question(&question).await?;

        let answers = self.answers.list_answers_for_question(id).await?;
        let answer_views = self.presenter.answers(&answers).await?;

        let mut threads = Vec::with_capacity(answer_views.len());
        for answer in answer_views {
            let comments = self.comments.list_comments_for_answer(answer.id).await?;
            threads.push(AnswerThread {
                comments: self.presenter.comments(&comments).await?,
                answer,
            });
        }

        Ok(QuestionDetail {
            question: question_view,
            answers: threads,
        })
    }

    pub async fn update(&self, caller: &Identity, id: Uuid, input: QuestionUpdate) -> Result<QuestionView> {
        let question = self.load(id).await?;
        caller.ensure_can_modify(question.user_id, "Question")?;

        let tag_ids = match input.tag_names {
            Some(names) => Some(self.resolve_tags(&names).await?),
            None => None,
        };
        let edit = QuestionEdit {
            title: non_empty(input.title),
            description: non_empty(input.description),
            tag_ids,
        };

        let updated = self
            .questions
            .update_question(id, edit)
            .await?
            .ok_or_else(|| AppError::not_found("Question", id))?;
        tracing::info!(question_id = %id, user_id = %caller.id, "question updated");

        self.presenter.question(&updated).await
    }

    pub async fn delete(&self, caller: &Identity, id: Uuid) -> Result<()> {
        let question = self.load(id).await?;
        caller.ensure_can_modify(question.user_id, "Question")?;

        if !self.questions.delete_question(id).await? {
            return Err(AppError::not_found("Question", id));
        }
        tracing::info!(question_id = %id, user_id = %caller.id, "question deleted");
        Ok(())
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.tags.list_tags().await
    }

    async fn load(&self, id: Uuid) -> Result<Question> {
        self.questions
            .find_question(id)
            .await?
            .ok_or_else(|| AppError::not_found("Question", id))
    }

    /// Trims names, drops blanks and repeats, keeps first-seen order.
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<Uuid>> {
        let mut seen: Vec<&str> = Vec::new();
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }

        let mut ids = Vec::with_capacity(seen.len());
        for name in seen {
            ids.push(self.tags.find_or_create_tag(name).await?.id);
        }
        Ok(ids)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
