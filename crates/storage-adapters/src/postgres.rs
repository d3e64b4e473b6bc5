//! # PostgreSQL store
//!
//! Maps the relational schema in `migrations/` onto the domain models.
//! Vote sets live in `uuid[]` columns and every cast is a single
//! `UPDATE ... RETURNING` statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use domains::{
    Answer, AnswerRepo, AppError, Comment, CommentRepo, Mention, MentionRepo, Notification,
    NotificationRepo, Question, QuestionEdit, QuestionRepo, Result, Tag, TagRepo, User, UserRepo,
    VoteDirection, VoteLedger, VoteSet, VoteTally, VoteTarget,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(db_err)?;
        tracing::info!(max_connections, "database pool created");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("migration failed: {e}")))?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

/// Unique violations become `Conflict`; anything else is internal.
fn db_err(err: sqlx::Error) -> AppError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some("users_username_key") => "Username already taken",
                Some("users_email_key") => "Email already registered",
                _ => "Resource already exists",
            };
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Internal(err.to_string())
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    reputation: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(|e: AppError| AppError::Internal(e.to_string()))?,
            reputation: row.reputation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct TagRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    color: Option<String>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
        }
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    tag_ids: Vec<Uuid>,
    upvotes: Vec<Uuid>,
    downvotes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            tag_ids: row.tag_ids,
            votes: VoteSet::from_voters(row.upvotes, row.downvotes),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct AnswerRow {
    id: Uuid,
    question_id: Uuid,
    author_id: Uuid,
    content: String,
    upvotes: Vec<Uuid>,
    downvotes: Vec<Uuid>,
    is_pinned: bool,
    is_accepted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Self {
            id: row.id,
            question_id: row.question_id,
            author_id: row.author_id,
            content: row.content,
            votes: VoteSet::from_voters(row.upvotes, row.downvotes),
            is_pinned: row.is_pinned,
            is_accepted: row.is_accepted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: Uuid,
    user_id: Uuid,
    answer_id: Uuid,
    content: String,
    upvotes: Vec<Uuid>,
    downvotes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            answer_id: row.answer_id,
            content: row.content,
            votes: VoteSet::from_voters(row.upvotes, row.downvotes),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct MentionRow {
    id: Uuid,
    source_type: String,
    source_id: Uuid,
    mentioned_user_id: Uuid,
    by_user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<MentionRow> for Mention {
    type Error = AppError;

    fn try_from(row: MentionRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            source_type: row.source_type.parse()?,
            source_id: row.source_id,
            mentioned_user_id: row.mentioned_user_id,
            by_user_id: row.by_user_id,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: Uuid,
    kind: String,
    reference_id: Uuid,
    message: String,
    is_read: bool,
    link: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            recipient_id: row.recipient_id,
            kind: row.kind.parse()?,
            reference_id: row.reference_id,
            message: row.message,
            is_read: row.is_read,
            link: row.link,
            created_at: row.created_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, reputation, created_at, updated_at";
const QUESTION_COLUMNS: &str =
    "id, user_id, title, description, tag_ids, upvotes, downvotes, created_at, updated_at";
const ANSWER_COLUMNS: &str =
    "id, question_id, author_id, content, upvotes, downvotes, is_pinned, is_accepted, created_at, updated_at";
const COMMENT_COLUMNS: &str =
    "id, user_id, answer_id, content, upvotes, downvotes, created_at, updated_at";
const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, kind, reference_id, message, is_read, link, created_at";

#[async_trait]
impl UserRepo for PgStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, reputation, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.reputation)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}

#[async_trait]
impl TagRepo for PgStore {
    async fn find_or_create_tag(&self, name: &str) -> Result<Tag> {
        // The no-op update makes RETURNING yield the existing row.
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags (id, name) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING id, name, description, color",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn find_tags(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, description, color FROM tags WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, description, color FROM tags ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }
}

#[async_trait]
impl QuestionRepo for PgStore {
    async fn insert_question(&self, question: Question) -> Result<()> {
        sqlx::query(
            "INSERT INTO questions (id, user_id, title, description, tag_ids, upvotes, downvotes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(question.id)
        .bind(question.user_id)
        .bind(&question.title)
        .bind(&question.description)
        .bind(&question.tag_ids)
        .bind(question.votes.upvotes.iter().copied().collect::<Vec<_>>())
        .bind(question.votes.downvotes.iter().copied().collect::<Vec<_>>())
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> Result<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Question::from))
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn list_questions_by_user(&self, user_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn list_unanswered_questions(&self) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions q \
             WHERE NOT EXISTS (SELECT 1 FROM answers a WHERE a.question_id = q.id) \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn update_question(&self, id: Uuid, edit: QuestionEdit) -> Result<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "UPDATE questions SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                tag_ids = COALESCE($4, tag_ids), \
                updated_at = now() \
             WHERE id = $1 RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(id)
        .bind(edit.title)
        .bind(edit.description)
        .bind(edit.tag_ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Question::from))
    }

    async fn delete_question(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AnswerRepo for PgStore {
    async fn insert_answer(&self, answer: Answer) -> Result<()> {
        sqlx::query(
            "INSERT INTO answers (id, question_id, author_id, content, upvotes, downvotes, is_pinned, is_accepted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(answer.id)
        .bind(answer.question_id)
        .bind(answer.author_id)
        .bind(&answer.content)
        .bind(answer.votes.upvotes.iter().copied().collect::<Vec<_>>())
        .bind(answer.votes.downvotes.iter().copied().collect::<Vec<_>>())
        .bind(answer.is_pinned)
        .bind(answer.is_accepted)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_answer(&self, id: Uuid) -> Result<Option<Answer>> {
        let row = sqlx::query_as::<_, AnswerRow>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Answer::from))
    }

    async fn list_answers_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Answer::from).collect())
    }

    async fn list_answers_by_author(&self, author_id: Uuid) -> Result<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE author_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Answer::from).collect())
    }

    async fn update_answer_content(&self, id: Uuid, content: String) -> Result<Option<Answer>> {
        let row = sqlx::query_as::<_, AnswerRow>(&format!(
            "UPDATE answers SET content = $2, updated_at = now() WHERE id = $1 RETURNING {ANSWER_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Answer::from))
    }

    async fn delete_answer(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn insert_comment(&self, comment: Comment) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (id, user_id, answer_id, content, upvotes, downvotes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(comment.id)
        .bind(comment.user_id)
        .bind(comment.answer_id)
        .bind(&comment.content)
        .bind(comment.votes.upvotes.iter().copied().collect::<Vec<_>>())
        .bind(comment.votes.downvotes.iter().copied().collect::<Vec<_>>())
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Comment::from))
    }

    async fn list_comments_for_answer(&self, answer_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE answer_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(answer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn update_comment_content(&self, id: Uuid, content: String) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "UPDATE comments SET content = $2, updated_at = now() WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.map(Comment::from))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(FromRow)]
struct TallyRow {
    up: i64,
    down: i64,
}

fn vote_table(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Question(_) => "questions",
        VoteTarget::Answer(_) => "answers",
        VoteTarget::Comment(_) => "comments",
    }
}

/// SET clause that removes `$2` from both arrays, then appends it to the
/// chosen one.
fn vote_assignment(direction: VoteDirection) -> &'static str {
    match direction {
        VoteDirection::Up => {
            "upvotes = array_append(array_remove(upvotes, $2), $2), \
             downvotes = array_remove(downvotes, $2)"
        }
        VoteDirection::Down => {
            "upvotes = array_remove(upvotes, $2), \
             downvotes = array_append(array_remove(downvotes, $2), $2)"
        }
        VoteDirection::Retract => {
            "upvotes = array_remove(upvotes, $2), \
             downvotes = array_remove(downvotes, $2)"
        }
    }
}

#[async_trait]
impl VoteLedger for PgStore {
    async fn cast_vote(
        &self,
        target: VoteTarget,
        voter: Uuid,
        direction: VoteDirection,
    ) -> Result<Option<VoteTally>> {
        let sql = format!(
            "UPDATE {} SET {} WHERE id = $1 \
             RETURNING cardinality(upvotes)::bigint AS up, cardinality(downvotes)::bigint AS down",
            vote_table(target),
            vote_assignment(direction),
        );
        let row = sqlx::query_as::<_, TallyRow>(&sql)
            .bind(target.id())
            .bind(voter)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(|r| VoteTally::new(r.up, r.down)))
    }

    async fn vote_tally(&self, target: VoteTarget) -> Result<Option<VoteTally>> {
        let sql = format!(
            "SELECT cardinality(upvotes)::bigint AS up, cardinality(downvotes)::bigint AS down \
             FROM {} WHERE id = $1",
            vote_table(target),
        );
        let row = sqlx::query_as::<_, TallyRow>(&sql)
            .bind(target.id())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.map(|r| VoteTally::new(r.up, r.down)))
    }
}

#[async_trait]
impl MentionRepo for PgStore {
    async fn insert_mention(&self, mention: Mention) -> Result<()> {
        sqlx::query(
            "INSERT INTO mentions (id, source_type, source_id, mentioned_user_id, by_user_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(mention.id)
        .bind(mention.source_type.as_str())
        .bind(mention.source_id)
        .bind(mention.mentioned_user_id)
        .bind(mention.by_user_id)
        .bind(mention.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_mentions_for_user(&self, user_id: Uuid) -> Result<Vec<Mention>> {
        sqlx::query_as::<_, MentionRow>(
            "SELECT id, source_type, source_id, mentioned_user_id, by_user_id, created_at \
             FROM mentions WHERE mentioned_user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(Mention::try_from)
        .collect()
    }
}

#[async_trait]
impl NotificationRepo for PgStore {
    async fn insert_notification(&self, notification: Notification) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO notifications ({NOTIFICATION_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.kind.as_str())
        .bind(notification.reference_id)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(&notification.link)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_notifications_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(Notification::try_from)
        .collect()
    }

    async fn mark_notification_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_id = $2",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
