//! # Mention & Notification Dispatch
//!
//! Runs after a question, answer or comment has been stored. Failures here
//! are logged and swallowed: the content write has already succeeded and
//! is never rolled back.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::mentions::extract_mentions;
use domains::{
    Identity, Mention, MentionRepo, Notification, NotificationKind, NotificationRepo, Result,
    SourceType, UserRepo,
};

/// Where a piece of freshly stored content lives and who wrote it.
#[derive(Debug, Clone)]
pub struct MentionSource<'a> {
    pub source_type: SourceType,
    pub source_id: Uuid,
    /// Id the notification points at (the parent answer for comments).
    pub reference_id: Uuid,
    pub link: String,
    pub author: &'a Identity,
    pub text: &'a str,
}

#[derive(Clone)]
pub struct MentionDispatcher {
    users: Arc<dyn UserRepo>,
    mentions: Arc<dyn MentionRepo>,
    notifications: Arc<dyn NotificationRepo>,
}

impl MentionDispatcher {
    pub fn new(
        users: Arc<dyn UserRepo>,
        mentions: Arc<dyn MentionRepo>,
        notifications: Arc<dyn NotificationRepo>,
    ) -> Self {
        Self {
            users,
            mentions,
            notifications,
        }
    }

    /// Records a Mention and a `mention` Notification for every resolvable
    /// `@username` in the text. Unknown names and self-mentions are
    /// skipped. Returns how many users were notified.
    pub async fn dispatch(&self, source: &MentionSource<'_>) -> Result<usize> {
        let mut notified = 0;

        for username in extract_mentions(source.text) {
            let Some(user) = self.users.find_user_by_username(&username).await? else {
                tracing::debug!(%username, "mention of unknown user ignored");
                continue;
            };
            if user.id == source.author.id {
                continue;
            }

            self.mentions
                .insert_mention(Mention {
                    id: Uuid::now_v7(),
                    source_type: source.source_type,
                    source_id: source.source_id,
                    mentioned_user_id: user.id,
                    by_user_id: source.author.id,
                    created_at: Utc::now(),
                })
                .await?;

            self.notifications
                .insert_notification(Notification::new(
                    user.id,
                    NotificationKind::Mention,
                    source.reference_id,
                    format!(
                        "{} mentioned you in {} {}.",
                        source.author.username,
                        article(source.source_type),
                        source.source_type.as_str()
                    ),
                    Some(source.link.clone()),
                ))
                .await?;

            notified += 1;
        }

        Ok(notified)
    }

    /// [`dispatch`](Self::dispatch), with failures logged instead of returned.
    pub async fn dispatch_logged(&self, source: &MentionSource<'_>) {
        match self.dispatch(source).await {
            Ok(0) => {}
            Ok(notified) => tracing::info!(
                source_type = source.source_type.as_str(),
                source_id = %source.source_id,
                notified,
                "mentions dispatched"
            ),
            Err(e) => tracing::warn!(
                source_type = source.source_type.as_str(),
                source_id = %source.source_id,
                error = %e,
                "mention dispatch failed; content kept"
            ),
        }
    }

    /// Tells a question owner that someone answered. Skipped for self-answers.
    pub async fn notify_answer_posted(
        &self,
        question_owner: Uuid,
        question_id: Uuid,
        answer_id: Uuid,
        author: &Identity,
    ) {
        if question_owner == author.id {
            return;
        }

        let notification = Notification::new(
            question_owner,
            NotificationKind::AnswerPosted,
            answer_id,
            format!("{} answered your question.", author.username),
            Some(format!("/question/{question_id}")),
        );
        if let Err(e) = self.notifications.insert_notification(notification).await {
            tracing::warn!(%answer_id, error = %e, "answer notification failed; answer kept");
        }
    }
}

fn article(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Answer => "an",
        SourceType::Question | SourceType::Comment => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{AppError, MockMentionRepo, MockNotificationRepo, MockUserRepo, Role, User};

    fn identity(username: &str) -> Identity {
        Identity {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: Role::User,
        }
    }

    fn source<'a>(author: &'a Identity, text: &'a str, answer_id: Uuid) -> MentionSource<'a> {
        MentionSource {
            source_type: SourceType::Comment,
            source_id: Uuid::now_v7(),
            reference_id: answer_id,
            link: format!("/answer/{answer_id}"),
            author,
            text,
        }
    }

    #[tokio::test]
    async fn known_user_gets_one_mention_and_one_notification() {
        let author = identity("dave");
        let carol = User::new("carol".into(), "carol@example.com".into(), "h".into());
        let carol_id = carol.id;
        let answer_id = Uuid::now_v7();

        let mut users = MockUserRepo::new();
        users
            .expect_find_user_by_username()
            .withf(|name| name == "carol")
            .times(1)
            .returning(move |_| Ok(Some(carol.clone())));

        let mut mentions = MockMentionRepo::new();
        let author_id = author.id;
        mentions
            .expect_insert_mention()
            .withf(move |m| {
                m.mentioned_user_id == carol_id
                    && m.by_user_id == author_id
                    && m.source_type == SourceType::Comment
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut notifications = MockNotificationRepo::new();
        notifications
            .expect_insert_notification()
            .withf(move |n| {
                n.recipient_id == carol_id
                    && n.kind == NotificationKind::Mention
                    && n.reference_id == answer_id
                    && n.message.contains("dave")
                    && n.link.as_deref() == Some(format!("/answer/{answer_id}").as_str())
            })
            .times(1)
            .returning(|_| Ok(()));

        let dispatcher =
            MentionDispatcher::new(Arc::new(users), Arc::new(mentions), Arc::new(notifications));
        let notified = dispatcher
            .dispatch(&source(&author, "@carol nice!", answer_id))
            .await
            .unwrap();

        assert_eq!(notified, 1);
    }

    #[tokio::test]
    async fn unknown_user_is_silently_ignored() {
        let author = identity("dave");
        let mut users = MockUserRepo::new();
        users.expect_find_user_by_username().returning(|_| Ok(None));

        // No expectations: any insert would panic.
        let dispatcher = MentionDispatcher::new(
            Arc::new(users),
            Arc::new(MockMentionRepo::new()),
            Arc::new(MockNotificationRepo::new()),
        );
        let notified = dispatcher
            .dispatch(&source(&author, "@carol nice!", Uuid::now_v7()))
            .await
            .unwrap();

        assert_eq!(notified, 0);
    }

    #[tokio::test]
    async fn self_mentions_are_skipped() {
        let me = User::new("dave".into(), "dave@example.com".into(), "h".into());
        let author = Identity::from(&me);
        let mut users = MockUserRepo::new();
        users
            .expect_find_user_by_username()
            .returning(move |_| Ok(Some(me.clone())));

        let dispatcher = MentionDispatcher::new(
            Arc::new(users),
            Arc::new(MockMentionRepo::new()),
            Arc::new(MockNotificationRepo::new()),
        );
        let notified = dispatcher
            .dispatch(&source(&author, "note to self @dave", Uuid::now_v7()))
            .await
            .unwrap();

        assert_eq!(notified, 0);
    }

    #[tokio::test]
    async fn logged_dispatch_swallows_store_errors() {
        let author = identity("dave");
        let mut users = MockUserRepo::new();
        users
            .expect_find_user_by_username()
            .returning(|_| Err(AppError::Internal("store down".into())));

        let dispatcher = MentionDispatcher::new(
            Arc::new(users),
            Arc::new(MockMentionRepo::new()),
            Arc::new(MockNotificationRepo::new()),
        );

        // Completes without panicking or propagating.
        dispatcher
            .dispatch_logged(&source(&author, "@carol", Uuid::now_v7()))
            .await;
    }

    #[tokio::test]
    async fn answer_notification_skips_self_answers() {
        let author = identity("dave");
        let dispatcher = MentionDispatcher::new(
            Arc::new(MockUserRepo::new()),
            Arc::new(MockMentionRepo::new()),
            Arc::new(MockNotificationRepo::new()),
        );

        dispatcher
            .notify_answer_posted(author.id, Uuid::now_v7(), Uuid::now_v7(), &author)
            .await;
    }
}
