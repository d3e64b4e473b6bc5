//! # In-memory store
//!
//! `DashMap`-backed implementation of every storage port. Each collection
//! is keyed by id; vote casts mutate one entry under its shard lock, so
//! concurrent voters never overwrite each other.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{
    Answer, AnswerRepo, AppError, Comment, CommentRepo, Mention, MentionRepo, Notification,
    NotificationRepo, Question, QuestionEdit, QuestionRepo, Result, Tag, TagRepo, User, UserRepo,
    VoteDirection, VoteLedger, VoteSet, VoteTally, VoteTarget,
};

#[derive(Default)]
pub struct InMemoryStore {
    users: DashMap<Uuid, User>,
    usernames: DashMap<String, Uuid>,
    emails: DashMap<String, Uuid>,
    tags: DashMap<String, Tag>,
    questions: DashMap<Uuid, Question>,
    answers: DashMap<Uuid, Answer>,
    comments: DashMap<Uuid, Comment>,
    mentions: DashMap<Uuid, Mention>,
    notifications: DashMap<Uuid, Notification>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a stored user's role. Used to seed administrators.
    pub fn set_role(&self, user_id: Uuid, role: domains::Role) -> bool {
        match self.users.get_mut(&user_id) {
            Some(mut user) => {
                user.role = role;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

/// Creation order of a stored record; ids break timestamp ties.
trait Timeline {
    fn order_key(&self) -> (DateTime<Utc>, Uuid);
}

macro_rules! timeline {
    ($($ty:ty),*) => {
        $(impl Timeline for $ty {
            fn order_key(&self) -> (DateTime<Utc>, Uuid) {
                (self.created_at, self.id)
            }
        })*
    };
}

timeline!(Question, Answer, Comment, Mention, Notification);

/// Clones matching values out of a map, newest first.
fn collect_newest<T, F>(map: &DashMap<Uuid, T>, keep: F) -> Vec<T>
where
    T: Clone + Timeline,
    F: Fn(&T) -> bool,
{
    let mut items: Vec<T> = map
        .iter()
        .filter(|e| keep(e.value()))
        .map(|e| e.value().clone())
        .collect();
    items.sort_by_key(|item| std::cmp::Reverse(item.order_key()));
    items
}

#[async_trait]
impl UserRepo for InMemoryStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&user.username);
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        self.users.insert(user.id, user);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let id = self.usernames.get(username).map(|id| *id);
        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let id = self.emails.get(email).map(|id| *id);
        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.value().clone())))
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }
}

#[async_trait]
impl TagRepo for InMemoryStore {
    async fn find_or_create_tag(&self, name: &str) -> Result<Tag> {
        let tag = self
            .tags
            .entry(name.to_string())
            .or_insert_with(|| Tag::named(name));
        Ok(tag.clone())
    }

    async fn find_tags(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        Ok(self
            .tags
            .iter()
            .filter(|t| ids.contains(&t.id))
            .map(|t| t.value().clone())
            .collect())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self.tags.iter().map(|t| t.value().clone()).collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[async_trait]
impl QuestionRepo for InMemoryStore {
    async fn insert_question(&self, question: Question) -> Result<()> {
        self.questions.insert(question.id, question);
        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> Result<Option<Question>> {
        Ok(self.questions.get(&id).map(|q| q.value().clone()))
    }

    async fn list_questions(&self) -> Result<Vec<Question>> {
        Ok(collect_newest(&self.questions, |_| true))
    }

    async fn list_questions_by_user(&self, user_id: Uuid) -> Result<Vec<Question>> {
        Ok(collect_newest(&self.questions, |q| q.user_id == user_id))
    }

    async fn list_unanswered_questions(&self) -> Result<Vec<Question>> {
        let answered: HashSet<Uuid> = self.answers.iter().map(|a| a.question_id).collect();
        Ok(collect_newest(&self.questions, |q| !answered.contains(&q.id)))
    }

    async fn update_question(&self, id: Uuid, edit: QuestionEdit) -> Result<Option<Question>> {
        let Some(mut question) = self.questions.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = edit.title {
            question.title = title;
        }
        if let Some(description) = edit.description {
            question.description = description;
        }
        if let Some(tag_ids) = edit.tag_ids {
            question.tag_ids = tag_ids;
        }
        question.updated_at = Utc::now();

        Ok(Some(question.value().clone()))
    }

    async fn delete_question(&self, id: Uuid) -> Result<bool> {
        Ok(self.questions.remove(&id).is_some())
    }
}

#[async_trait]
impl AnswerRepo for InMemoryStore {
    async fn insert_answer(&self, answer: Answer) -> Result<()> {
        self.answers.insert(answer.id, answer);
        Ok(())
    }

    async fn find_answer(&self, id: Uuid) -> Result<Option<Answer>> {
        Ok(self.answers.get(&id).map(|a| a.value().clone()))
    }

    async fn list_answers_for_question(&self, question_id: Uuid) -> Result<Vec<Answer>> {
        let mut answers = collect_newest(&self.answers, |a| a.question_id == question_id);
        answers.reverse();
        Ok(answers)
    }

    async fn list_answers_by_author(&self, author_id: Uuid) -> Result<Vec<Answer>> {
        Ok(collect_newest(&self.answers, |a| a.author_id == author_id))
    }

    async fn update_answer_content(&self, id: Uuid, content: String) -> Result<Option<Answer>> {
        Ok(self.answers.get_mut(&id).map(|mut answer| {
            answer.content = content;
            answer.updated_at = Utc::now();
            answer.clone()
        }))
    }

    async fn delete_answer(&self, id: Uuid) -> Result<bool> {
        Ok(self.answers.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentRepo for InMemoryStore {
    async fn insert_comment(&self, comment: Comment) -> Result<()> {
        self.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.value().clone()))
    }

    async fn list_comments_for_answer(&self, answer_id: Uuid) -> Result<Vec<Comment>> {
        Ok(collect_newest(&self.comments, |c| c.answer_id == answer_id))
    }

    async fn update_comment_content(&self, id: Uuid, content: String) -> Result<Option<Comment>> {
        Ok(self.comments.get_mut(&id).map(|mut comment| {
            comment.content = content;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        Ok(self.comments.remove(&id).is_some())
    }
}

/// Access to the vote sets shared by every votable entity.
trait Votable {
    fn vote_set(&self) -> &VoteSet;
    fn vote_set_mut(&mut self) -> &mut VoteSet;
}

impl Votable for Question {
    fn vote_set(&self) -> &VoteSet {
        &self.votes
    }

    fn vote_set_mut(&mut self) -> &mut VoteSet {
        &mut self.votes
    }
}

impl Votable for Answer {
    fn vote_set(&self) -> &VoteSet {
        &self.votes
    }

    fn vote_set_mut(&mut self) -> &mut VoteSet {
        &mut self.votes
    }
}

impl Votable for Comment {
    fn vote_set(&self) -> &VoteSet {
        &self.votes
    }

    fn vote_set_mut(&mut self) -> &mut VoteSet {
        &mut self.votes
    }
}

/// Applies the vote while holding the entry's write lock.
fn cast_in<T: Votable>(map: &DashMap<Uuid, T>, id: Uuid, voter: Uuid, direction: VoteDirection) -> Option<VoteTally> {
    map.get_mut(&id).map(|mut entity| {
        let votes = entity.vote_set_mut();
        votes.cast(voter, direction);
        votes.tally()
    })
}

fn tally_in<T: Votable>(map: &DashMap<Uuid, T>, id: Uuid) -> Option<VoteTally> {
    map.get(&id).map(|entity| entity.vote_set().tally())
}

#[async_trait]
impl VoteLedger for InMemoryStore {
    async fn cast_vote(
        &self,
        target: VoteTarget,
        voter: Uuid,
        direction: VoteDirection,
    ) -> Result<Option<VoteTally>> {
        Ok(match target {
            VoteTarget::Question(id) => cast_in(&self.questions, id, voter, direction),
            VoteTarget::Answer(id) => cast_in(&self.answers, id, voter, direction),
            VoteTarget::Comment(id) => cast_in(&self.comments, id, voter, direction),
        })
    }

    async fn vote_tally(&self, target: VoteTarget) -> Result<Option<VoteTally>> {
        Ok(match target {
            VoteTarget::Question(id) => tally_in(&self.questions, id),
            VoteTarget::Answer(id) => tally_in(&self.answers, id),
            VoteTarget::Comment(id) => tally_in(&self.comments, id),
        })
    }
}

#[async_trait]
impl MentionRepo for InMemoryStore {
    async fn insert_mention(&self, mention: Mention) -> Result<()> {
        self.mentions.insert(mention.id, mention);
        Ok(())
    }

    async fn list_mentions_for_user(&self, user_id: Uuid) -> Result<Vec<Mention>> {
        Ok(collect_newest(&self.mentions, |m| m.mentioned_user_id == user_id))
    }
}

#[async_trait]
impl NotificationRepo for InMemoryStore {
    async fn insert_notification(&self, notification: Notification) -> Result<()> {
        self.notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn list_notifications_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
        Ok(collect_newest(&self.notifications, |n| n.recipient_id == recipient_id))
    }

    async fn mark_notification_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool> {
        match self.notifications.get_mut(&id) {
            Some(mut n) if n.recipient_id == recipient_id => {
                n.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<u64> {
        let mut updated = 0;
        for mut n in self.notifications.iter_mut() {
            if n.recipient_id == recipient_id && !n.is_read {
                n.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
