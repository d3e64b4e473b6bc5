//! # Vote Ledger
//!
//! Set-based voting shared by questions, answers and comments.
//! A voter lives in at most one of the two sets; recasting a vote moves
//! them, and anything that is not "up" or "down" retracts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a voter asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
    /// Leaves the voter in neither set.
    Retract,
}

impl VoteDirection {
    /// Parses the `type` field of a vote request. Unknown or missing
    /// values are a retraction, not an error.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("up") => Self::Up,
            Some("down") => Self::Down,
            _ => Self::Retract,
        }
    }
}

/// Up and down voter sets carried by every votable entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSet {
    pub upvotes: BTreeSet<Uuid>,
    pub downvotes: BTreeSet<Uuid>,
}

impl VoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set pair from stored voter lists.
    pub fn from_voters(
        upvotes: impl IntoIterator<Item = Uuid>,
        downvotes: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        Self {
            upvotes: upvotes.into_iter().collect(),
            downvotes: downvotes.into_iter().collect(),
        }
    }

    /// Records one vote for `voter`, replacing whatever they cast before.
    pub fn cast(&mut self, voter: Uuid, direction: VoteDirection) {
        self.upvotes.remove(&voter);
        self.downvotes.remove(&voter);

        match direction {
            VoteDirection::Up => {
                self.upvotes.insert(voter);
            }
            VoteDirection::Down => {
                self.downvotes.insert(voter);
            }
            VoteDirection::Retract => {}
        }
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::new(self.upvotes.len() as i64, self.downvotes.len() as i64)
    }

    pub fn net(&self) -> i64 {
        self.tally().net
    }
}

/// Vote counts exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub up: i64,
    pub down: i64,
    pub net: i64,
}

impl VoteTally {
    pub fn new(up: i64, down: i64) -> Self {
        Self { up, down, net: up - down }
    }
}

/// The entity a vote is cast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Question(Uuid),
    Answer(Uuid),
    Comment(Uuid),
}

impl VoteTarget {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Question(id) | Self::Answer(id) | Self::Comment(id) => *id,
        }
    }

    /// Human-readable entity name used in NotFound errors.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Question(_) => "Question",
            Self::Answer(_) => "Answer",
            Self::Comment(_) => "Comment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_then_down_moves_voter() {
        let voter = Uuid::now_v7();
        let mut votes = VoteSet::new();

        votes.cast(voter, VoteDirection::Up);
        assert_eq!(votes.net(), 1);

        votes.cast(voter, VoteDirection::Down);
        assert!(votes.downvotes.contains(&voter));
        assert!(!votes.upvotes.contains(&voter));
        assert_eq!(votes.tally(), VoteTally { up: 0, down: 1, net: -1 });
    }

    #[test]
    fn repeating_a_vote_is_idempotent() {
        let voter = Uuid::now_v7();
        let mut votes = VoteSet::new();

        votes.cast(voter, VoteDirection::Up);
        let once = votes.tally();
        votes.cast(voter, VoteDirection::Up);

        assert_eq!(votes.tally(), once);
    }

    #[test]
    fn unknown_direction_retracts() {
        let voter = Uuid::now_v7();
        let other = Uuid::now_v7();
        let mut votes = VoteSet::new();
        votes.cast(voter, VoteDirection::Down);
        votes.cast(other, VoteDirection::Up);

        votes.cast(voter, VoteDirection::parse(Some("sideways")));

        assert!(!votes.downvotes.contains(&voter));
        assert!(!votes.upvotes.contains(&voter));
        assert_eq!(votes.net(), 1);
    }

    #[test]
    fn parse_recognises_only_up_and_down() {
        assert_eq!(VoteDirection::parse(Some("up")), VoteDirection::Up);
        assert_eq!(VoteDirection::parse(Some("down")), VoteDirection::Down);
        assert_eq!(VoteDirection::parse(Some("UP")), VoteDirection::Retract);
        assert_eq!(VoteDirection::parse(None), VoteDirection::Retract);
    }

    #[test]
    fn net_counts_distinct_voters() {
        let mut votes = VoteSet::new();
        for _ in 0..3 {
            votes.cast(Uuid::now_v7(), VoteDirection::Up);
        }
        votes.cast(Uuid::now_v7(), VoteDirection::Down);
        assert_eq!(votes.tally(), VoteTally::new(3, 1));
        assert_eq!(votes.net(), 2);
    }
}
