//! # Vote Service
//!
//! Thin layer over the `VoteLedger` port: existence checks and logging.
//! The ledger itself guarantees the per-target atomic update.

use std::sync::Arc;

use uuid::Uuid;

use domains::{AppError, Result, VoteDirection, VoteLedger, VoteTally, VoteTarget};

#[derive(Clone)]
pub struct VoteService {
    ledger: Arc<dyn VoteLedger>,
}

impl VoteService {
    pub fn new(ledger: Arc<dyn VoteLedger>) -> Self {
        Self { ledger }
    }

    pub async fn cast(&self, target: VoteTarget, voter: Uuid, direction: VoteDirection) -> Result<VoteTally> {
        let tally = self
            .ledger
            .cast_vote(target, voter, direction)
            .await?
            .ok_or_else(|| AppError::not_found(target.entity(), target.id()))?;

        tracing::debug!(
            entity = target.entity(),
            target_id = %target.id(),
            %voter,
            ?direction,
            net = tally.net,
            "vote recorded"
        );
        Ok(tally)
    }

    pub async fn tally(&self, target: VoteTarget) -> Result<VoteTally> {
        self.ledger
            .vote_tally(target)
            .await?
            .ok_or_else(|| AppError::not_found(target.entity(), target.id()))
    }
}
