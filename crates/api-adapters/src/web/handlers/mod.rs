//! Request handlers, one module per resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use domains::{VoteDirection, VoteTally};

pub mod answers;
pub mod auth;
pub mod comments;
pub mod notifications;
pub mod questions;

pub async fn root() -> &'static str {
    "Hello World"
}

/// Body of every `/vote` route. Anything but the strings "up" or "down"
/// retracts, including non-string JSON.
#[derive(Debug, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "type")]
    pub kind: Option<Value>,
}

impl VoteRequest {
    pub fn direction(&self) -> VoteDirection {
        VoteDirection::parse(self.kind.as_ref().and_then(Value::as_str))
    }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub message: &'static str,
    /// Net score
    pub votes: i64,
    pub up: i64,
    pub down: i64,
}

impl From<VoteTally> for VoteResponse {
    fn from(tally: VoteTally) -> Self {
        Self {
            message: "Vote updated",
            votes: tally.net,
            up: tally.up,
            down: tally.down,
        }
    }
}

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body of the content-only edit and create routes.
#[derive(Debug, Default, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}
