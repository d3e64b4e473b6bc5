//! # Identity
//!
//! The authenticated caller, as resolved by the session gate and passed
//! explicitly into every service call that needs it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Role, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule for mutating content.
    pub fn can_modify(&self, owner_id: Uuid) -> bool {
        self.id == owner_id || self.is_admin()
    }

    pub fn ensure_can_modify(&self, owner_id: Uuid, entity: &str) -> Result<()> {
        if self.can_modify(owner_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Not authorized to modify this {}",
                entity.to_lowercase()
            )))
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
