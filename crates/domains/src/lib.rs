//! crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for StackIt.

pub mod error;
pub mod identity;
pub mod mentions;
pub mod models;
pub mod traits;
pub mod votes;

// Re-exporting for easier access in other crates
pub use error::*;
pub use identity::*;
pub use models::*;
pub use traits::*;
pub use votes::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_question_creation_v7() {
        let owner = Uuid::now_v7();
        let question = Question::new(
            owner,
            "Borrow checker?".to_string(),
            "Why does this not compile".to_string(),
            vec![],
        );
        assert_eq!(question.user_id, owner);
        assert_eq!(question.id.get_version_num(), 7);
        assert_eq!(question.votes.net(), 0);
    }
}
