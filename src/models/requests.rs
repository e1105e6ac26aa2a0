//! Request bodies sent to the voting backend

use serde::Serialize;

/// Body of the vote submission (POST /api/vote)
#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest {
    /// Identifier of the chosen option
    pub choice: String,
}

impl VoteRequest {
    pub fn new(choice: impl Into<String>) -> Self {
        Self {
            choice: choice.into(),
        }
    }

    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.choice.trim().is_empty() {
            return Some("Choice cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_request_serialize() {
        let json = serde_json::to_string(&VoteRequest::new("option-a")).unwrap();
        assert_eq!(json, r#"{"choice":"option-a"}"#);
    }

    #[test]
    fn test_validate_empty_choice() {
        assert!(VoteRequest::new("  ").validate().is_some());
        assert!(VoteRequest::new("b").validate().is_none());
    }
}
