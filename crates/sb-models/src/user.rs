//! Sales users and the session identity

use sb_core::traits::{Id, UserContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesRole {
    SalesManager,
    SalesRep,
}

/// A sales user as listed by the backend (reviewer picker etc.)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesUser {
    pub id: Id,
    pub full_name: String,
    pub role: SalesRole,
}

impl SalesUser {
    /// Only sales managers may be assigned as internal reviewers.
    pub fn can_review(&self) -> bool {
        self.role == SalesRole::SalesManager
    }
}

/// The authenticated session identity, injected once per edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Id,
    pub role: SalesRole,
}

impl SessionUser {
    pub fn new(id: Id, role: SalesRole) -> Self {
        Self { id, role }
    }
}

impl UserContext for SessionUser {
    fn user_id(&self) -> Id {
        self.id
    }

    fn is_sales_manager(&self) -> bool {
        self.role == SalesRole::SalesManager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reviewer_eligibility() {
        let manager = SalesUser {
            id: 1,
            full_name: "A Manager".to_string(),
            role: SalesRole::SalesManager,
        };
        let rep = SalesUser {
            id: 2,
            full_name: "A Rep".to_string(),
            role: SalesRole::SalesRep,
        };
        assert!(manager.can_review());
        assert!(!rep.can_review());
    }

    #[test]
    fn test_session_user_context() {
        let session = SessionUser::new(42, SalesRole::SalesManager);
        assert_eq!(session.user_id(), 42);
        assert!(session.is_sales_manager());
    }
}
