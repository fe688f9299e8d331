//! Core traits shared by the domain model and the workflow services.

use chrono::{DateTime, Utc};

/// Primary key type used by the backend
pub type Id = i64;

/// Trait for entities that have a backend identity
pub trait Identifiable {
    fn id(&self) -> Option<Id>;
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for entities with created/updated timestamps
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for entities that track who created them
pub trait Auditable {
    fn created_by_id(&self) -> Option<Id>;
}

/// Authenticated-session identity, injected once per edit session.
///
/// The workflow compares this against a record's creator and reviewer ids;
/// it never re-reads a persisted token mid-session.
pub trait UserContext: Send + Sync {
    fn user_id(&self) -> Id;
    /// Sales managers are the only valid internal reviewers.
    fn is_sales_manager(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record {
        id: Option<Id>,
    }

    impl Identifiable for Record {
        fn id(&self) -> Option<Id> {
            self.id
        }
    }

    #[test]
    fn test_persisted_flags() {
        assert!(Record { id: Some(7) }.is_persisted());
        assert!(Record { id: None }.is_new_record());
    }
}
