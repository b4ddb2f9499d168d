use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// A user-owned session record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
    /// `None` until the first save.
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Bumped on every update; a write carrying an older value is refused.
    pub version: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Session {
    /// Fresh, unsaved session owned by `user_id`.
    pub fn new(user_id: i64) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: None,
            user_id,
            title: String::new(),
            description: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrder {
    /// Most recently updated first, ties broken by id.
    UpdatedAtDesc,
}

/// Description of a listing: whose sessions, in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub user_id: i64,
    pub order: SessionOrder,
}
