use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_types::{Session, SessionOrder, SessionQuery};
use crate::error::RepoError;
use crate::web::pagination::PageSource;

/// Data access for [`Session`] records.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Every session owned by `user_id`, most recently updated first.
    fn query_all_for_user(&self, user_id: i64) -> SessionQuery {
        SessionQuery {
            user_id,
            order: SessionOrder::UpdatedAtDesc,
        }
    }

    async fn count(&self, query: &SessionQuery) -> Result<i64, RepoError>;

    async fn fetch(
        &self,
        query: &SessionQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, RepoError>;

    /// Resolves `id` only when it belongs to `user_id`.
    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Option<Session>, RepoError>;

    /// Inserts when `session.id` is empty, otherwise updates guarded by `session.version`.
    ///
    /// On success the id, version and timestamps on `session` reflect the stored row.
    async fn save(&self, session: &mut Session) -> Result<(), RepoError>;

    async fn delete(&self, session: &Session) -> Result<(), RepoError>;

    /// Ids of all sessions owned by `user_id`.
    async fn session_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>, RepoError>;
}

#[async_trait]
impl<'a> PageSource for dyn SessionRepository + 'a {
    type Item = Session;
    type Query = SessionQuery;

    async fn count(&self, query: &SessionQuery) -> Result<i64, RepoError> {
        SessionRepository::count(self, query).await
    }

    async fn fetch(
        &self,
        query: &SessionQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, RepoError> {
        SessionRepository::fetch(self, query, limit, offset).await
    }
}

#[derive(Clone)]
pub struct PgSessionRepository {
    db: PgPool,
}

impl PgSessionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn order_by(order: SessionOrder) -> &'static str {
    match order {
        SessionOrder::UpdatedAtDesc => "ORDER BY updated_at DESC, id DESC",
    }
}

#[derive(sqlx::FromRow)]
struct Stamp {
    id: i64,
    version: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn count(&self, query: &SessionQuery) -> Result<i64, RepoError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE user_id = $1")
            .bind(query.user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }

    async fn fetch(
        &self,
        query: &SessionQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, RepoError> {
        let sql = format!(
            r#"
            SELECT id, user_id, title, description, version, created_at, updated_at
            FROM sessions
            WHERE user_id = $1
            {}
            LIMIT $2 OFFSET $3
            "#,
            order_by(query.order)
        );
        let rows = sqlx::query_as::<_, Session>(&sql)
            .bind(query.user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Option<Session>, RepoError> {
        let row = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, title, description, version, created_at, updated_at
            FROM sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn save(&self, session: &mut Session) -> Result<(), RepoError> {
        let mut tx = self.db.begin().await?;

        let stamp = match session.id {
            None => Some(
                sqlx::query_as::<_, Stamp>(
                    r#"
                    INSERT INTO sessions (user_id, title, description)
                    VALUES ($1, $2, $3)
                    RETURNING id, version, created_at, updated_at
                    "#,
                )
                .bind(session.user_id)
                .bind(&session.title)
                .bind(&session.description)
                .fetch_one(&mut *tx)
                .await?,
            ),
            Some(id) => {
                sqlx::query_as::<_, Stamp>(
                    r#"
                    UPDATE sessions
                       SET title = $3, description = $4,
                           version = version + 1, updated_at = now()
                     WHERE id = $1 AND version = $2
                    RETURNING id, version, created_at, updated_at
                    "#,
                )
                .bind(id)
                .bind(session.version)
                .bind(&session.title)
                .bind(&session.description)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(stamp) = stamp else {
            let (exists,): (bool,) =
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM sessions WHERE id = $1)")
                    .bind(session.id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Err(if exists {
                RepoError::Conflict
            } else {
                RepoError::NotFound
            });
        };

        tx.commit().await?;
        session.id = Some(stamp.id);
        session.version = stamp.version;
        session.created_at = stamp.created_at;
        session.updated_at = stamp.updated_at;
        Ok(())
    }

    async fn delete(&self, session: &Session) -> Result<(), RepoError> {
        let id = session.id.ok_or(RepoError::NotFound)?;
        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepoError::NotFound);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn session_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>, RepoError> {
        let ids: Vec<(i64,)> =
            sqlx::query_as("SELECT id FROM sessions WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.db)
                .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
