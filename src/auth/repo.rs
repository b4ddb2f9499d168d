use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User};
use crate::error::RepoError;

/// Data access for [`User`] records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    /// Fails with `UniqueViolation("email")` when the address is taken.
    async fn create(&self, new: &NewUser) -> Result<User, RepoError>;

    /// Changes the profile fields and restamps `updated_at`.
    async fn update_profile(
        &self,
        id: i64,
        email: &str,
        first_name: &str,
    ) -> Result<User, RepoError>;

    /// Ids of the questions authored by `user_id`.
    async fn question_ids_for_author(&self, user_id: i64) -> Result<Vec<i64>, RepoError>;
}

const USER_COLUMNS: &str = "id, email, password_hash, roles, first_name, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new: &NewUser) -> Result<User, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, roles, first_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.roles)
        .bind(&new.first_name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| RepoError::from_write(e, "email"))?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i64,
        email: &str,
        first_name: &str,
    ) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email = $2, first_name = $3, updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .bind(first_name)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| RepoError::from_write(e, "email"))?
        .ok_or(RepoError::NotFound)
    }

    async fn question_ids_for_author(&self, user_id: i64) -> Result<Vec<i64>, RepoError> {
        let ids: Vec<(i64,)> =
            sqlx::query_as("SELECT id FROM questions WHERE author_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.db)
                .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
