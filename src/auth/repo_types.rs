use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

pub const ROLE_USER: &str = "ROLE_USER";
#[cfg(test)]
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, never exposed
    #[serde(skip_serializing)]
    roles: Vec<String>, // as stored; read through `roles()`
    pub first_name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    #[cfg(test)]
    pub fn new(
        id: i64,
        email: String,
        password_hash: String,
        roles: Vec<String>,
        first_name: String,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id,
            email,
            password_hash,
            roles,
            first_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored roles plus `ROLE_USER`, without duplicates, in first-seen order.
    pub fn roles(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.roles.len() + 1);
        for role in self.roles.iter().map(String::as_str).chain([ROLE_USER]) {
            if !out.iter().any(|r| r == role) {
                out.push(role.to_string());
            }
        }
        out
    }

    /// Identifier used for login.
    pub fn username(&self) -> &str {
        &self.email
    }
}

/// Values needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub first_name: String,
}
