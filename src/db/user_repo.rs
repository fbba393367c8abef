// src/db/user_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{violation, Violation},
        error::AppError,
    },
    models::{
        auth::{User, UserSummary},
        permissions::{AccessLevel, Role},
    },
};

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, role, access_level, permissions, created_at, updated_at
"#;

/// Fields of a user row about to be inserted.
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub access_level: Option<AccessLevel>,
    pub permissions: Option<Value>,
}

// All access to the `users` table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists<'e, E>(&self, executor: E, email: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    // Duplicate e-mails surface as EmailAlreadyExists via the unique constraint
    pub async fn create_user<'e, E>(&self, executor: E, new_user: NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, access_level, permissions)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role)
        .bind(new_user.access_level)
        .bind(new_user.permissions)
        .fetch_one(executor)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::Unique("users_email_key")) => AppError::EmailAlreadyExists,
            _ => e.into(),
        })
    }

    pub async fn list_summaries(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, role FROM users ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Returns false when no user has this id.
    pub async fn update_access(
        &self,
        id: i32,
        role: Role,
        access_level: Option<AccessLevel>,
        permissions: Option<Value>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2, access_level = $3, permissions = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(access_level)
        .bind(permissions)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
