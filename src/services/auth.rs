// src/services/auth.rs

use bcrypt::{hash, verify};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, UserRepository},
    models::{
        auth::{Principal, UpdateAccessPayload, UserSummary},
        permissions::Role,
    },
};

/// bcrypt is CPU-bound; keep it off the async workers.
pub(crate) async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("password hashing task failed: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, pool: PgPool) -> Self {
        Self { user_repo, pool }
    }

    /// Unknown e-mail and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();

        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "user logged in");
        Ok(Principal::from(user))
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        self.user_repo.list_summaries().await
    }

    pub async fn update_access(&self, user_id: i32, payload: &UpdateAccessPayload) -> Result<(), AppError> {
        let permissions = payload.permissions().map(|map| map.to_value());

        let updated = self
            .user_repo
            .update_access(user_id, payload.role, payload.access_level, permissions)
            .await?;

        if !updated {
            return Err(AppError::NotFound("User"));
        }

        tracing::info!(user_id, role = ?payload.role, access_level = ?payload.access_level, "user access updated");
        Ok(())
    }

    /// Creates the configured admin account unless that e-mail is taken.
    /// Returns whether a user was created.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        if self.user_repo.email_exists(&self.pool, email).await? {
            return Ok(false);
        }

        let password_hash = hash_password(password.to_owned()).await?;

        let result = self
            .user_repo
            .create_user(
                &self.pool,
                NewUser {
                    name: "Admin User",
                    email,
                    password_hash: &password_hash,
                    role: Role::Admin,
                    access_level: None,
                    permissions: None,
                },
            )
            .await;

        match result {
            Ok(user) => {
                tracing::info!(user_id = user.id, "admin account bootstrapped");
                Ok(true)
            }
            // Lost a race with another instance
            Err(AppError::EmailAlreadyExists) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
