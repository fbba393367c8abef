// src/services/agent_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, AgentRepository, UserRepository},
    models::{
        agent::{AgentType, CreateAgentPayload, OnboardPayload, OnboardResponse, SalesAgent, UpdateAgentPayload},
        permissions::Role,
    },
    services::auth::hash_password,
};

/// Used when onboarding without a password; the agent is expected to change it.
pub const TEMPORARY_PASSWORD: &str = "changeme123";

#[derive(Clone)]
pub struct AgentService {
    pool: PgPool,
    user_repo: UserRepository,
    agent_repo: AgentRepository,
}

impl AgentService {
    pub fn new(pool: PgPool, user_repo: UserRepository, agent_repo: AgentRepository) -> Self {
        Self { pool, user_repo, agent_repo }
    }

    pub async fn list(&self, agent_type: Option<AgentType>) -> Result<Vec<SalesAgent>, AppError> {
        // "Both" means no filter
        let filter = agent_type.filter(|t| *t != AgentType::Both);
        self.agent_repo.list_active(filter).await
    }

    pub async fn link_user(&self, payload: &CreateAgentPayload) -> Result<SalesAgent, AppError> {
        let id = self
            .agent_repo
            .create(&self.pool, payload.user_id, payload.agent_type, payload.commission_rate)
            .await?;

        self.agent_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Sales agent"))
    }

    pub async fn update(&self, id: i32, payload: &UpdateAgentPayload) -> Result<SalesAgent, AppError> {
        if !self.agent_repo.update(id, payload).await? {
            return Err(AppError::NotFound("Sales agent"));
        }

        self.agent_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Sales agent"))
    }

    /// Creates the user and its agent row together. Any failure rolls back
    /// both inserts.
    pub async fn onboard(&self, payload: &OnboardPayload) -> Result<OnboardResponse, AppError> {
        // 1. Password (hashing stays outside the transaction)
        let temporary_password = payload.password.is_none();
        let password = payload.password.clone().unwrap_or_else(|| TEMPORARY_PASSWORD.to_string());
        let password_hash = hash_password(password).await?;

        let permissions = payload.permissions().map(|map| map.to_value());

        // --- TRANSACTION ---
        let mut tx = self.pool.begin().await?;

        // 2. Duplicate e-mail
        if self.user_repo.email_exists(&mut *tx, &payload.email).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        // 3. User
        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                NewUser {
                    name: &payload.name,
                    email: &payload.email,
                    password_hash: &password_hash,
                    role: Role::Agent,
                    access_level: payload.access_level,
                    permissions,
                },
            )
            .await?;

        // 4. Agent row referencing it
        let agent_id = self
            .agent_repo
            .create(&mut *tx, user.id, payload.agent_type, payload.commission_rate)
            .await?;

        let agent = self
            .agent_repo
            .find_by_id(&mut *tx, agent_id)
            .await?
            .ok_or(AppError::NotFound("Sales agent"))?;

        tx.commit().await?;
        // --- END TRANSACTION ---

        tracing::info!(user_id = user.id, agent_id, "sales agent onboarded");

        Ok(OnboardResponse {
            user_id: user.id,
            agent,
            temporary_password,
        })
    }
}
