// src/db/agent_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{violation, Violation},
        error::AppError,
    },
    models::agent::{AgentType, SalesAgent, UpdateAgentPayload},
};

const AGENT_SELECT: &str = r#"
    SELECT sa.id, sa.user_id, sa.agent_type, sa.commission_rate, sa.is_active, sa.created_at,
           u.name, u.email
    FROM sales_agents sa
    JOIN users u ON sa.user_id = u.id
"#;

#[derive(Clone)]
pub struct AgentRepository {
    pool: PgPool,
}

impl AgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active agents. A B2B or B2C filter also matches agents serving both.
    pub async fn list_active(&self, agent_type: Option<AgentType>) -> Result<Vec<SalesAgent>, AppError> {
        let agents = sqlx::query_as::<_, SalesAgent>(&format!(
            r#"
            {AGENT_SELECT}
            WHERE sa.is_active
              AND ($1::agent_type IS NULL OR sa.agent_type = $1 OR sa.agent_type = 'Both')
            ORDER BY u.name
            "#
        ))
        .bind(agent_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(agents)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<SalesAgent>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agent = sqlx::query_as::<_, SalesAgent>(&format!("{AGENT_SELECT} WHERE sa.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(agent)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: i32,
        agent_type: AgentType,
        commission_rate: Decimal,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO sales_agents (user_id, agent_type, commission_rate)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(agent_type)
        .bind(commission_rate)
        .fetch_one(executor)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::ForeignKey("sales_agents_user_id_fkey")) => AppError::NotFound("User"),
            Some(Violation::Unique("sales_agents_user_id_key")) => {
                AppError::Conflict("This user is already a sales agent.".to_string())
            }
            _ => e.into(),
        })
    }

    /// Absent fields keep their stored value. Returns false for an unknown id.
    pub async fn update(&self, id: i32, changes: &UpdateAgentPayload) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sales_agents
            SET agent_type = COALESCE($2, agent_type),
                commission_rate = COALESCE($3, commission_rate),
                is_active = COALESCE($4, is_active)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.agent_type)
        .bind(changes.commission_rate)
        .bind(changes.is_active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
