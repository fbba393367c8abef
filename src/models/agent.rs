// src/models/agent.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::permissions::{AccessLevel, PermissionMap};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "agent_type")]
pub enum AgentType {
    B2B,
    B2C,
    Both,
}

// Agent row joined with its user
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct SalesAgent {
    pub id: i32,
    pub user_id: i32,
    pub agent_type: AgentType,
    pub commission_rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AgentQuery {
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub agent_type: Option<AgentType>,
}

fn validate_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("Commission rate must be between 0 and 100.".into());
        return Err(err);
    }
    Ok(())
}

// Links an existing user as an agent
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAgentPayload {
    #[validate(range(min = 1, message = "User is required."))]
    #[serde(default)]
    pub user_id: i32,

    pub agent_type: AgentType,

    #[validate(custom(function = "validate_rate"))]
    #[serde(default)]
    pub commission_rate: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAgentPayload {
    pub agent_type: Option<AgentType>,

    #[validate(custom(function = "validate_rate"))]
    pub commission_rate: Option<Decimal>,

    pub is_active: Option<bool>,
}

/// New user plus agent row in one go. `custom` access reads the flat
/// `<resource>_<action>` flags sent alongside.
#[derive(Debug, Deserialize, Validate)]
pub struct OnboardPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    #[serde(default)]
    pub name: String,

    #[validate(email(message = "Please provide a valid email."))]
    #[serde(default)]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: Option<String>,

    pub agent_type: AgentType,

    #[validate(custom(function = "validate_rate"))]
    #[serde(default)]
    pub commission_rate: Decimal,

    pub access_level: Option<AccessLevel>,

    #[serde(flatten)]
    pub flags: HashMap<String, Value>,
}

impl OnboardPayload {
    pub fn permissions(&self) -> Option<PermissionMap> {
        match self.access_level {
            Some(AccessLevel::Custom) => Some(PermissionMap::from_flags(&self.flags)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardResponse {
    pub user_id: i32,
    pub agent: SalesAgent,
    pub temporary_password: bool,
}
