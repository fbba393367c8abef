// src/models/auth.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::permissions::{
    is_allowed, AccessLevel, Action, PermissionMap, Resource, Role,
};

// A user as stored in the database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,
    pub access_level: Option<AccessLevel>,
    pub permissions: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated principal, snapshotted into the session at login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub access_level: Option<AccessLevel>,
    #[schema(value_type = Object)]
    pub permissions: PermissionMap,
}

impl Principal {
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        is_allowed(self.role, self.access_level, &self.permissions, resource, action)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        let permissions = PermissionMap::from_stored(user.permissions.as_ref());
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            access_level: user.access_level,
            permissions,
        }
    }
}

// Public listing of users (onboarding screens)
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Please provide a valid email."))]
    #[schema(example = "admin@flourcrm.com")]
    #[serde(default)]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Principal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Principal>,
}

/// Role and permission changes for an existing user. Custom permissions
/// arrive as flat `<resource>_<action>` flags next to the other fields.
#[derive(Debug, Deserialize)]
pub struct UpdateAccessPayload {
    pub role: Role,
    pub access_level: Option<AccessLevel>,
    #[serde(flatten)]
    pub flags: HashMap<String, Value>,
}

impl UpdateAccessPayload {
    /// Only `custom` principals carry a stored map.
    pub fn permissions(&self) -> Option<PermissionMap> {
        match self.access_level {
            Some(AccessLevel::Custom) => Some(PermissionMap::from_flags(&self.flags)),
            _ => None,
        }
    }
}
