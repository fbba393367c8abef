// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    models::{
        auth::Principal,
        permissions::{Action, Resource, Role},
    },
};

/// A (resource, action) pair a route demands.
pub trait PermissionDef: Send + Sync + 'static {
    fn requirement() -> (Resource, Action);
}

/// A closed set of roles a route is restricted to.
pub trait RoleDef: Send + Sync + 'static {
    fn roles() -> &'static [Role];
}

fn principal(parts: &Parts) -> Result<&Principal, AppError> {
    parts.extensions.get::<Principal>().ok_or(AppError::Unauthenticated)
}

/// Extractor that rejects with 403 unless the principal may perform `T`.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = principal(parts)?;
        let (resource, action) = T::requirement();

        if !user.can(resource, action) {
            tracing::warn!(
                user_id = user.id,
                resource = resource.as_str(),
                action = action.as_str(),
                "permission denied"
            );
            return Err(AppError::Forbidden);
        }

        Ok(RequirePermission(PhantomData))
    }
}

/// Extractor that rejects with 403 unless the principal holds one of `T`'s roles.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = principal(parts)?;

        if !user.has_role(T::roles()) {
            tracing::warn!(user_id = user.id, role = ?user.role, "role not permitted");
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

macro_rules! permission {
    ($($name:ident => ($resource:ident, $action:ident);)+) => {
        $(
            pub struct $name;
            impl PermissionDef for $name {
                fn requirement() -> (Resource, Action) {
                    (Resource::$resource, Action::$action)
                }
            }
        )+
    };
}

// ---
// Route requirements
// ---

permission! {
    PermDashboardView => (Dashboard, View);

    PermCustomersView => (Customers, View);
    PermCustomersAdd => (Customers, Add);
    PermCustomersEdit => (Customers, Edit);
    PermCustomersDelete => (Customers, Delete);

    PermProductsView => (Products, View);
    PermProductsAdd => (Products, Add);
    PermProductsEdit => (Products, Edit);

    PermSalesView => (Sales, View);
    PermSalesAdd => (Sales, Add);
    PermSalesEdit => (Sales, Edit);
    PermSalesDelete => (Sales, Delete);

    PermReportsView => (Reports, View);

    PermAgentsView => (Agents, View);
    PermAgentsAdd => (Agents, Add);
    PermAgentsEdit => (Agents, Edit);
}

/// Admins and accountants: payment status and report exports.
pub struct FinanceRoles;
impl RoleDef for FinanceRoles {
    fn roles() -> &'static [Role] {
        &[Role::Admin, Role::Accountant]
    }
}

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn roles() -> &'static [Role] {
        &[Role::Admin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permissions::{AccessLevel, PermissionMap};
    use axum::http::Request;

    fn principal(role: Role, access_level: Option<AccessLevel>) -> Principal {
        Principal {
            id: 7,
            name: "Test".into(),
            email: "test@example.com".into(),
            role,
            access_level,
            permissions: PermissionMap::default(),
        }
    }

    fn parts_with(user: Option<Principal>) -> Parts {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        if let Some(user) = user {
            parts.extensions.insert(user);
        }
        parts
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthenticated() {
        let mut parts = parts_with(None);
        let result = RequirePermission::<PermSalesView>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_agent_default_can_add_sales_but_not_delete() {
        let user = principal(Role::Agent, None);

        let mut parts = parts_with(Some(user.clone()));
        assert!(RequirePermission::<PermSalesAdd>::from_request_parts(&mut parts, &()).await.is_ok());

        let mut parts = parts_with(Some(user));
        let result = RequirePermission::<PermSalesDelete>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_view_level_agent_cannot_edit_customers() {
        let mut parts = parts_with(Some(principal(Role::Agent, Some(AccessLevel::View))));
        let result = RequirePermission::<PermCustomersEdit>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_finance_roles() {
        let mut parts = parts_with(Some(principal(Role::Accountant, None)));
        assert!(RequireRole::<FinanceRoles>::from_request_parts(&mut parts, &()).await.is_ok());

        let mut parts = parts_with(Some(principal(Role::Agent, Some(AccessLevel::Full))));
        let result = RequireRole::<FinanceRoles>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_admin_only_rejects_accountant() {
        let mut parts = parts_with(Some(principal(Role::Accountant, None)));
        let result = RequireRole::<AdminOnly>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
