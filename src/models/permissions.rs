// src/models/permissions.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
//  ROLES & ACCESS LEVELS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    Accountant,
}

/// Coarse permission tier, independent of the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    View,
    Edit,
    Full,
    Custom,
}

// =============================================================================
//  RESOURCES & ACTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Dashboard,
    Sales,
    Customers,
    Products,
    Reports,
    Agents,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Dashboard,
        Resource::Sales,
        Resource::Customers,
        Resource::Products,
        Resource::Reports,
        Resource::Agents,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Sales => "sales",
            Resource::Customers => "customers",
            Resource::Products => "products",
            Resource::Reports => "reports",
            Resource::Agents => "agents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Add,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Add, Action::Edit, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

// =============================================================================
//  CUSTOM PERMISSION MAP
// =============================================================================

/// The four action switches of one resource. Missing switches are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ActionFlags {
    pub view: bool,
    pub add: bool,
    pub edit: bool,
    pub delete: bool,
}

impl ActionFlags {
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Add => self.add,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    fn set(&mut self, action: Action, value: bool) {
        match action {
            Action::View => self.view = value,
            Action::Add => self.add = value,
            Action::Edit => self.edit = value,
            Action::Delete => self.delete = value,
        }
    }
}

/// resource -> action -> allowed. An absent resource denies every action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<Resource, ActionFlags>);

impl PermissionMap {
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.0.get(&resource).is_some_and(|flags| flags.allows(action))
    }

    pub fn get(&self, resource: Resource) -> Option<&ActionFlags> {
        self.0.get(&resource)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the stored JSON. Anything that does not match the typed shape
    /// (including a JSON string holding bad JSON) yields an empty map, which
    /// denies everything.
    pub fn from_stored(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };

        let parsed = match value {
            Value::Null => return Self::default(),
            Value::String(raw) => serde_json::from_str::<PermissionMap>(raw),
            other => serde_json::from_value::<PermissionMap>(other.clone()),
        };

        match parsed {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(error = %e, "malformed permissions payload, denying all");
                Self::default()
            }
        }
    }

    /// Builds the full resource x action grid from `<resource>_<action>`
    /// flags. Only flags explicitly set to true are granted.
    pub fn from_flags(flags: &HashMap<String, Value>) -> Self {
        let mut grid = BTreeMap::new();

        for resource in Resource::ALL {
            let mut actions = ActionFlags::default();
            for action in Action::ALL {
                let key = format!("{}_{}", resource.as_str(), action.as_str());
                actions.set(action, flags.get(&key).is_some_and(flag_is_true));
            }
            grid.insert(resource, actions);
        }

        Self(grid)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn flag_is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "on",
        _ => false,
    }
}

// =============================================================================
//  DECISION
// =============================================================================

impl AccessLevel {
    pub fn allows(self, permissions: &PermissionMap, resource: Resource, action: Action) -> bool {
        match self {
            AccessLevel::Full => true,
            AccessLevel::View => action == Action::View,
            AccessLevel::Edit => matches!(action, Action::View | Action::Edit | Action::Add),
            AccessLevel::Custom => permissions.allows(resource, action),
        }
    }
}

/// Pure allow/deny decision for one (resource, action) request.
pub fn is_allowed(
    role: Role,
    access_level: Option<AccessLevel>,
    permissions: &PermissionMap,
    resource: Resource,
    action: Action,
) -> bool {
    match role {
        Role::Admin => true,
        Role::Accountant => action == Action::View,
        Role::Agent => match access_level {
            Some(level) => level.allows(permissions, resource, action),
            None => agent_default(resource, action),
        },
    }
}

fn agent_default(resource: Resource, action: Action) -> bool {
    match (resource, action) {
        (Resource::Agents, _) => false,
        (_, Action::View) => true,
        (Resource::Sales, Action::Add | Action::Edit) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_admin_allows_everything() {
        let empty = PermissionMap::default();
        for resource in Resource::ALL {
            for action in Action::ALL {
                assert!(is_allowed(Role::Admin, None, &empty, resource, action));
            }
        }
    }

    #[test]
    fn test_accountant_reads_only() {
        let empty = PermissionMap::default();
        assert!(is_allowed(Role::Accountant, None, &empty, Resource::Reports, Action::View));
        assert!(is_allowed(Role::Accountant, None, &empty, Resource::Sales, Action::View));
        assert!(!is_allowed(Role::Accountant, None, &empty, Resource::Sales, Action::Delete));
        assert!(!is_allowed(Role::Accountant, None, &empty, Resource::Customers, Action::Add));
    }

    #[test]
    fn test_access_levels() {
        let empty = PermissionMap::default();
        let agent = |level, resource, action| is_allowed(Role::Agent, Some(level), &empty, resource, action);

        assert!(agent(AccessLevel::Full, Resource::Agents, Action::Delete));

        assert!(agent(AccessLevel::View, Resource::Sales, Action::View));
        assert!(!agent(AccessLevel::View, Resource::Sales, Action::Add));

        assert!(agent(AccessLevel::Edit, Resource::Customers, Action::View));
        assert!(agent(AccessLevel::Edit, Resource::Customers, Action::Add));
        assert!(agent(AccessLevel::Edit, Resource::Customers, Action::Edit));
        assert!(!agent(AccessLevel::Edit, Resource::Customers, Action::Delete));
    }

    #[test]
    fn test_agent_without_level_uses_defaults() {
        let empty = PermissionMap::default();
        assert!(is_allowed(Role::Agent, None, &empty, Resource::Sales, Action::Add));
        assert!(is_allowed(Role::Agent, None, &empty, Resource::Products, Action::View));
        assert!(!is_allowed(Role::Agent, None, &empty, Resource::Customers, Action::Delete));
        assert!(!is_allowed(Role::Agent, None, &empty, Resource::Agents, Action::View));
    }

    #[test]
    fn test_custom_denies_missing_entries() {
        let stored = json!({ "sales": { "view": true } });
        let map = PermissionMap::from_stored(Some(&stored));
        let custom = |resource, action| is_allowed(Role::Agent, Some(AccessLevel::Custom), &map, resource, action);

        assert!(custom(Resource::Sales, Action::View));
        assert!(!custom(Resource::Sales, Action::Add));
        assert!(!custom(Resource::Customers, Action::View));
        assert!(!custom(Resource::Dashboard, Action::View));
    }

    #[test]
    fn test_malformed_payload_denies_all() {
        let cases = [
            json!("{not json"),
            json!({ "sales": { "view": "yes" } }),
            json!({ "warehouse": { "view": true } }),
            json!({ "sales": { "approve": true } }),
            json!([1, 2, 3]),
        ];

        for stored in cases {
            let map = PermissionMap::from_stored(Some(&stored));
            assert!(map.is_empty(), "expected deny-all for {stored}");
            assert!(!is_allowed(Role::Agent, Some(AccessLevel::Custom), &map, Resource::Sales, Action::View));
        }
    }

    #[test]
    fn test_stored_as_json_string() {
        let stored = Value::String(r#"{"reports":{"view":true}}"#.to_string());
        let map = PermissionMap::from_stored(Some(&stored));
        assert!(map.allows(Resource::Reports, Action::View));
        assert!(!map.allows(Resource::Reports, Action::Edit));
    }

    #[test]
    fn test_from_flags_builds_full_grid() {
        let map = PermissionMap::from_flags(&flags(json!({ "sales_view": true, "sales_add": true })));

        assert_eq!(
            map.get(Resource::Sales),
            Some(&ActionFlags { view: true, add: true, edit: false, delete: false })
        );
        assert_eq!(map.get(Resource::Customers), Some(&ActionFlags::default()));
        for resource in Resource::ALL {
            assert!(map.get(resource).is_some());
        }
    }

    #[test]
    fn test_from_flags_only_true_counts() {
        let map = PermissionMap::from_flags(&flags(json!({
            "products_edit": false,
            "products_view": "on",
            "reports_view": 1,
            "unknown_flag": true
        })));

        assert!(map.allows(Resource::Products, Action::View));
        assert!(!map.allows(Resource::Products, Action::Edit));
        assert!(!map.allows(Resource::Reports, Action::View));
    }

    #[test]
    fn test_grid_serializes_nested() {
        let map = PermissionMap::from_flags(&flags(json!({ "agents_delete": true })));
        let value = map.to_value();
        assert_eq!(value["agents"]["delete"], json!(true));
        assert_eq!(value["dashboard"]["view"], json!(false));
        assert_eq!(PermissionMap::from_stored(Some(&value)), map);
    }
}
