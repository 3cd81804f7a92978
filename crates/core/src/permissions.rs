//! Role/permission capability gate.
//!
//! An immutable [`PermissionsConfig`] maps role names to permission sets
//! (the `*` sentinel grants everything) and declares three ordered menu
//! tables. It is built once at startup and passed explicitly; nothing here
//! reads ambient global state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wildcard permission granting everything.
pub const WILDCARD: &str = "*";

/// One entry of a menu table. `required: None` means the item is available
/// to any authenticated identity regardless of role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub key: String,
    pub required: Option<String>,
}

impl MenuItem {
    fn new(key: &str, required: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            required: required.map(str::to_string),
        }
    }
}

/// Which menu table to filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuTable {
    Map,
    Sidebar,
    Admin,
}

/// Immutable role/permission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// Role name to granted permission strings (may contain `*`).
    pub roles: HashMap<String, Vec<String>>,
    /// Map action menu, in declared order.
    pub map_menu: Vec<MenuItem>,
    /// Sidebar menu, in declared order.
    pub sidebar_menu: Vec<MenuItem>,
    /// Admin dropdown menu, in declared order.
    pub admin_menu: Vec<MenuItem>,
}

impl PermissionsConfig {
    fn role_permissions(&self, role: &str) -> &[String] {
        self.roles.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True iff the role holds `permission` directly or via the wildcard.
    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        let granted = self.role_permissions(role);
        granted.iter().any(|p| p == WILDCARD || p == permission)
    }

    /// The effective permission set for a role. A wildcard expands to every
    /// permission referenced by the menu tables.
    pub fn permissions_for(&self, role: &str) -> Vec<String> {
        let granted = self.role_permissions(role);
        if granted.iter().any(|p| p == WILDCARD) {
            let mut all: Vec<String> = self
                .map_menu
                .iter()
                .chain(&self.sidebar_menu)
                .chain(&self.admin_menu)
                .filter_map(|item| item.required.clone())
                .collect();
            all.sort();
            all.dedup();
            return all;
        }
        granted.to_vec()
    }

    fn table(&self, table: MenuTable) -> &[MenuItem] {
        match table {
            MenuTable::Map => &self.map_menu,
            MenuTable::Sidebar => &self.sidebar_menu,
            MenuTable::Admin => &self.admin_menu,
        }
    }

    /// Menu keys the role may see, in the table's declared order. Items with
    /// no required permission are visible to any authenticated identity.
    pub fn allowed_menu_items(&self, role: &str, table: MenuTable) -> Vec<String> {
        self.table(table)
            .iter()
            .filter(|item| match &item.required {
                None => true,
                Some(required) => self.has_permission(role, required),
            })
            .map(|item| item.key.clone())
            .collect()
    }
}

impl Default for PermissionsConfig {
    /// The shipped role and menu tables.
    fn default() -> Self {
        let roles = HashMap::from([
            ("administrator".to_string(), vec![WILDCARD.to_string()]),
            (
                "operator".to_string(),
                [
                    "map.actions",
                    "map.layers",
                    "map.viewports",
                    "map.maps",
                    "map.options",
                    "sidebar.dashboard",
                    "sidebar.map",
                    "sidebar.alerts",
                    "sidebar.sensors",
                    "sidebar.cameras",
                    "sidebar.access",
                    "sidebar.reports",
                ]
                .map(String::from)
                .to_vec(),
            ),
            (
                "viewer".to_string(),
                [
                    "map.layers",
                    "map.viewports",
                    "map.maps",
                    "sidebar.dashboard",
                    "sidebar.map",
                    "sidebar.alerts",
                    "sidebar.cameras",
                    "sidebar.reports",
                ]
                .map(String::from)
                .to_vec(),
            ),
            (
                "reader".to_string(),
                [
                    "map.layers",
                    "map.viewports",
                    "map.maps",
                    "sidebar.dashboard",
                    "sidebar.map",
                ]
                .map(String::from)
                .to_vec(),
            ),
        ]);

        let map_menu = vec![
            MenuItem::new("actions", Some("map.actions")),
            MenuItem::new("edit", Some("map.edit")),
            MenuItem::new("options", Some("map.options")),
            MenuItem::new("tools", Some("map.tools")),
            MenuItem::new("layers", Some("map.layers")),
            MenuItem::new("viewports", Some("map.viewports")),
            MenuItem::new("maps", Some("map.maps")),
            MenuItem::new("import", Some("map.import")),
        ];

        let sidebar_menu = vec![
            MenuItem::new("dashboard", Some("sidebar.dashboard")),
            MenuItem::new("map", Some("sidebar.map")),
            MenuItem::new("alerts", Some("sidebar.alerts")),
            MenuItem::new("sensors", Some("sidebar.sensors")),
            MenuItem::new("cameras", Some("sidebar.cameras")),
            MenuItem::new("access", Some("sidebar.access")),
            MenuItem::new("reports", Some("sidebar.reports")),
            MenuItem::new("devices", Some("sidebar.devices")),
            MenuItem::new("logs", Some("sidebar.logs")),
            MenuItem::new("settings", Some("sidebar.settings")),
            MenuItem::new("settings-general", None),
            MenuItem::new("settings-security", None),
            MenuItem::new("settings-notifications", None),
            MenuItem::new("settings-users", Some("admin.users.manage")),
            MenuItem::new("settings-roles", Some("admin.roles.manage")),
        ];

        let admin_menu = vec![
            MenuItem::new("profile", None),
            MenuItem::new("settings", None),
            MenuItem::new("users", Some("admin.users.manage")),
            MenuItem::new("roles", Some("admin.roles.manage")),
            MenuItem::new("logout", None),
        ];

        Self {
            roles,
            map_menu,
            sidebar_menu,
            admin_menu,
        }
    }
}
