use std::collections::BTreeSet;
use std::fmt;

/// Every grantable capability known to this deployment.
///
/// The catalog is fixed: the seeder writes one `permissions` row per variant
/// and endpoints name exactly one variant as their requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    UsersView,
    UsersEdit,
    UsersDelete,
    UsersCreate,
    RolesView,
    /// Create, edit, and delete roles
    RolesManage,
    PermissionsView,
    DashboardAccess,
    SettingsAccess,
}

impl Permission {
    pub const ALL: [Permission; 9] = [
        Permission::UsersView,
        Permission::UsersEdit,
        Permission::UsersDelete,
        Permission::UsersCreate,
        Permission::RolesView,
        Permission::RolesManage,
        Permission::PermissionsView,
        Permission::DashboardAccess,
        Permission::SettingsAccess,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Permission::UsersView => "users.view",
            Permission::UsersEdit => "users.edit",
            Permission::UsersDelete => "users.delete",
            Permission::UsersCreate => "users.create",
            Permission::RolesView => "roles.view",
            Permission::RolesManage => "roles.manage",
            Permission::PermissionsView => "permissions.view",
            Permission::DashboardAccess => "dashboard.access",
            Permission::SettingsAccess => "settings.access",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Permission::UsersView => "View users list and details",
            Permission::UsersEdit => "Edit user information",
            Permission::UsersDelete => "Delete users",
            Permission::UsersCreate => "Create new users",
            Permission::RolesView => "View roles list and details",
            Permission::RolesManage => "Create, edit, and delete roles",
            Permission::PermissionsView => "View available permissions",
            Permission::DashboardAccess => "Access dashboard",
            Permission::SettingsAccess => "Access settings",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Deduplicated, ordered set of permission keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(permission.key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
