use crate::access::{ModuleAccess, derive_modules};
use crate::error::{Error, Result};
use crate::module::SystemModule;
use crate::permission::Permission;
use crate::topology::Topology;
use crate::types::RoleId;
use std::collections::HashSet;

/// Authored role: identity plus declared permissions.
///
/// The expanded module tree is never authored; it is derived when the
/// definition is materialized into a [`Role`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleDefinition {
    pub id: RoleId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Display rank. Never consulted by decisions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub permissions: Vec<Permission>,
}

impl RoleDefinition {
    /// Creates an empty definition.
    pub fn new(id: RoleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            level: 0,
            permissions: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the display level.
    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Adds a granted permission.
    pub fn grant(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Adds several granted permissions.
    pub fn grants(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }
}

/// Materialized catalog role.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Role {
    id: RoleId,
    name: String,
    description: String,
    level: u8,
    permissions: Vec<Permission>,
    modules: Vec<ModuleAccess>,
}

impl Role {
    /// Validates a definition against `topology` and derives its module tree.
    pub fn from_definition(definition: RoleDefinition, topology: &Topology) -> Result<Self> {
        for permission in &definition.permissions {
            if let Some(tab) = permission.tab()
                && !topology.has_tab(permission.module(), tab.as_str())
            {
                return Err(Error::UnknownTab {
                    module: permission.module(),
                    tab: tab.clone(),
                });
            }
        }

        let mut permissions = definition.permissions;
        let mut seen = HashSet::new();
        permissions.retain(|permission| seen.insert(permission.clone()));
        let modules = derive_modules(&permissions, topology);

        Ok(Self {
            id: definition.id,
            name: definition.name,
            description: definition.description,
            level: definition.level,
            permissions,
            modules,
        })
    }

    pub fn id(&self) -> &RoleId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Declared permissions, deduplicated in declaration order.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Expanded module trees derived from [`Role::permissions`].
    pub fn modules(&self) -> &[ModuleAccess] {
        &self.modules
    }

    /// Returns the expanded tree for one module, if the role touches it.
    pub fn module(&self, module: SystemModule) -> Option<&ModuleAccess> {
        self.modules.iter().find(|access| access.module_id == module)
    }
}
