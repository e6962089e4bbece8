//! Expanded per-module access trees.
//!
//! These structures are for display only. Decisions are taken from role
//! permissions by [`Engine`](crate::Engine), never from an expanded tree.

use crate::module::{PermissionAction, SystemModule};
use crate::permission::Permission;
use crate::topology::Topology;
use crate::types::{ProfileId, TabId};

/// Coarse capability quintuple stamped onto tabs and profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    pub can_access: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_approve: bool,
    pub can_export: bool,
}

impl Capabilities {
    /// Every capability granted.
    pub const ALL: Capabilities = Capabilities {
        can_access: true,
        can_edit: true,
        can_delete: true,
        can_approve: true,
        can_export: true,
    };

    /// No capability granted.
    pub const NONE: Capabilities = Capabilities {
        can_access: false,
        can_edit: false,
        can_delete: false,
        can_approve: false,
        can_export: false,
    };

    /// Returns a copy with `action` granted.
    pub fn with(mut self, action: PermissionAction) -> Self {
        match action {
            PermissionAction::Read => self.can_access = true,
            PermissionAction::Write => self.can_edit = true,
            PermissionAction::Delete => self.can_delete = true,
            PermissionAction::Approve => self.can_approve = true,
            PermissionAction::Export => self.can_export = true,
        }
        self
    }

    /// Returns whether `action` is granted.
    pub fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::Read => self.can_access,
            PermissionAction::Write => self.can_edit,
            PermissionAction::Delete => self.can_delete,
            PermissionAction::Approve => self.can_approve,
            PermissionAction::Export => self.can_export,
        }
    }
}

/// Fully expanded capabilities for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabAccess {
    pub tab_id: TabId,
    pub tab_name: String,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_approve: bool,
    pub can_export: bool,
}

impl TabAccess {
    fn stamped(tab_id: &str, tab_name: &str, caps: Capabilities) -> Self {
        Self {
            tab_id: TabId::from_string(tab_id.to_string()),
            tab_name: tab_name.to_string(),
            can_view: caps.can_access,
            can_edit: caps.can_edit,
            can_delete: caps.can_delete,
            can_approve: caps.can_approve,
            can_export: caps.can_export,
        }
    }

    fn grant(&mut self, action: PermissionAction) {
        match action {
            PermissionAction::Read => self.can_view = true,
            PermissionAction::Write => self.can_edit = true,
            PermissionAction::Delete => self.can_delete = true,
            PermissionAction::Approve => self.can_approve = true,
            PermissionAction::Export => self.can_export = true,
        }
    }
}

/// Fully expanded capabilities for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileAccess {
    pub profile_id: ProfileId,
    pub profile_name: String,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_assign: bool,
}

impl ProfileAccess {
    fn stamped(profile_id: &str, profile_name: &str, caps: Capabilities) -> Self {
        Self {
            profile_id: ProfileId::from_string(profile_id.to_string()),
            profile_name: profile_name.to_string(),
            can_view: caps.can_access,
            can_edit: caps.can_edit,
            can_assign: caps.can_approve,
        }
    }
}

/// Expanded access tree for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleAccess {
    pub module_id: SystemModule,
    pub module_name: String,
    pub can_access: bool,
    pub tabs: Vec<TabAccess>,
    pub profiles: Vec<ProfileAccess>,
}

impl Topology {
    /// Expands a coarse capability quintuple into the module's access tree.
    ///
    /// Every declared tab and profile receives the same capabilities. A module
    /// without declared topology yields empty `tabs` and `profiles`.
    pub fn expand(&self, module: SystemModule, caps: Capabilities) -> ModuleAccess {
        let (tabs, profiles) = match self.get(module) {
            Some(entry) => (
                entry
                    .tabs
                    .iter()
                    .map(|(id, name)| TabAccess::stamped(id, name, caps))
                    .collect(),
                entry
                    .profiles
                    .iter()
                    .map(|(id, name)| ProfileAccess::stamped(id, name, caps))
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        ModuleAccess {
            module_id: module,
            module_name: module.display_name().to_string(),
            can_access: caps.can_access,
            tabs,
            profiles,
        }
    }
}

/// Derives the expanded trees for every module touched by `permissions`.
///
/// Module-wide grants are stamped on every tab and profile; tab-scoped
/// grants are added to their tab only. A module is accessible when any read
/// grant exists for it.
pub fn derive_modules(permissions: &[Permission], topology: &Topology) -> Vec<ModuleAccess> {
    SystemModule::all()
        .iter()
        .filter_map(|module| derive_module(*module, permissions, topology))
        .collect()
}

pub(crate) fn derive_module(
    module: SystemModule,
    permissions: &[Permission],
    topology: &Topology,
) -> Option<ModuleAccess> {
    let mut scoped = permissions.iter().filter(|p| p.module() == module).peekable();
    scoped.peek()?;

    let mut module_caps = Capabilities::NONE;
    let mut tab_grants = Vec::new();
    let mut any_read = false;
    for permission in scoped {
        any_read |= permission.action() == PermissionAction::Read;
        match permission.tab() {
            None => module_caps = module_caps.with(permission.action()),
            Some(tab) => tab_grants.push((tab, permission.action())),
        }
    }

    let mut access = topology.expand(module, module_caps);
    access.can_access = any_read;
    for (tab, action) in tab_grants {
        if let Some(entry) = access.tabs.iter_mut().find(|entry| &entry.tab_id == tab) {
            entry.grant(action);
        }
    }
    Some(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::ModuleTopology;

    fn perm(value: &str) -> Permission {
        Permission::try_from(value).unwrap()
    }

    #[test]
    fn expand_should_stamp_every_tab_and_profile() {
        let caps = Capabilities::NONE
            .with(PermissionAction::Read)
            .with(PermissionAction::Approve);
        let access = Topology::FACULTY.expand(SystemModule::Hr, caps);

        assert_eq!(access.module_id, SystemModule::Hr);
        assert!(access.can_access);
        assert_eq!(access.tabs.len(), 5);
        assert!(access.tabs.iter().all(|tab| tab.can_view && tab.can_approve && !tab.can_edit));
        assert_eq!(access.profiles.len(), 4);
        assert!(access.profiles.iter().all(|p| p.can_view && p.can_assign && !p.can_edit));
    }

    #[test]
    fn expand_should_be_idempotent() {
        let first = Topology::FACULTY.expand(SystemModule::Admin, Capabilities::ALL);
        let second = Topology::FACULTY.expand(SystemModule::Admin, Capabilities::ALL);
        assert_eq!(first, second);
    }

    #[test]
    fn expand_should_return_empty_tree_without_topology() {
        let access = Topology::empty().expand(SystemModule::Planning, Capabilities::ALL);
        assert!(access.can_access);
        assert!(access.tabs.is_empty());
        assert!(access.profiles.is_empty());
    }

    #[test]
    fn derive_should_merge_tab_grants_over_module_grants() {
        let permissions = vec![
            perm("teacher:read"),
            perm("teacher:write:profile"),
            perm("timetable:read:weekly"),
        ];
        let modules = derive_modules(&permissions, &Topology::FACULTY);
        assert_eq!(modules.len(), 2);

        let teacher = &modules[0];
        assert_eq!(teacher.module_id, SystemModule::Teacher);
        assert!(teacher.tabs.iter().all(|tab| tab.can_view));
        let editable: Vec<&str> = teacher
            .tabs
            .iter()
            .filter(|tab| tab.can_edit)
            .map(|tab| tab.tab_id.as_str())
            .collect();
        assert_eq!(editable, vec!["profile"]);

        let timetable = &modules[1];
        assert!(timetable.can_access);
        let viewable: Vec<&str> = timetable
            .tabs
            .iter()
            .filter(|tab| tab.can_view)
            .map(|tab| tab.tab_id.as_str())
            .collect();
        assert_eq!(viewable, vec!["weekly"]);
    }

    #[test]
    fn derive_should_mark_write_only_module_inaccessible() {
        let modules = derive_modules(&[perm("planning:write")], &Topology::FACULTY);
        assert_eq!(modules.len(), 1);
        assert!(!modules[0].can_access);
    }

    #[test]
    fn derive_should_use_custom_topology() {
        const TABLE: &[ModuleTopology] = &[ModuleTopology {
            module: SystemModule::Planning,
            tabs: &[("only", "Only tab")],
            profiles: &[],
        }];
        let modules = derive_modules(&[perm("planning:read")], &Topology::new(TABLE));
        assert_eq!(modules[0].tabs.len(), 1);
        assert_eq!(modules[0].tabs[0].tab_name, "Only tab");
    }
}
