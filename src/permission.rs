use crate::error::{Error, Result};
use crate::module::{PermissionAction, SystemModule};
use crate::types::TabId;
use std::fmt;

/// A single granted capability (`module:action` or `module:action:tab`).
///
/// A permission without a tab is a module-wide grant for its action.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Permission {
    module: SystemModule,
    action: PermissionAction,
    tab: Option<TabId>,
}

impl Permission {
    /// Parses and validates a permission.
    ///
    /// This trims whitespace and normalizes to lowercase.
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let normalized = value.as_ref().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(Error::InvalidPermission(
                "permission must not be empty".to_string(),
            ));
        }

        let mut segments = normalized.split(':');
        let (Some(module), Some(action)) = (segments.next(), segments.next()) else {
            return Err(Error::InvalidPermission(
                "permission must be in module:action[:tab] format".to_string(),
            ));
        };
        let tab = segments.next();
        if segments.next().is_some() {
            return Err(Error::InvalidPermission(
                "permission must have at most three segments".to_string(),
            ));
        }
        if module.is_empty() || action.is_empty() || tab.is_some_and(str::is_empty) {
            return Err(Error::InvalidPermission(
                "permission must not have empty segments".to_string(),
            ));
        }

        Ok(Self {
            module: module.parse()?,
            action: action.parse()?,
            tab: tab.map(TabId::new).transpose()?,
        })
    }

    /// Creates a module-wide permission.
    pub fn module_wide(module: SystemModule, action: PermissionAction) -> Self {
        Self {
            module,
            action,
            tab: None,
        }
    }

    /// Creates a permission scoped to one tab of a module.
    pub fn for_tab(module: SystemModule, action: PermissionAction, tab: TabId) -> Self {
        Self {
            module,
            action,
            tab: Some(tab),
        }
    }

    /// Returns the module this permission applies to.
    pub fn module(&self) -> SystemModule {
        self.module
    }

    /// Returns the granted action.
    pub fn action(&self) -> PermissionAction {
        self.action
    }

    /// Returns the tab scope, if any.
    pub fn tab(&self) -> Option<&TabId> {
        self.tab.as_ref()
    }

    /// Returns whether this grant covers a request.
    ///
    /// A module-wide grant covers every tab. A request without a tab is
    /// covered by any grant on the same module and action.
    pub fn matches(
        &self,
        module: SystemModule,
        action: PermissionAction,
        tab: Option<&TabId>,
    ) -> bool {
        if self.module != module || self.action != action {
            return false;
        }
        match (&self.tab, tab) {
            (None, _) | (_, None) => true,
            (Some(granted), Some(required)) => granted == required,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.action)?;
        if let Some(tab) = &self.tab {
            write!(f, ":{tab}")?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for Permission {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for Permission {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}
