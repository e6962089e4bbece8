use crate::types::{PrincipalId, RoleId};
use std::collections::{BTreeMap, BTreeSet};

/// Authenticated actor being evaluated.
///
/// Identity comes from the identity provider; the engine trusts these fields
/// as given and never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Principal {
    id: PrincipalId,
    display_name: String,
    email: String,
    declared_role: RoleId,
    #[cfg_attr(feature = "serde", serde(default))]
    additional_roles: BTreeSet<RoleId>,
    #[cfg_attr(feature = "serde", serde(default))]
    attributes: BTreeMap<String, String>,
}

impl Principal {
    /// Creates a principal holding a single role.
    pub fn new(
        id: PrincipalId,
        display_name: impl Into<String>,
        email: impl Into<String>,
        declared_role: RoleId,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            declared_role,
            additional_roles: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds a role held alongside the declared one.
    pub fn with_role(mut self, role: RoleId) -> Self {
        if role != self.declared_role {
            self.additional_roles.insert(role);
        }
        self
    }

    /// Adds an auxiliary attribute such as `department`.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn declared_role(&self) -> &RoleId {
        &self.declared_role
    }

    pub fn additional_roles(&self) -> &BTreeSet<RoleId> {
        &self.additional_roles
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Iterates over every held role, declared role first.
    pub fn roles(&self) -> impl Iterator<Item = &RoleId> {
        std::iter::once(&self.declared_role).chain(self.additional_roles.iter())
    }

    /// Returns whether the principal holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().any(|held| held.as_str() == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_role_should_skip_declared_role() {
        let principal = Principal::new(
            PrincipalId::try_from("u1").unwrap(),
            "Dr. A",
            "a@x.edu",
            RoleId::try_from("teacher").unwrap(),
        )
        .with_role(RoleId::try_from("teacher").unwrap())
        .with_role(RoleId::try_from("dept_head").unwrap());

        let roles: Vec<&str> = principal.roles().map(RoleId::as_str).collect();
        assert_eq!(roles, vec!["teacher", "dept_head"]);
        assert!(principal.has_role("dept_head"));
    }
}
