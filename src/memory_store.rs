use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use crate::classifier::Tier;
use crate::role::RoleDefinition;
use crate::store::{OverrideStore, RoleStore};
use crate::types::{PrincipalId, RoleId};

/// In-memory store implementation for tests and demos.
///
/// Edits are staged here and only reach an engine through
/// [`Engine::reload_catalog`](crate::Engine::reload_catalog).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    roles: RwLock<HashMap<RoleId, RoleDefinition>>,
    overrides: RwLock<HashMap<PrincipalId, Tier>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a role definition.
    pub fn put_role(&self, definition: RoleDefinition) {
        let mut guard = self.inner.roles.write().expect("poisoned lock");
        guard.insert(definition.id.clone(), definition);
    }

    /// Removes a role definition.
    pub fn remove_role(&self, role: &RoleId) -> Option<RoleDefinition> {
        let mut guard = self.inner.roles.write().expect("poisoned lock");
        guard.remove(role)
    }

    /// Sets the tier override of a principal.
    pub fn set_tier_override(&self, principal: PrincipalId, tier: Tier) {
        let mut guard = self.inner.overrides.write().expect("poisoned lock");
        guard.insert(principal, tier);
    }

    /// Clears the tier override of a principal.
    pub fn clear_tier_override(&self, principal: &PrincipalId) {
        let mut guard = self.inner.overrides.write().expect("poisoned lock");
        guard.remove(principal);
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn role_definitions(
        &self,
    ) -> std::result::Result<Vec<RoleDefinition>, crate::StoreError> {
        let guard = self.inner.roles.read().expect("poisoned lock");
        Ok(guard.values().cloned().collect())
    }
}

#[async_trait]
impl OverrideStore for MemoryStore {
    async fn tier_overrides(
        &self,
    ) -> std::result::Result<Vec<(PrincipalId, Tier)>, crate::StoreError> {
        let guard = self.inner.overrides.read().expect("poisoned lock");
        Ok(guard
            .iter()
            .map(|(principal, tier)| (principal.clone(), *tier))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use super::*;
    use crate::catalog::RoleCatalog;
    use crate::classifier::ClassifierRules;
    use crate::module::SystemModule;
    use crate::permission::Permission;
    use crate::principal::Principal;

    #[test]
    fn memory_store_should_support_basic_flow() {
        let store = MemoryStore::new();
        let role = RoleId::try_from("archivist").unwrap();
        let principal_id = PrincipalId::try_from("user_1").unwrap();
        store.put_role(
            RoleDefinition::new(role.clone(), "Archivist")
                .grant(Permission::try_from("administrative:read:archives").unwrap()),
        );
        store.set_tier_override(principal_id.clone(), Tier::Administrative);

        let rules = block_on(ClassifierRules::strict().with_overrides_from(&store)).unwrap();
        let engine = crate::EngineBuilder::new(RoleCatalog::builder().build().unwrap())
            .rules(rules)
            .build();
        block_on(engine.reload_catalog(&store)).unwrap();

        let principal = Principal::new(principal_id, "Archivist", "arch@x.edu", role);
        assert!(engine.can_access_module(&principal, SystemModule::Administrative));
        assert!(engine.can_access_module(&principal, SystemModule::Hr));
        assert!(!engine.can_access_module(&principal, SystemModule::Planning));
    }

    #[test]
    fn engine_should_build_from_store() {
        let store = MemoryStore::new();
        let role = RoleId::try_from("auditor").unwrap();
        store.put_role(
            RoleDefinition::new(role.clone(), "Auditor")
                .grant(Permission::try_from("statistics:read").unwrap()),
        );
        store.set_tier_override(PrincipalId::try_from("chef_1").unwrap(), Tier::Standard);

        let engine = block_on(crate::EngineBuilder::from_store(&store, ClassifierRules::faculty()))
            .unwrap()
            .build();

        let principal = Principal::new(
            PrincipalId::try_from("chef_1").unwrap(),
            "Chef de service",
            "chef@x.edu",
            role,
        );
        assert!(!engine.is_administrative_tier(&principal));
        assert!(engine.can_access_module(&principal, SystemModule::Statistics));
        assert!(!engine.can_access_module(&principal, SystemModule::Hr));

        store.remove_role(&RoleId::try_from("auditor").unwrap());
        block_on(engine.reload_catalog(&store)).unwrap();
        assert!(!engine.can_access_module(&principal, SystemModule::Statistics));
    }
}
