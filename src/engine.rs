use crate::access::{Capabilities, ModuleAccess, TabAccess, derive_module};
use crate::catalog::{CatalogBuilder, RoleCatalog, SharedCatalog, TEACHER};
use crate::classifier::{ClassifierRules, RuleClassifier, TierClassifier};
use crate::error::{Error, Result};
use crate::module::{PermissionAction, SystemModule};
use crate::permission::Permission;
use crate::principal::Principal;
use crate::role::Role;
use crate::store::{RoleStore, Store};
use crate::types::{RoleId, TabId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Modules opened to administrative-tier principals regardless of role grants.
pub const ADMINISTRATIVE_MODULES: [SystemModule; 3] =
    [SystemModule::Admin, SystemModule::Hr, SystemModule::Faculty];

/// Precedence step that produced a [`Decision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecisionReason {
    /// The principal holds the super-admin role.
    SuperAdminBypass,
    /// The principal is administrative tier and the module is administrative.
    AdministrativeBypass,
    /// A catalogued role declares a matching permission.
    RoleGrant,
    /// Nothing granted the request.
    DefaultDeny,
}

/// Authorization decision, rich enough to explain a denial.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub permitted: bool,
    pub reason: DecisionReason,
    pub module: SystemModule,
    pub action: PermissionAction,
    pub tab: Option<TabId>,
    /// Role that supplied a [`DecisionReason::RoleGrant`].
    pub granted_by: Option<RoleId>,
}

impl Decision {
    fn new(
        reason: DecisionReason,
        module: SystemModule,
        action: PermissionAction,
        tab: Option<&TabId>,
    ) -> Self {
        Self {
            permitted: reason != DecisionReason::DefaultDeny,
            reason,
            module,
            action,
            tab: tab.cloned(),
            granted_by: None,
        }
    }
}

/// Permission resolver over an immutable, swappable role catalog.
#[derive(Debug)]
pub struct Engine<C = RuleClassifier> {
    catalog: SharedCatalog,
    classifier: C,
    administrative_modules: BTreeSet<SystemModule>,
}

/// Builder for [`Engine`].
pub struct EngineBuilder<C = RuleClassifier> {
    catalog: RoleCatalog,
    classifier: C,
    administrative_modules: BTreeSet<SystemModule>,
}

impl EngineBuilder<RuleClassifier> {
    /// Creates a builder with the faculty classification rules.
    pub fn new(catalog: RoleCatalog) -> Self {
        Self {
            catalog,
            classifier: RuleClassifier::default(),
            administrative_modules: ADMINISTRATIVE_MODULES.into_iter().collect(),
        }
    }

    /// Creates a builder from a store's role definitions and tier overrides.
    ///
    /// Roles are expanded against the faculty topology; store overrides are
    /// merged into `rules`.
    pub async fn from_store<S: Store>(store: &S, rules: ClassifierRules) -> Result<Self> {
        let definitions = store.role_definitions().await.map_err(Error::from)?;
        let catalog = RoleCatalog::builder().roles(definitions).build()?;
        let rules = rules.with_overrides_from(store).await?;
        Ok(Self::new(catalog).rules(rules))
    }
}

impl<C> EngineBuilder<C> {
    /// Uses a table-driven classifier built from `rules`.
    pub fn rules(self, rules: ClassifierRules) -> EngineBuilder<RuleClassifier> {
        self.classifier(RuleClassifier::new(rules))
    }

    /// Sets the classifier implementation.
    pub fn classifier<C2: TierClassifier>(self, classifier: C2) -> EngineBuilder<C2> {
        EngineBuilder {
            catalog: self.catalog,
            classifier,
            administrative_modules: self.administrative_modules,
        }
    }

    /// Replaces the module set opened by the administrative bypass.
    pub fn administrative_modules(mut self, modules: impl IntoIterator<Item = SystemModule>) -> Self {
        self.administrative_modules = modules.into_iter().collect();
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Engine<C> {
        Engine {
            catalog: SharedCatalog::new(self.catalog),
            classifier: self.classifier,
            administrative_modules: self.administrative_modules,
        }
    }
}

impl<C> Engine<C>
where
    C: TierClassifier,
{
    /// Decides whether `principal` may perform `action` on `module` (and `tab`).
    ///
    /// Precedence, first match wins: super-admin bypass, administrative bypass,
    /// catalogued role grants, default deny. Never fails; anything the engine
    /// cannot classify is denied.
    pub fn decide(
        &self,
        principal: &Principal,
        module: SystemModule,
        action: PermissionAction,
        tab: Option<&TabId>,
    ) -> Decision {
        let catalog = self.catalog.snapshot();
        let decision = self.decide_with(&catalog, principal, module, action, tab);
        debug!(
            principal = %principal.id(),
            role = %principal.declared_role(),
            module = %module,
            action = %action,
            tab = ?tab.map(TabId::as_str),
            reason = ?decision.reason,
            permitted = decision.permitted,
            "access decision"
        );
        decision
    }

    /// Returns whether the principal may read `module`.
    pub fn can_access_module(&self, principal: &Principal, module: SystemModule) -> bool {
        self.decide(principal, module, PermissionAction::Read, None)
            .permitted
    }

    /// Expands every module the principal can read, in navigation order.
    pub fn accessible_modules(&self, principal: &Principal) -> Vec<ModuleAccess> {
        let catalog = self.catalog.snapshot();
        SystemModule::all()
            .iter()
            .filter_map(|module| self.module_access(&catalog, principal, *module))
            .collect()
    }

    /// Returns the viewable tabs of `module`; empty when the module is not accessible.
    pub fn accessible_tabs(&self, principal: &Principal, module: SystemModule) -> Vec<TabAccess> {
        let catalog = self.catalog.snapshot();
        self.module_access(&catalog, principal, module)
            .map(|access| access.tabs.into_iter().filter(|tab| tab.can_view).collect())
            .unwrap_or_default()
    }

    /// Returns whether the principal belongs to the administrative tier.
    pub fn is_administrative_tier(&self, principal: &Principal) -> bool {
        self.classifier.is_administrative_tier(principal)
    }

    /// Returns whether the principal only acts as a teacher (self-service mode).
    pub fn is_pure_teacher(&self, principal: &Principal) -> bool {
        principal.declared_role().as_str() == TEACHER
            && principal.additional_roles().is_empty()
            && !self.is_administrative_tier(principal)
    }

    fn decide_with(
        &self,
        catalog: &RoleCatalog,
        principal: &Principal,
        module: SystemModule,
        action: PermissionAction,
        tab: Option<&TabId>,
    ) -> Decision {
        if let Some(reason) = self.bypass(principal, module) {
            return Decision::new(reason, module, action, tab);
        }

        let roles = known_roles(catalog, principal);
        if roles.is_empty() {
            debug!(
                principal = %principal.id(),
                role = %principal.declared_role(),
                "no catalogued role for principal"
            );
            return Decision::new(DecisionReason::DefaultDeny, module, action, tab);
        }

        if let Some(tab) = tab
            && !catalog.topology().has_tab(module, tab.as_str())
        {
            trace!(module = %module, tab = %tab, "tab not declared for module");
            return Decision::new(DecisionReason::DefaultDeny, module, action, Some(tab));
        }

        for role in roles {
            if role
                .permissions()
                .iter()
                .any(|granted| granted.matches(module, action, tab))
            {
                trace!(role = %role.id(), "role grant matched");
                let mut decision = Decision::new(DecisionReason::RoleGrant, module, action, tab);
                decision.granted_by = Some(role.id().clone());
                return decision;
            }
        }

        Decision::new(DecisionReason::DefaultDeny, module, action, tab)
    }

    fn bypass(&self, principal: &Principal, module: SystemModule) -> Option<DecisionReason> {
        if principal.roles().any(RoleId::is_super_admin) {
            trace!("super-admin bypass");
            return Some(DecisionReason::SuperAdminBypass);
        }
        if self.administrative_modules.contains(&module)
            && self.classifier.is_administrative_tier(principal)
        {
            trace!(module = %module, "administrative bypass");
            return Some(DecisionReason::AdministrativeBypass);
        }
        None
    }

    fn module_access(
        &self,
        catalog: &RoleCatalog,
        principal: &Principal,
        module: SystemModule,
    ) -> Option<ModuleAccess> {
        if self.bypass(principal, module).is_some() {
            return Some(catalog.topology().expand(module, Capabilities::ALL));
        }

        let permissions: Vec<Permission> = known_roles(catalog, principal)
            .into_iter()
            .flat_map(|role| role.permissions().iter().cloned())
            .collect();
        derive_module(module, &permissions, catalog.topology()).filter(|access| access.can_access)
    }
}

impl<C> Engine<C> {
    /// Returns the current catalog snapshot.
    pub fn catalog(&self) -> Arc<RoleCatalog> {
        self.catalog.snapshot()
    }

    /// Atomically replaces the catalog, returning the previous snapshot.
    ///
    /// Decisions already running keep the snapshot they started with.
    pub fn replace_catalog(&self, catalog: RoleCatalog) -> Arc<RoleCatalog> {
        info!(roles = catalog.len(), "role catalog replaced");
        self.catalog.replace(catalog)
    }

    /// Rebuilds the catalog from `store` and swaps it in.
    ///
    /// On any error the current catalog stays in place.
    pub async fn reload_catalog<S>(&self, store: &S) -> Result<Arc<RoleCatalog>>
    where
        S: RoleStore + Sync,
    {
        let definitions = store.role_definitions().await.map_err(|err| {
            warn!(error = %err, "role store failed during catalog reload");
            Error::from(err)
        })?;
        let topology = *self.catalog.snapshot().topology();
        let catalog = CatalogBuilder::new(topology)
            .roles(definitions)
            .build()
            .inspect_err(|err| warn!(error = %err, "rejected catalog reload"))?;
        Ok(self.replace_catalog(catalog))
    }
}

fn known_roles<'a>(catalog: &'a RoleCatalog, principal: &Principal) -> Vec<&'a Role> {
    principal
        .roles()
        .filter_map(|id| catalog.get(id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Tier;
    use crate::role::RoleDefinition;
    use crate::types::PrincipalId;
    use async_trait::async_trait;
    use futures::executor::block_on;

    fn perm(value: &str) -> Permission {
        Permission::try_from(value).unwrap()
    }

    fn tab(value: &str) -> TabId {
        TabId::try_from(value).unwrap()
    }

    fn principal(role: &str) -> Principal {
        Principal::new(
            PrincipalId::try_from("user_1").unwrap(),
            "Test User",
            "user@x.edu",
            RoleId::try_from(role).unwrap(),
        )
    }

    fn synthetic_catalog() -> RoleCatalog {
        RoleCatalog::builder()
            .role(
                RoleDefinition::new(RoleId::try_from("reader").unwrap(), "Reader")
                    .grant(perm("statistics:read"))
                    .grant(perm("hr:read:absences")),
            )
            .role(
                RoleDefinition::new(RoleId::try_from("clerk").unwrap(), "Clerk")
                    .grant(perm("administrative:write")),
            )
            .build()
            .unwrap()
    }

    fn strict_engine() -> Engine {
        EngineBuilder::new(synthetic_catalog())
            .rules(ClassifierRules::strict())
            .build()
    }

    #[test]
    fn decide_should_allow_declared_permission() {
        let engine = strict_engine();
        let decision = engine.decide(
            &principal("reader"),
            SystemModule::Statistics,
            PermissionAction::Read,
            None,
        );

        assert!(decision.permitted);
        assert_eq!(decision.reason, DecisionReason::RoleGrant);
        assert_eq!(decision.granted_by.as_ref().map(RoleId::as_str), Some("reader"));
    }

    #[test]
    fn decide_should_deny_undeclared_action() {
        let engine = strict_engine();
        let decision = engine.decide(
            &principal("reader"),
            SystemModule::Statistics,
            PermissionAction::Export,
            None,
        );

        assert!(!decision.permitted);
        assert_eq!(decision.reason, DecisionReason::DefaultDeny);
        assert_eq!(decision.granted_by, None);
    }

    #[test]
    fn decide_should_scope_tab_grants() {
        let engine = strict_engine();
        let p = principal("reader");

        let absences = tab("absences");
        let staff = tab("staff");
        assert!(engine.decide(&p, SystemModule::Hr, PermissionAction::Read, Some(&absences)).permitted);
        assert!(!engine.decide(&p, SystemModule::Hr, PermissionAction::Read, Some(&staff)).permitted);
        assert!(engine.can_access_module(&p, SystemModule::Hr));
    }

    #[test]
    fn decide_should_deny_undeclared_tab_even_with_module_grant() {
        let engine = strict_engine();
        let decision = engine.decide(
            &principal("reader"),
            SystemModule::Statistics,
            PermissionAction::Read,
            Some(&tab("secret_tab")),
        );

        assert!(!decision.permitted);
        assert_eq!(decision.tab.as_ref().map(TabId::as_str), Some("secret_tab"));
    }

    #[test]
    fn decide_should_union_grants_of_additional_roles() {
        let engine = strict_engine();
        let p = principal("reader").with_role(RoleId::try_from("clerk").unwrap());

        let decision = engine.decide(&p, SystemModule::Administrative, PermissionAction::Write, None);

        assert!(decision.permitted);
        assert_eq!(decision.granted_by.as_ref().map(RoleId::as_str), Some("clerk"));
    }

    #[test]
    fn super_admin_bypass_should_not_depend_on_catalog() {
        let engine = EngineBuilder::new(RoleCatalog::builder().build().unwrap()).build();
        let decision = engine.decide(
            &principal("super_admin"),
            SystemModule::Scholarships,
            PermissionAction::Delete,
            None,
        );

        assert!(decision.permitted);
        assert_eq!(decision.reason, DecisionReason::SuperAdminBypass);
    }

    #[test]
    fn administrative_bypass_should_cover_only_configured_modules() {
        let engine = EngineBuilder::new(synthetic_catalog())
            .rules(ClassifierRules::strict().with_override(
                PrincipalId::try_from("user_1").unwrap(),
                Tier::Administrative,
            ))
            .administrative_modules([SystemModule::Planning])
            .build();
        let p = principal("reader");

        let planning = engine.decide(&p, SystemModule::Planning, PermissionAction::Delete, None);
        assert_eq!(planning.reason, DecisionReason::AdministrativeBypass);
        assert!(!engine.can_access_module(&p, SystemModule::Admin));
    }

    #[test]
    fn accessible_modules_should_match_can_access_module() {
        let engine = strict_engine();
        let p = principal("reader").with_role(RoleId::try_from("clerk").unwrap());

        let listed: Vec<SystemModule> = engine
            .accessible_modules(&p)
            .iter()
            .map(|access| access.module_id)
            .collect();

        assert_eq!(listed, vec![SystemModule::Hr, SystemModule::Statistics]);
        for module in SystemModule::all() {
            assert_eq!(listed.contains(module), engine.can_access_module(&p, *module));
        }
    }

    #[test]
    fn accessible_tabs_should_only_list_viewable_tabs() {
        let engine = strict_engine();
        let tabs = engine.accessible_tabs(&principal("reader"), SystemModule::Hr);

        let ids: Vec<&str> = tabs.iter().map(|tab| tab.tab_id.as_str()).collect();
        assert_eq!(ids, vec!["absences"]);
        assert!(engine.accessible_tabs(&principal("reader"), SystemModule::Admin).is_empty());
    }

    struct FixedRoles(Vec<RoleDefinition>);

    #[async_trait]
    impl RoleStore for FixedRoles {
        async fn role_definitions(
            &self,
        ) -> std::result::Result<Vec<RoleDefinition>, crate::StoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingRoles;

    #[async_trait]
    impl RoleStore for FailingRoles {
        async fn role_definitions(
            &self,
        ) -> std::result::Result<Vec<RoleDefinition>, crate::StoreError> {
            Err("backend unavailable".into())
        }
    }

    #[test]
    fn reload_catalog_should_swap_snapshot() {
        let engine = strict_engine();
        let p = principal("reader");
        assert!(engine.can_access_module(&p, SystemModule::Statistics));

        let store = FixedRoles(vec![
            RoleDefinition::new(RoleId::try_from("reader").unwrap(), "Reader")
                .grant(perm("timetable:read")),
        ]);
        let previous = block_on(engine.reload_catalog(&store)).unwrap();

        assert!(previous.contains("clerk"));
        assert!(!engine.can_access_module(&p, SystemModule::Statistics));
        assert!(engine.can_access_module(&p, SystemModule::Timetable));
    }

    #[test]
    fn reload_catalog_should_keep_snapshot_on_error() {
        let engine = strict_engine();

        let result = block_on(engine.reload_catalog(&FailingRoles));
        assert!(matches!(result, Err(Error::Store(_))));

        let duplicate = FixedRoles(vec![
            RoleDefinition::new(RoleId::try_from("reader").unwrap(), "Reader"),
            RoleDefinition::new(RoleId::try_from("reader").unwrap(), "Reader"),
        ]);
        let result = block_on(engine.reload_catalog(&duplicate));
        assert!(matches!(result, Err(Error::DuplicateRole(_))));

        assert!(engine.catalog().contains("clerk"));
    }
}
