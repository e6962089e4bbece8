//! Boundary guard around protected regions.

use crate::classifier::TierClassifier;
use crate::engine::{Decision, DecisionReason, Engine};
use crate::module::{PermissionAction, SystemModule};
use crate::principal::Principal;
use crate::types::{RoleId, TabId};
use thiserror::Error;

/// Structured denial for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("access denied: role {role} lacks {action} on {module}{}", tab_suffix(.tab))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AccessDenied {
    pub module: SystemModule,
    pub action: PermissionAction,
    pub tab: Option<TabId>,
    pub role: RoleId,
    pub reason: DecisionReason,
}

fn tab_suffix(tab: &Option<TabId>) -> String {
    tab.as_ref()
        .map(|tab| format!(" (tab {tab})"))
        .unwrap_or_default()
}

/// Outcome of [`Engine::guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResult {
    pub allowed: bool,
    pub decision: Decision,
    /// Declared role of the evaluated principal.
    pub principal_role: RoleId,
}

impl GateResult {
    /// Returns the structured denial, or `None` when allowed.
    pub fn denial(&self) -> Option<AccessDenied> {
        (!self.allowed).then(|| AccessDenied {
            module: self.decision.module,
            action: self.decision.action,
            tab: self.decision.tab.clone(),
            role: self.principal_role.clone(),
            reason: self.decision.reason,
        })
    }

    /// Converts into a `Result`, so a denial cannot be silently ignored.
    pub fn into_result(self) -> Result<Decision, AccessDenied> {
        match self.denial() {
            Some(denied) => Err(denied),
            None => Ok(self.decision),
        }
    }
}

impl<C> Engine<C>
where
    C: TierClassifier,
{
    /// Evaluates the gate for a protected region.
    pub fn guard(
        &self,
        principal: &Principal,
        module: SystemModule,
        action: PermissionAction,
        tab: Option<&TabId>,
    ) -> GateResult {
        let decision = self.decide(principal, module, action, tab);
        GateResult {
            allowed: decision.permitted,
            decision,
            principal_role: principal.declared_role().clone(),
        }
    }

    /// Runs `region` only when the gate allows it.
    pub fn protect<T>(
        &self,
        principal: &Principal,
        module: SystemModule,
        action: PermissionAction,
        tab: Option<&TabId>,
        region: impl FnOnce() -> T,
    ) -> Result<T, AccessDenied> {
        self.guard(principal, module, action, tab)
            .into_result()
            .map(|_| region())
    }
}
