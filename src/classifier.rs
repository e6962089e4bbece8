//! Administrative-tier classification of principals.
//!
//! Classification order: explicit per-principal override, then role
//! membership, then (when enabled) the legacy e-mail / display-name markers.

use crate::error::{Error, Result};
use crate::principal::Principal;
use crate::store::OverrideStore;
use crate::types::{PrincipalId, RoleId};
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// Derived classification of a principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tier {
    #[default]
    Standard,
    Administrative,
}

/// Classifier seam used by [`Engine`](crate::Engine).
///
/// Implementations must be pure: the same principal always yields the same tier.
pub trait TierClassifier: Send + Sync {
    /// Classifies a principal.
    fn classify(&self, principal: &Principal) -> Tier;

    /// Returns whether the principal belongs to the administrative tier.
    fn is_administrative_tier(&self, principal: &Principal) -> bool {
        self.classify(principal) == Tier::Administrative
    }
}

/// Reviewable classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierRules {
    /// Roles whose holders are always administrative tier.
    pub administrative_roles: BTreeSet<RoleId>,
    /// Authoritative per-principal tier assignments.
    pub overrides: HashMap<PrincipalId, Tier>,
    /// Enables the marker checks below.
    pub legacy_heuristics: bool,
    /// Substrings matched against the e-mail as written.
    pub email_markers: Vec<String>,
    /// Case-insensitive substrings matched against the display name.
    pub name_markers: Vec<String>,
    /// Extra display-name substrings, matched like `name_markers`.
    pub named_exceptions: Vec<String>,
}

const ADMINISTRATIVE_ROLES: &[&str] = &[
    "admin_faculty",
    "dept_head",
    "vice_dean_pedagogy",
    "vice_dean_postgrad",
    "domain_manager",
    "planning_service_head",
    "secretary_general",
];
const EMAIL_MARKERS: &[&str] = &["admin", "doyen", "chef"];
const NAME_MARKERS: &[&str] = &["doyen", "chef"];

impl ClassifierRules {
    /// Faculty defaults, including the legacy marker checks.
    pub fn faculty() -> Self {
        Self {
            administrative_roles: ADMINISTRATIVE_ROLES
                .iter()
                .map(|id| RoleId::from_string((*id).to_string()))
                .collect(),
            overrides: HashMap::new(),
            legacy_heuristics: true,
            email_markers: EMAIL_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            name_markers: NAME_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            named_exceptions: Vec::new(),
        }
    }

    /// Faculty role table and overrides only; no identity markers.
    pub fn strict() -> Self {
        Self {
            legacy_heuristics: false,
            ..Self::faculty()
        }
    }

    /// Adds an explicit tier assignment.
    pub fn with_override(mut self, principal: PrincipalId, tier: Tier) -> Self {
        self.overrides.insert(principal, tier);
        self
    }

    /// Merges the overrides published by `store`; store entries win.
    pub async fn with_overrides_from<S>(mut self, store: &S) -> Result<Self>
    where
        S: OverrideStore + Sync,
    {
        let entries = store.tier_overrides().await.map_err(Error::from)?;
        self.overrides.extend(entries);
        Ok(self)
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::faculty()
    }
}

/// Table-driven [`TierClassifier`].
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: ClassifierRules,
    name_markers: Vec<String>,
}

impl RuleClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        let lower = |values: &[String]| -> Vec<String> {
            values.iter().map(|v| v.to_lowercase()).collect()
        };
        let mut name_markers = lower(&rules.name_markers);
        name_markers.extend(lower(&rules.named_exceptions));
        Self {
            name_markers,
            rules,
        }
    }

    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    fn matches_markers(&self, principal: &Principal) -> bool {
        let email = principal.email();
        if let Some(marker) = self.rules.email_markers.iter().find(|m| email.contains(m.as_str())) {
            trace!(marker = %marker, "email marker matched");
            return true;
        }
        let name = principal.display_name().to_lowercase();
        if let Some(marker) = self.name_markers.iter().find(|m| name.contains(m.as_str())) {
            trace!(marker = %marker, "display name marker matched");
            return true;
        }
        false
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new(ClassifierRules::default())
    }
}

impl TierClassifier for RuleClassifier {
    fn classify(&self, principal: &Principal) -> Tier {
        if let Some(tier) = self.rules.overrides.get(principal.id()) {
            trace!(principal = %principal.id(), ?tier, "tier override applied");
            return *tier;
        }
        if principal
            .roles()
            .any(|role| self.rules.administrative_roles.contains(role))
        {
            return Tier::Administrative;
        }
        if self.rules.legacy_heuristics && self.matches_markers(principal) {
            return Tier::Administrative;
        }
        Tier::Standard
    }
}
