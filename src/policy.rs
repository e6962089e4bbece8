//! Policy file loading with layered sources
//!
//! Loads a policy from the following sources (highest to lowest precedence):
//! 1. Environment variables (`FACULTY_ACCESS__*`)
//! 2. Policy file (TOML)
//! 3. Default values (empty role list, faculty classifier rules)

use crate::catalog::{CatalogBuilder, RoleCatalog};
use crate::classifier::{ClassifierRules, Tier};
use crate::error::{Error, Result};
use crate::role::RoleDefinition;
use crate::store::{OverrideStore, RoleStore};
use crate::topology::Topology;
use crate::types::PrincipalId;
use async_trait::async_trait;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::info;

/// Environment variable prefix, e.g. `FACULTY_ACCESS__CLASSIFIER__LEGACY_HEURISTICS`.
pub const ENV_PREFIX: &str = "FACULTY_ACCESS";

/// Deserialized policy: role definitions and classification rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PolicyFile {
    pub roles: Vec<RoleDefinition>,
    pub classifier: ClassifierRules,
}

impl PolicyFile {
    /// Materializes the role catalog over the faculty topology.
    pub fn build_catalog(&self) -> Result<RoleCatalog> {
        CatalogBuilder::new(Topology::FACULTY)
            .roles(self.roles.iter().cloned())
            .build()
    }
}

/// Loads a policy from a TOML string.
pub fn load_policy_from_str(toml_str: &str) -> Result<PolicyFile> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| Error::Config(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| Error::Config(e.to_string()))
}

/// Loads a policy from a TOML file, applying environment overrides.
pub fn load_policy(path: impl AsRef<Path>) -> Result<PolicyFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::Config(format!(
            "policy file not found: {}",
            path.display()
        )));
    }

    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::Config(e.to_string()))?;

    let policy: PolicyFile = config
        .try_deserialize()
        .map_err(|e| Error::Config(e.to_string()))?;
    info!(
        path = %path.display(),
        roles = policy.roles.len(),
        "policy file loaded"
    );
    Ok(policy)
}

#[async_trait]
impl RoleStore for PolicyFile {
    async fn role_definitions(
        &self,
    ) -> std::result::Result<Vec<RoleDefinition>, crate::StoreError> {
        Ok(self.roles.clone())
    }
}

#[async_trait]
impl OverrideStore for PolicyFile {
    async fn tier_overrides(
        &self,
    ) -> std::result::Result<Vec<(PrincipalId, Tier)>, crate::StoreError> {
        Ok(self
            .classifier
            .overrides
            .iter()
            .map(|(principal, tier)| (principal.clone(), *tier))
            .collect())
    }
}
