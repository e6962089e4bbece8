use crate::classifier::Tier;
use crate::error::StoreError;
use crate::role::RoleDefinition;
use crate::types::PrincipalId;
use async_trait::async_trait;

/// Source of role definitions for catalog (re)loads.
#[async_trait]
pub trait RoleStore {
    /// Returns every role definition of the next catalog.
    async fn role_definitions(&self) -> std::result::Result<Vec<RoleDefinition>, StoreError>;
}

/// Source of explicit per-principal tier assignments.
#[async_trait]
pub trait OverrideStore {
    /// Returns every tier override.
    async fn tier_overrides(&self) -> std::result::Result<Vec<(PrincipalId, Tier)>, StoreError>;
}

/// Composite store trait.
pub trait Store: RoleStore + OverrideStore + Send + Sync {}

impl<T> Store for T where T: RoleStore + OverrideStore + Send + Sync {}
