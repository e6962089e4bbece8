//! Role-based permission resolution for faculty administration dashboards.
//!
//! This crate decides, for an authenticated [`Principal`], whether an action on
//! a [`SystemModule`] (and optionally one of its tabs) is permitted. Decisions
//! combine a structural super-admin bypass, an administrative-tier bypass
//! driven by a [`TierClassifier`], and the grants declared in an immutable
//! [`RoleCatalog`]. The default behavior is deny-by-default, and a denial is a
//! regular [`Decision`] value rather than an error.
//!
//! # Examples
//!
//! ```no_run
//! use faculty_access::{
//!     EngineBuilder, PermissionAction, Principal, PrincipalId, RoleCatalog, RoleId,
//!     SystemModule,
//! };
//! let engine = EngineBuilder::new(RoleCatalog::faculty().unwrap()).build();
//! let principal = Principal::new(
//!     PrincipalId::try_from("user_1").unwrap(),
//!     "Dr. A",
//!     "a.b@x.edu",
//!     RoleId::try_from("teacher").unwrap(),
//! );
//! let decision = engine.decide(&principal, SystemModule::Teacher, PermissionAction::Read, None);
//! assert!(decision.permitted);
//! ```
//!
//! Loading roles from a TOML policy (enable `policy-file`):
//! ```no_run
//! # #[cfg(feature = "policy-file")]
//! # {
//! use faculty_access::{EngineBuilder, load_policy};
//! let policy = load_policy("faculty-access.toml").unwrap();
//! let engine = EngineBuilder::new(policy.build_catalog().unwrap())
//!     .rules(policy.classifier.clone())
//!     .build();
//! # let _ = engine;
//! # }
//! ```
#![forbid(unsafe_code)]

mod access;
mod catalog;
mod classifier;
mod engine;
mod error;
mod gate;
mod module;
mod permission;
mod principal;
mod role;
mod store;
mod topology;
mod types;

#[cfg(feature = "memory-store")]
mod memory_store;

#[cfg(feature = "policy-file")]
mod policy;

#[cfg(feature = "axum")]
pub mod axum;

pub use crate::access::{Capabilities, ModuleAccess, ProfileAccess, TabAccess, derive_modules};
pub use crate::catalog::{CatalogBuilder, RoleCatalog, SUPER_ADMIN, SharedCatalog, TEACHER};
pub use crate::classifier::{ClassifierRules, RuleClassifier, Tier, TierClassifier};
pub use crate::engine::{ADMINISTRATIVE_MODULES, Decision, DecisionReason, Engine, EngineBuilder};
pub use crate::error::{Error, Result, StoreError};
pub use crate::gate::{AccessDenied, GateResult};
pub use crate::module::{PermissionAction, SystemModule};
pub use crate::permission::Permission;
pub use crate::principal::Principal;
pub use crate::role::{Role, RoleDefinition};
pub use crate::store::{OverrideStore, RoleStore, Store};
pub use crate::topology::{ModuleTopology, Topology};
pub use crate::types::{PrincipalId, ProfileId, RoleId, TabId};

#[cfg(feature = "memory-store")]
pub use crate::memory_store::MemoryStore;

#[cfg(feature = "policy-file")]
pub use crate::policy::{ENV_PREFIX, PolicyFile, load_policy, load_policy_from_str};
