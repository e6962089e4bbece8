//! Immutable role catalog and its atomically swappable holder.

use crate::error::{Error, Result};
use crate::module::{PermissionAction, SystemModule};
use crate::permission::Permission;
use crate::role::{Role, RoleDefinition};
use crate::topology::Topology;
use crate::types::RoleId;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

/// Role id that receives the structural bypass.
pub const SUPER_ADMIN: &str = "super_admin";
/// Role id of the self-service teacher mode.
pub const TEACHER: &str = "teacher";

/// Immutable mapping from role id to materialized [`Role`].
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: HashMap<RoleId, Role>,
    topology: Topology,
}

impl RoleCatalog {
    /// Starts a catalog over the faculty topology.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new(Topology::FACULTY)
    }

    /// Returns the role for `id`, if catalogued.
    pub fn get(&self, id: &str) -> Option<&Role> {
        self.roles.get(id)
    }

    /// Returns whether `id` is catalogued.
    pub fn contains(&self, id: &str) -> bool {
        self.roles.contains_key(id)
    }

    /// Iterates over all roles in unspecified order.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Topology the role trees were expanded against.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Built-in catalog of the faculty dashboard.
    pub fn faculty() -> Result<Self> {
        let mut builder = Self::builder();
        for (id, name, description, level, grants) in FACULTY_ROLES {
            let permissions = grants
                .iter()
                .map(|grant| Permission::new(grant))
                .collect::<Result<Vec<_>>>()?;
            builder = builder.role(
                RoleDefinition::new(RoleId::new(id)?, *name)
                    .description(*description)
                    .level(*level)
                    .grants(permissions),
            );
        }
        builder.role(super_admin_definition()).build()
    }
}

/// Builder for [`RoleCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    topology: Topology,
    definitions: Vec<RoleDefinition>,
}

impl CatalogBuilder {
    /// Creates a builder expanding roles against `topology`.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            definitions: Vec::new(),
        }
    }

    /// Adds a role definition.
    pub fn role(mut self, definition: RoleDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds several role definitions.
    pub fn roles(mut self, definitions: impl IntoIterator<Item = RoleDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Validates every definition and materializes the catalog.
    pub fn build(self) -> Result<RoleCatalog> {
        let mut roles = HashMap::with_capacity(self.definitions.len());
        for definition in self.definitions {
            if roles.contains_key(&definition.id) {
                return Err(Error::DuplicateRole(definition.id));
            }
            let role = Role::from_definition(definition, &self.topology)?;
            roles.insert(role.id().clone(), role);
        }
        Ok(RoleCatalog {
            roles,
            topology: self.topology,
        })
    }
}

/// Super-admin entry kept for audit and display. The bypass does not depend on it.
fn super_admin_definition() -> RoleDefinition {
    let permissions = SystemModule::all().iter().flat_map(|module| {
        PermissionAction::all()
            .iter()
            .map(|action| Permission::module_wide(*module, *action))
    });
    RoleDefinition::new(RoleId::from_string(SUPER_ADMIN.to_string()), "Super administrator")
        .description("Unrestricted access to every module")
        .level(100)
        .grants(permissions)
}

type RoleSeed = (&'static str, &'static str, &'static str, u8, &'static [&'static str]);

const FACULTY_ROLES: &[RoleSeed] = &[
    (
        "admin_faculty",
        "Faculty administrator",
        "Runs the faculty back office",
        90,
        &[
            "faculty:read", "faculty:write", "faculty:delete", "faculty:approve", "faculty:export",
            "admin:read", "admin:write", "admin:delete", "admin:approve", "admin:export",
            "hr:read", "hr:write", "hr:delete", "hr:approve", "hr:export",
            "reservations:read", "reservations:write", "reservations:approve",
            "statistics:read", "statistics:export",
        ],
    ),
    (
        "dean",
        "Dean",
        "Head of the faculty",
        95,
        &[
            "faculty:read", "faculty:approve", "faculty:export",
            "hr:read", "hr:approve", "hr:export",
            "academic:read", "formations:read", "scholarships:read", "scholarships:approve",
            "statistics:read", "statistics:export",
            "workload:read", "workload:approve",
        ],
    ),
    (
        "vice_dean_pedagogy",
        "Vice dean (pedagogy)",
        "Undergraduate studies and teaching",
        80,
        &[
            "academic:read", "academic:write", "academic:approve", "academic:export",
            "formations:read", "formations:write", "formations:approve",
            "timetable:read", "timetable:write", "timetable:approve",
            "statistics:read", "statistics:export",
        ],
    ),
    (
        "vice_dean_postgrad",
        "Vice dean (postgraduate)",
        "Postgraduate studies and research",
        80,
        &[
            "formations:read", "formations:write", "formations:approve",
            "scholarships:read", "scholarships:write", "scholarships:approve", "scholarships:export",
            "academic:read",
            "statistics:read",
        ],
    ),
    (
        "secretary_general",
        "Secretary general",
        "Administrative affairs of the faculty",
        85,
        &[
            "administrative:read", "administrative:write", "administrative:delete",
            "administrative:approve", "administrative:export",
            "hr:read", "hr:write", "hr:approve",
            "reservations:read", "reservations:write", "reservations:approve",
        ],
    ),
    (
        "dept_head",
        "Department head",
        "Manages a department's teachers and workload",
        70,
        &[
            "teacher:read", "teacher:approve",
            "workload:read", "workload:write", "workload:approve", "workload:export",
            "hr:read:absences", "hr:approve:absences", "hr:read:workload",
            "academic:read",
            "statistics:read",
        ],
    ),
    (
        "planning_service_head",
        "Planning service head",
        "Owns timetables and room planning",
        65,
        &[
            "planning:read", "planning:write", "planning:delete", "planning:approve", "planning:export",
            "timetable:read", "timetable:write", "timetable:delete", "timetable:approve",
            "reservations:read", "reservations:write",
        ],
    ),
    (
        "domain_manager",
        "Domain manager",
        "Coordinates the formations of a domain",
        60,
        &[
            "formations:read", "formations:write",
            "academic:read", "academic:write",
            "teacher:read",
        ],
    ),
    (
        "hr_manager",
        "HR manager",
        "Staff records and absences",
        75,
        &[
            "hr:read", "hr:write", "hr:delete", "hr:approve", "hr:export",
            "workload:read", "workload:export",
            "teacher:read",
        ],
    ),
    (
        TEACHER,
        "Teacher",
        "Self-service teaching space",
        10,
        &[
            "teacher:read", "teacher:write:profile", "teacher:write:absences",
            "timetable:read:weekly",
            "workload:read:summary",
            "reservations:read", "reservations:write:rooms",
        ],
    ),
];

/// Holder of the current catalog snapshot.
///
/// Readers load a whole snapshot; writers replace it atomically, so a reader
/// never observes a partially updated catalog.
#[derive(Debug)]
pub struct SharedCatalog {
    current: ArcSwap<RoleCatalog>,
}

impl SharedCatalog {
    pub fn new(catalog: RoleCatalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<RoleCatalog> {
        self.current.load_full()
    }

    /// Replaces the snapshot, returning the previous one.
    pub fn replace(&self, catalog: RoleCatalog) -> Arc<RoleCatalog> {
        self.current.swap(Arc::new(catalog))
    }
}
