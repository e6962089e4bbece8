//! Static module → tabs / profiles topology.
//!
//! Tabs and profiles are two independent axes inside a module. The table is
//! compiled in; custom tables are only needed for synthetic catalogs.

use crate::module::SystemModule;

/// Tab and profile layout of a single module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleTopology {
    /// Module described by this entry.
    pub module: SystemModule,
    /// Ordered `(tab_id, tab_name)` pairs.
    pub tabs: &'static [(&'static str, &'static str)],
    /// `(profile_id, profile_name)` pairs.
    pub profiles: &'static [(&'static str, &'static str)],
}

/// Lookup table from module to its topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    modules: &'static [ModuleTopology],
}

const TEACHER_PROFILES: &[(&str, &str)] = &[
    ("permanent_teacher", "Permanent teacher"),
    ("visiting_lecturer", "Visiting lecturer"),
    ("contract_teacher", "Contract teacher"),
];

const FACULTY_TOPOLOGY: &[ModuleTopology] = &[
    ModuleTopology {
        module: SystemModule::Faculty,
        tabs: &[
            ("overview", "Overview"),
            ("departments", "Departments"),
            ("programs", "Programs"),
            ("announcements", "Announcements"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Teacher,
        tabs: &[
            ("profile", "My profile"),
            ("schedule", "Schedule"),
            ("courses", "Courses"),
            ("absences", "Absences"),
        ],
        profiles: TEACHER_PROFILES,
    },
    ModuleTopology {
        module: SystemModule::Hr,
        tabs: &[
            ("absences", "Absences"),
            ("workload", "Workload"),
            ("staff", "Staff"),
            ("leave_requests", "Leave requests"),
            ("reports", "Reports"),
        ],
        profiles: &[
            ("permanent_teacher", "Permanent teacher"),
            ("visiting_lecturer", "Visiting lecturer"),
            ("contract_teacher", "Contract teacher"),
            ("administrative_staff", "Administrative staff"),
        ],
    },
    ModuleTopology {
        module: SystemModule::Admin,
        tabs: &[
            ("users", "Users"),
            ("roles", "Roles & permissions"),
            ("settings", "Settings"),
            ("audit_log", "Audit log"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Formations,
        tabs: &[
            ("catalog", "Catalog"),
            ("curricula", "Curricula"),
            ("enrollments", "Enrollments"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Reservations,
        tabs: &[
            ("rooms", "Rooms"),
            ("equipment", "Equipment"),
            ("calendar", "Calendar"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Statistics,
        tabs: &[
            ("dashboard", "Dashboard"),
            ("reports", "Reports"),
            ("exports", "Exports"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Timetable,
        tabs: &[
            ("weekly", "Weekly timetable"),
            ("exams", "Exam sessions"),
            ("conflicts", "Conflicts"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Scholarships,
        tabs: &[("applications", "Applications"), ("grants", "Grants")],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Planning,
        tabs: &[("sessions", "Sessions"), ("assignments", "Assignments")],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Workload,
        tabs: &[
            ("summary", "Summary"),
            ("hours", "Teaching hours"),
            ("validation", "Validation"),
        ],
        profiles: TEACHER_PROFILES,
    },
    ModuleTopology {
        module: SystemModule::Academic,
        tabs: &[
            ("courses", "Courses"),
            ("exams", "Exams"),
            ("grades", "Grades"),
        ],
        profiles: &[],
    },
    ModuleTopology {
        module: SystemModule::Administrative,
        tabs: &[
            ("documents", "Documents"),
            ("correspondence", "Correspondence"),
            ("archives", "Archives"),
        ],
        profiles: &[],
    },
];

impl Topology {
    /// Topology of the faculty dashboard.
    pub const FACULTY: Topology = Topology {
        modules: FACULTY_TOPOLOGY,
    };

    /// Creates a topology from a custom table.
    pub const fn new(modules: &'static [ModuleTopology]) -> Self {
        Self { modules }
    }

    /// Topology with no declared modules.
    pub const fn empty() -> Self {
        Self { modules: &[] }
    }

    /// Returns the layout of a module, if declared.
    pub fn get(&self, module: SystemModule) -> Option<&'static ModuleTopology> {
        self.modules.iter().find(|entry| entry.module == module)
    }

    /// Returns whether `tab` is declared for `module`.
    pub fn has_tab(&self, module: SystemModule, tab: &str) -> bool {
        self.get(module)
            .is_some_and(|entry| entry.tabs.iter().any(|(id, _)| *id == tab))
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::FACULTY
    }
}
